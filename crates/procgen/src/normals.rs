//! Surface normal reconstruction from a heightfield.
//!
//! Central-difference gradient estimate, the standard heightmap-normal
//! technique: for each interior sample the normal is
//! `normalize(dx * scale, -2, dy * scale)` where `dx`/`dy` are the height
//! differences of the two neighbors along each axis and `-2` encodes the
//! unit grid spacing. The outermost ring has no symmetric neighbors and
//! gets an exact zero vector; callers must never read it as a surface
//! normal (the mesher's sampling offsets guarantee this, see terrain.rs).

use glam::Vec3;

use crate::heightfield::HeightField;

/// Per-sample unit normals parallel to a [`HeightField`], with zero-vector
/// sentinels on the outer border ring.
#[derive(Debug, Clone)]
pub struct NormalField {
    normals: Vec<Vec3>,
    width: usize,
    height: usize,
}

impl NormalField {
    /// Reconstruct normals for every sample of the field.
    pub fn from_heightfield(field: &HeightField) -> Self {
        let width = field.width();
        let height = field.height();
        let scale = field.vertical_scale();
        let mut normals = Vec::with_capacity(width * height);

        for j in 0..height {
            for i in 0..width {
                if i == 0 || j == 0 || i == width - 1 || j == height - 1 {
                    normals.push(Vec3::ZERO);
                    continue;
                }

                let dx = field.sample(i - 1, j) - field.sample(i + 1, j);
                let dy = field.sample(i, j - 1) - field.sample(i, j + 1);
                normals.push(Vec3::new(dx * scale, -2.0, dy * scale).normalize());
            }
        }

        Self {
            normals,
            width,
            height,
        }
    }

    /// Normal at padded grid coordinates (column `i`, row `j`).
    #[inline]
    pub fn normal(&self, i: usize, j: usize) -> Vec3 {
        self.normals[j * self.width + i]
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heightfield::HeightFieldConfig;

    fn small_field() -> HeightField {
        HeightField::generate(&HeightFieldConfig {
            width: 12,
            height: 12,
            seed: 4242,
            ..Default::default()
        })
    }

    /// Every interior normal is unit length; the outer ring is exactly zero.
    #[test]
    fn interior_unit_border_zero() {
        let field = small_field();
        let normals = NormalField::from_heightfield(&field);

        for j in 0..normals.height() {
            for i in 0..normals.width() {
                let n = normals.normal(i, j);
                let on_ring =
                    i == 0 || j == 0 || i == normals.width() - 1 || j == normals.height() - 1;
                if on_ring {
                    assert_eq!(n, Vec3::ZERO, "ring normal at ({}, {}) must be zero", i, j);
                } else {
                    assert!(
                        (n.length() - 1.0).abs() < 1e-5,
                        "interior normal at ({}, {}) has length {}",
                        i,
                        j,
                        n.length()
                    );
                }
            }
        }
    }

    /// A flat field (vertical scale 0) yields the pure down-axis vector for
    /// every interior sample: (0, -2, 0) normalized.
    #[test]
    fn flat_field_axis_normals() {
        let field = HeightField::generate(&HeightFieldConfig {
            width: 8,
            height: 8,
            vertical_scale: 0.0,
            ..Default::default()
        });
        let normals = NormalField::from_heightfield(&field);
        for j in 1..normals.height() - 1 {
            for i in 1..normals.width() - 1 {
                let n = normals.normal(i, j);
                assert!((n - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6);
            }
        }
    }

    /// Normal field dimensions mirror the heightfield.
    #[test]
    fn dimensions_match_field() {
        let field = small_field();
        let normals = NormalField::from_heightfield(&field);
        assert_eq!(normals.width(), field.width());
        assert_eq!(normals.height(), field.height());
    }
}
