//! Terrain mesh synthesis from a heightfield.
//!
//! Tessellates the terrain grid into independent quads: each cell gets its
//! own 4 vertices (no sharing across cells) so per-quad UVs can tile the
//! unit square, while corner positions and normals are sampled from the
//! shared padded field, making adjacent quads' corners numerically
//! coincident even though they are topologically distinct.

use crate::heightfield::{HeightField, HeightFieldConfig, PAD};
use crate::normals::NormalField;

/// Floats per vertex: position (3) + normal (3) + uv (2).
pub const VERTEX_STRIDE: usize = 8;
/// Unique vertices per quad.
pub const VERTICES_PER_QUAD: usize = 4;
/// Indices per quad (two triangles sharing the 0-2 diagonal).
pub const INDICES_PER_QUAD: usize = 6;

/// Per-quad corner order, viewed from above (+Y), winding counter-clockwise
/// so the terrain pipeline's back-face culling keeps the upper surface:
/// far-left, far-right, near-right, near-left. `(di, dj)` are the cell
/// offsets of each corner, paired with its UV.
const CORNERS: [(usize, usize, [f32; 2]); VERTICES_PER_QUAD] = [
    (0, 1, [0.0, 1.0]),
    (1, 1, [1.0, 1.0]),
    (1, 0, [1.0, 0.0]),
    (0, 0, [0.0, 0.0]),
];

/// CPU-side terrain mesh: interleaved `[position.xyz, normal.xyz, uv.xy]`
/// f32 vertex data and a u32 index buffer. Immutable once generated; the
/// CPU copy can be dropped after GPU upload.
#[derive(Debug, Clone)]
pub struct TerrainMeshData {
    pub vertex_data: Vec<f32>,
    pub index_data: Vec<u32>,
    pub vertex_count: u32,
    pub index_count: u32,
}

impl TerrainMeshData {
    /// Generate the full terrain mesh for a config: heightfield, normals,
    /// then one quad per cell. Output sizes are exact: `W*H` quads,
    /// `4*W*H` vertices, `6*W*H` indices.
    pub fn generate(config: &HeightFieldConfig) -> Self {
        let field = HeightField::generate(config);
        let normals = NormalField::from_heightfield(&field);
        Self::from_fields(config, &field, &normals)
    }

    /// Tessellate pre-built fields. Split out so tests can inspect the
    /// intermediate fields alongside the mesh.
    pub fn from_fields(
        config: &HeightFieldConfig,
        field: &HeightField,
        normals: &NormalField,
    ) -> Self {
        let w = config.width as usize;
        let h = config.height as usize;
        let quad_count = w * h;
        let vertex_count = quad_count * VERTICES_PER_QUAD;

        let mut vertex_data = Vec::with_capacity(vertex_count * VERTEX_STRIDE);
        let mut index_data = Vec::with_capacity(quad_count * INDICES_PER_QUAD);

        for j in 0..h {
            for i in 0..w {
                for &(di, dj, uv) in &CORNERS {
                    // World cell (i+di, j+dj) maps to padded sample index
                    // (+PAD, +PAD); the zero-normal ring is out of reach.
                    let si = i + di + PAD;
                    let sj = j + dj + PAD;
                    let normal = normals.normal(si, sj);

                    vertex_data.extend_from_slice(&[
                        (i + di) as f32,
                        field.world_height(si, sj),
                        (j + dj) as f32,
                        normal.x,
                        normal.y,
                        normal.z,
                        uv[0],
                        uv[1],
                    ]);
                }

                let base = ((j * w + i) * VERTICES_PER_QUAD) as u32;
                index_data.extend_from_slice(&[base, base + 1, base + 2, base + 3, base, base + 2]);
            }
        }

        log::debug!(
            "meshed {}x{} terrain: {} vertices, {} indices",
            w,
            h,
            vertex_count,
            index_data.len()
        );

        Self {
            vertex_count: vertex_count as u32,
            index_count: index_data.len() as u32,
            vertex_data,
            index_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(w: u32, h: u32) -> HeightFieldConfig {
        HeightFieldConfig {
            width: w,
            height: h,
            seed: 1337,
            ..Default::default()
        }
    }

    /// Reference scenario: seed 1337, 4x4 terrain.
    #[test]
    fn four_by_four_reference() {
        let mesh = TerrainMeshData::generate(&config(4, 4));
        assert_eq!(mesh.vertex_count, 64);
        assert_eq!(mesh.index_count, 96);
        assert_eq!(mesh.vertex_data.len(), 8 * 4 * 4 * 4);
        assert_eq!(mesh.index_data.len(), 6 * 4 * 4);
        // First quad: 4-vertex block {0,1,2,3}, first triangle (0,1,2).
        assert_eq!(&mesh.index_data[..6], &[0, 1, 2, 3, 0, 2]);
    }

    /// Buffer sizes are exact and every index addresses an emitted vertex.
    #[test]
    fn exact_sizes_and_index_bounds() {
        let (w, h) = (7u32, 5u32);
        let mesh = TerrainMeshData::generate(&config(w, h));
        let quads = (w * h) as usize;
        assert_eq!(mesh.vertex_data.len(), VERTEX_STRIDE * VERTICES_PER_QUAD * quads);
        assert_eq!(mesh.index_data.len(), INDICES_PER_QUAD * quads);
        for &idx in &mesh.index_data {
            assert!(idx < mesh.vertex_count);
        }
    }

    /// The mesher must never sample the zero-normal border ring: every
    /// emitted normal is unit length. This is the padding invariant; if it
    /// fails, lighting seams appear along the terrain edge.
    #[test]
    fn border_ring_never_sampled() {
        let mesh = TerrainMeshData::generate(&config(6, 6));
        for v in mesh.vertex_data.chunks_exact(VERTEX_STRIDE) {
            let len = (v[3] * v[3] + v[4] * v[4] + v[5] * v[5]).sqrt();
            assert!(
                (len - 1.0).abs() < 1e-5,
                "vertex at ({}, {}) carries a degenerate normal (len {})",
                v[0],
                v[2],
                len
            );
        }
    }

    /// Corners shared by adjacent quads are numerically coincident in both
    /// position and normal, despite being distinct vertices.
    #[test]
    fn adjacent_quads_share_corner_values() {
        let (w, h) = (4usize, 4usize);
        let mesh = TerrainMeshData::generate(&config(w as u32, h as u32));
        let vert = |quad: usize, k: usize| {
            let at = (quad * VERTICES_PER_QUAD + k) * VERTEX_STRIDE;
            &mesh.vertex_data[at..at + 6] // position + normal
        };

        // Quad (0,0) corner v1 is world (1,1); quad (1,1) corner v3 is the
        // same world point.
        assert_eq!(vert(0, 1), vert(1 * w + 1, 3));
        // Quad (0,0) v2 (world (1,0)) == quad (1,0) v3 (world (1,0)).
        assert_eq!(vert(0, 2), vert(1, 3));
    }

    /// Per-quad UVs tile the unit square independent of world position.
    #[test]
    fn uvs_are_unit_square_corners() {
        let mesh = TerrainMeshData::generate(&config(3, 3));
        for quad in mesh
            .vertex_data
            .chunks_exact(VERTEX_STRIDE * VERTICES_PER_QUAD)
        {
            for (k, v) in quad.chunks_exact(VERTEX_STRIDE).enumerate() {
                assert_eq!([v[6], v[7]], CORNERS[k].2);
            }
        }
    }

    /// Same seed meshes identically (end-to-end determinism).
    #[test]
    fn mesh_deterministic() {
        let a = TerrainMeshData::generate(&config(8, 8));
        let b = TerrainMeshData::generate(&config(8, 8));
        assert_eq!(a.vertex_data, b.vertex_data);
        assert_eq!(a.index_data, b.index_data);
    }
}
