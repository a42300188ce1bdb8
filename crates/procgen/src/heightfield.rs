//! Heightfield generation using noise functions.
//!
//! **Seed-based determinism:** all noise is derived from `config.seed` so the
//! same seed always produces the same height at every grid coordinate,
//! regardless of when or how often a field is generated.

use noise::{NoiseFn, Perlin, Simplex};

/// Width of the padding border added on each side of the requested grid.
///
/// Two cells: one so the outermost mesh samples still have central-difference
/// neighbors, and one for the degenerate zero-normal ring, which the mesher
/// must never read.
pub const PAD: usize = 2;

/// Derive a deterministic u32 noise seed from a field seed and an offset.
/// Same (seed, offset) always gives the same result so terrain is reproducible.
#[inline]
fn deterministic_noise_seed(seed: u64, offset: u64) -> u32 {
    ((seed.wrapping_add(offset))
        .wrapping_mul(0x9e3779b97f4a7c15_u64)
        .wrapping_add(offset.wrapping_mul(0x6c078965_u64))
        >> 32) as u32
}

/// Configuration for heightfield and terrain mesh generation.
#[derive(Debug, Clone)]
pub struct HeightFieldConfig {
    /// Terrain cells along X.
    pub width: u32,
    /// Terrain cells along Z.
    pub height: u32,
    /// Seed for noise generation.
    pub seed: u64,
    /// Noise frequency (lower = smoother).
    pub frequency: f64,
    /// Number of octaves for fractal noise.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f64,
    /// Amplitude multiplier per octave.
    pub gain: f64,
    /// World-space height of a raw sample of 1.0.
    pub vertical_scale: f32,
}

impl Default for HeightFieldConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            seed: 1337,
            frequency: 0.08,
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
            vertical_scale: 8.0,
        }
    }
}

/// A padded 2D scalar field of raw height samples.
///
/// `width`/`height` are the padded dimensions: requested size + [`PAD`] cells
/// on each side. Samples are raw noise in roughly [-1, 1]; world-space height
/// is `sample * vertical_scale`. Immutable once generated.
#[derive(Debug, Clone)]
pub struct HeightField {
    samples: Vec<f32>,
    width: usize,
    height: usize,
    vertical_scale: f32,
}

impl HeightField {
    /// Generate a padded heightfield for the requested terrain size.
    ///
    /// Pure function of the config: two calls with identical configs produce
    /// bit-identical sample arrays.
    pub fn generate(config: &HeightFieldConfig) -> Self {
        let perlin = Perlin::new(deterministic_noise_seed(config.seed, 0));
        let simplex = Simplex::new(deterministic_noise_seed(config.seed, 1));

        let width = config.width as usize + 2 * PAD;
        let height = config.height as usize + 2 * PAD;
        let mut samples = Vec::with_capacity(width * height);

        for j in 0..height {
            for i in 0..width {
                samples.push(Self::fractal_noise(&perlin, &simplex, i as f64, j as f64, config));
            }
        }

        log::debug!(
            "generated {}x{} heightfield (padded {}x{}, seed {})",
            config.width,
            config.height,
            width,
            height,
            config.seed
        );

        Self {
            samples,
            width,
            height,
            vertical_scale: config.vertical_scale,
        }
    }

    fn fractal_noise(
        perlin: &Perlin,
        simplex: &Simplex,
        x: f64,
        z: f64,
        config: &HeightFieldConfig,
    ) -> f32 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = config.frequency;
        let mut max_value = 0.0;

        for _ in 0..config.octaves.max(1) {
            // Mix Perlin and Simplex for variety
            let perlin_sample = perlin.get([x * frequency, z * frequency]);
            let simplex_sample = simplex.get([x * frequency + 1000.0, z * frequency + 1000.0]);

            value += (perlin_sample * 0.7 + simplex_sample * 0.3) * amplitude;
            max_value += amplitude;

            amplitude *= config.gain;
            frequency *= config.lacunarity;
        }

        // Normalize so the sum stays in roughly [-1, 1]
        (value / max_value) as f32
    }

    /// Padded width (requested width + 2 * PAD).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Padded height (requested height + 2 * PAD).
    pub fn height(&self) -> usize {
        self.height
    }

    /// World-space height of a raw sample of 1.0.
    pub fn vertical_scale(&self) -> f32 {
        self.vertical_scale
    }

    /// Raw sample at padded grid coordinates (column `i`, row `j`).
    #[inline]
    pub fn sample(&self, i: usize, j: usize) -> f32 {
        self.samples[j * self.width + i]
    }

    /// World-space height at padded grid coordinates.
    #[inline]
    pub fn world_height(&self, i: usize, j: usize) -> f32 {
        self.sample(i, j) * self.vertical_scale
    }

    /// All raw samples, row-major.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same seed and size must produce bit-identical sample arrays.
    #[test]
    fn heightfield_deterministic_same_seed() {
        let config = HeightFieldConfig {
            width: 24,
            height: 24,
            seed: 98765,
            ..Default::default()
        };
        let a = HeightField::generate(&config);
        let b = HeightField::generate(&config);
        assert_eq!(a.samples().len(), b.samples().len());
        for (i, (&ha, &hb)) in a.samples().iter().zip(b.samples().iter()).enumerate() {
            assert_eq!(ha.to_bits(), hb.to_bits(), "sample[{}] should match for same seed", i);
        }
    }

    /// Different seeds must produce different fields.
    #[test]
    fn heightfield_different_seed_different_samples() {
        let config_a = HeightFieldConfig {
            width: 24,
            height: 24,
            seed: 11111,
            ..Default::default()
        };
        let config_b = HeightFieldConfig {
            seed: 22222,
            ..config_a.clone()
        };
        let a = HeightField::generate(&config_a);
        let b = HeightField::generate(&config_b);
        assert_ne!(a.samples(), b.samples());
    }

    /// The field is padded by PAD cells on every side.
    #[test]
    fn heightfield_padded_dimensions() {
        let config = HeightFieldConfig {
            width: 16,
            height: 9,
            ..Default::default()
        };
        let field = HeightField::generate(&config);
        assert_eq!(field.width(), 16 + 2 * PAD);
        assert_eq!(field.height(), 9 + 2 * PAD);
        assert_eq!(field.samples().len(), field.width() * field.height());
    }

    /// Fractal sum normalization keeps samples in a sane range.
    #[test]
    fn heightfield_samples_bounded() {
        let field = HeightField::generate(&HeightFieldConfig {
            width: 32,
            height: 32,
            ..Default::default()
        });
        for &s in field.samples() {
            assert!(s.is_finite());
            assert!(s.abs() <= 1.5, "sample {} outside expected range", s);
        }
    }
}
