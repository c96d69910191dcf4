//! Fractal (multi-octave) noise synthesis.

use glam::Vec2;
use noise::{NoiseFn, Perlin};
use rand::Rng;

use crate::error::TerrainError;
use crate::heightfield::Heightfield;

/// Upper bound (exclusive) for each component of a random noise offset.
pub const OFFSET_RANGE: f32 = 9999.0;

/// A continuous, deterministic 2D noise function with nominal range [0, 1].
pub trait CoherentNoise: Send + Sync {
    fn sample(&self, x: f64, y: f64) -> f32;
}

/// Gradient noise backed by `noise::Perlin`, remapped from [-1, 1] to [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct PerlinSource {
    perlin: Perlin,
    seed: u32,
}

impl PerlinSource {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for PerlinSource {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CoherentNoise for PerlinSource {
    #[inline]
    fn sample(&self, x: f64, y: f64) -> f32 {
        (((self.perlin.get([x, y]) + 1.0) * 0.5) as f32).clamp(0.0, 1.0)
    }
}

/// Fractal noise settings for one generation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseParameters {
    /// Number of noise layers (>= 1).
    pub octaves: u32,
    /// Amplitude multiplier per octave.
    pub persistence: f32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Base frequency multiplier across the whole field.
    pub scale: f32,
    /// Sampling offset; decorrelates successive generations.
    pub offset: Vec2,
}

impl Default for NoiseParameters {
    fn default() -> Self {
        Self {
            octaves: 4,
            persistence: 0.3,
            lacunarity: 2.0,
            scale: 10.0,
            offset: Vec2::ZERO,
        }
    }
}

impl NoiseParameters {
    /// Same parameters sampled at a different offset.
    pub fn with_offset(self, offset: Vec2) -> Self {
        Self { offset, ..self }
    }

    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.octaves == 0 {
            return Err(TerrainError::parameter("octaves", "must be at least 1"));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(TerrainError::parameter(
                "scale",
                format!("must be finite and > 0, got {}", self.scale),
            ));
        }
        if !self.persistence.is_finite() {
            return Err(TerrainError::parameter("persistence", "must be finite"));
        }
        if !self.lacunarity.is_finite() {
            return Err(TerrainError::parameter("lacunarity", "must be finite"));
        }
        Ok(())
    }
}

/// Draw a fresh offset pair in `[0, OFFSET_RANGE)`.
pub fn random_offset<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.gen_range(0.0..OFFSET_RANGE),
        rng.gen_range(0.0..OFFSET_RANGE),
    )
}

/// Unnormalized noise field plus the extremes observed while building it.
#[derive(Debug, Clone)]
pub struct RawField {
    pub field: Heightfield,
    pub min: f32,
    pub max: f32,
}

/// Accumulate `params.octaves` layers of `source` over a `width × height` grid.
pub fn generate(
    width: usize,
    height: usize,
    params: &NoiseParameters,
    source: &dyn CoherentNoise,
) -> Result<RawField, TerrainError> {
    params.validate()?;
    let mut field = Heightfield::new(width, height)?;

    let mut min = f32::MAX;
    let mut max = f32::MIN;

    for x in 0..width {
        for y in 0..height {
            let u = x as f64 / width as f64;
            let v = y as f64 / height as f64;
            let value = fractal_sample(u, v, params, source);

            min = min.min(value);
            max = max.max(value);
            field.set(x, y, value);
        }
    }

    log::debug!(
        "noise field {}x{} octaves={} range=[{:.4}, {:.4}]",
        width,
        height,
        params.octaves,
        min,
        max
    );

    Ok(RawField { field, min, max })
}

/// Fractal sum at normalized grid coordinates `(u, v)`.
fn fractal_sample(u: f64, v: f64, params: &NoiseParameters, source: &dyn CoherentNoise) -> f32 {
    let scale = params.scale as f64;
    let offset_x = params.offset.x as f64;
    let offset_y = params.offset.y as f64;

    let mut amplitude = 1.0_f32;
    let mut frequency = 1.0_f64;
    let mut value = 0.0_f32;

    for _ in 0..params.octaves {
        let sx = u * scale * frequency + offset_x;
        let sy = v * scale * frequency + offset_y;
        let sample = source.sample(sx, sy) * 2.0 - 1.0;
        value += sample * amplitude;

        amplitude *= params.persistence;
        frequency *= params.lacunarity as f64;
    }

    value
}
