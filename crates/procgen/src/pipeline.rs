//! The full generation chain: noise → normalize → smooth → erode → mesh.

use std::sync::Arc;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::erosion::{erode_passes, ErosionParameters};
use crate::error::TerrainError;
use crate::heightfield::Heightfield;
use crate::noise_field::{self, random_offset, CoherentNoise, NoiseParameters, PerlinSource};
use crate::normalize::normalize_raw;
use crate::smooth::{smooth, BorderPolicy, DEFAULT_SMOOTH_RADIUS};
use crate::terrain::{build_mesh, TerrainMesh, HEIGHT_SCALE};

/// Everything needed to run the pipeline except the per-generation offset.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainSettings {
    /// Cells along x.
    pub width: usize,
    /// Cells along y (world z).
    pub height: usize,
    /// Fractal noise; `noise.offset` is replaced on every generation.
    pub noise: NoiseParameters,
    pub smooth_radius: usize,
    pub border: BorderPolicy,
    pub erosion: ErosionParameters,
    /// Erosion sweeps per generation.
    pub erosion_passes: u32,
    /// World height of a normalized value of 1.0.
    pub height_scale: f32,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            noise: NoiseParameters::default(),
            smooth_radius: DEFAULT_SMOOTH_RADIUS,
            border: BorderPolicy::default(),
            erosion: ErosionParameters::default(),
            erosion_passes: 1,
            height_scale: HEIGHT_SCALE,
        }
    }
}

impl TerrainSettings {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.width == 0 || self.height == 0 {
            return Err(TerrainError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        // Mesh indices are u32.
        let vertices = self.width.checked_mul(self.height);
        if vertices.map_or(true, |n| n > u32::MAX as usize) {
            return Err(TerrainError::parameter(
                "width * height",
                format!("{}x{} exceeds {} vertices", self.width, self.height, u32::MAX),
            ));
        }
        self.noise.validate()?;
        self.erosion.validate()?;
        if self.smooth_radius == 0 {
            return Err(TerrainError::parameter("smooth_radius", "must be at least 1"));
        }
        if !(self.height_scale.is_finite() && self.height_scale >= 0.0) {
            return Err(TerrainError::parameter(
                "height_scale",
                format!("must be finite and >= 0, got {}", self.height_scale),
            ));
        }
        Ok(())
    }
}

/// Output of one full pipeline run.
#[derive(Debug, Clone)]
pub struct GeneratedTerrain {
    /// Final heightfield, normalized then smoothed and eroded.
    pub heightfield: Heightfield,
    pub mesh: TerrainMesh,
    /// Noise offset this terrain was sampled at.
    pub offset: Vec2,
    pub height_scale: f32,
}

impl GeneratedTerrain {
    /// World height at grid cell `(x, y)`, or `None` outside the field.
    pub fn height_at(&self, x: usize, y: usize) -> Option<f32> {
        self.heightfield
            .try_get(x, y)
            .map(|h| h * self.height_scale)
    }

    /// World height at a fractional grid position (bilinear, clamped to the edge).
    pub fn sample_height(&self, x: f32, y: f32) -> f32 {
        self.heightfield.sample_bilinear(x, y) * self.height_scale
    }

    /// World height under the middle of the field.
    pub fn center_height(&self) -> f32 {
        let cx = self.heightfield.width() / 2;
        let cy = self.heightfield.height() / 2;
        self.heightfield.get(cx, cy) * self.height_scale
    }
}

/// Run noise, normalization, smoothing and erosion at `offset`.
pub fn generate_heightfield(
    settings: &TerrainSettings,
    offset: Vec2,
    source: &dyn CoherentNoise,
) -> Result<Heightfield, TerrainError> {
    settings.validate()?;

    let params = settings.noise.with_offset(offset);
    let raw = noise_field::generate(settings.width, settings.height, &params, source)?;
    let normalized = normalize_raw(raw);
    let mut field = smooth(&normalized, settings.smooth_radius, settings.border);
    let lowered = erode_passes(&mut field, &settings.erosion, settings.erosion_passes);

    log::debug!(
        "heightfield ready at offset ({:.2}, {:.2}); erosion lowered {} cells",
        offset.x,
        offset.y,
        lowered
    );
    Ok(field)
}

/// Full pipeline including mesh construction.
pub fn build_terrain(
    settings: &TerrainSettings,
    offset: Vec2,
    source: &dyn CoherentNoise,
) -> Result<GeneratedTerrain, TerrainError> {
    let heightfield = generate_heightfield(settings, offset, source)?;
    let mesh = build_mesh(&heightfield, settings.height_scale);
    Ok(GeneratedTerrain {
        heightfield,
        mesh,
        offset,
        height_scale: settings.height_scale,
    })
}

/// Regenerates terrain on demand and keeps the latest result for height queries.
pub struct TerrainGenerator {
    settings: TerrainSettings,
    source: Arc<dyn CoherentNoise>,
    rng: StdRng,
    last: Option<Arc<GeneratedTerrain>>,
}

impl TerrainGenerator {
    /// Generator with a Perlin source and an entropy-seeded RNG.
    pub fn new(settings: TerrainSettings) -> Result<Self, TerrainError> {
        Self::with_source(settings, Arc::new(PerlinSource::default()), StdRng::from_entropy())
    }

    /// Generator with a reproducible offset sequence.
    pub fn seeded(settings: TerrainSettings, seed: u64) -> Result<Self, TerrainError> {
        Self::with_source(
            settings,
            Arc::new(PerlinSource::default()),
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn with_source(
        settings: TerrainSettings,
        source: Arc<dyn CoherentNoise>,
        rng: StdRng,
    ) -> Result<Self, TerrainError> {
        settings.validate()?;
        warn_if_no_interior(&settings);
        Ok(Self {
            settings,
            source,
            rng,
            last: None,
        })
    }

    pub fn settings(&self) -> &TerrainSettings {
        &self.settings
    }

    pub fn source(&self) -> Arc<dyn CoherentNoise> {
        Arc::clone(&self.source)
    }

    /// Draw the offset for the next generation.
    pub fn next_offset(&mut self) -> Vec2 {
        random_offset(&mut self.rng)
    }

    /// Generate fresh terrain at new random offsets and cache it.
    pub fn regenerate(&mut self) -> Result<Arc<GeneratedTerrain>, TerrainError> {
        let offset = self.next_offset();
        self.generate_at(offset)
    }

    /// Generate terrain at a fixed offset and cache it.
    pub fn generate_at(&mut self, offset: Vec2) -> Result<Arc<GeneratedTerrain>, TerrainError> {
        let terrain = Arc::new(build_terrain(&self.settings, offset, self.source.as_ref())?);
        log::info!(
            "Generated {}x{} terrain ({} vertices, {} triangles)",
            self.settings.width,
            self.settings.height,
            terrain.mesh.vertex_count(),
            terrain.mesh.triangle_count()
        );
        self.last = Some(Arc::clone(&terrain));
        Ok(terrain)
    }

    /// Replace the cached terrain with one produced elsewhere (e.g. by a worker).
    pub fn install(&mut self, terrain: Arc<GeneratedTerrain>) {
        self.last = Some(terrain);
    }

    /// Most recent terrain, if any.
    pub fn current(&self) -> Option<&Arc<GeneratedTerrain>> {
        self.last.as_ref()
    }

    /// World height at grid cell `(x, y)` of the cached terrain.
    pub fn height_at(&self, x: usize, y: usize) -> Option<f32> {
        self.last.as_ref()?.height_at(x, y)
    }
}

fn warn_if_no_interior(settings: &TerrainSettings) {
    let smallest = settings.width.min(settings.height);
    if smallest < 2 * settings.smooth_radius + 1 {
        log::warn!(
            "{}x{} terrain is too small to smooth with radius {}",
            settings.width,
            settings.height,
            settings.smooth_radius
        );
    }
    if smallest < 2 * settings.erosion.radius + 1 {
        log::warn!(
            "{}x{} terrain is too small to erode with radius {}",
            settings.width,
            settings.height,
            settings.erosion.radius
        );
    }
}
