//! Timed weather effects over the terrain: rain, snow, and wind.

use std::time::Duration;

use engine_core::{TimedTask, Vec3};
use procgen::GeneratedTerrain;
use renderer::{AssetStore, Material, ParticleEffect, RAIN_EFFECT, RAIN_MATERIAL, SNOW_EFFECT};

/// How long rain and snow play before stopping on their own.
pub const EFFECT_DURATION: Duration = Duration::from_secs(10);
/// Height of the emitter above the terrain center.
pub const EMITTER_LIFT: f32 = 50.0;
/// Emitter sits this far behind the terrain's near edge.
pub const EMITTER_Z: f32 = -20.0;
/// Translucent blue tint for rain particles.
pub const RAIN_TINT: [f32; 4] = [0.5, 0.5, 1.0, 0.5];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherKind {
    Rain,
    Snow,
}

impl WeatherKind {
    fn effect_path(self) -> &'static str {
        match self {
            Self::Rain => RAIN_EFFECT,
            Self::Snow => SNOW_EFFECT,
        }
    }
}

/// A playing particle effect.
#[derive(Debug, Clone)]
pub struct WeatherEffect {
    pub kind: WeatherKind,
    pub effect: ParticleEffect,
    pub material: Option<Material>,
    pub position: Vec3,
    pub start_color: [f32; 4],
    task: TimedTask,
}

impl WeatherEffect {
    pub fn remaining(&self) -> Duration {
        self.task.remaining()
    }
}

/// Emitter position for weather over `terrain`.
pub fn emitter_position(terrain: &GeneratedTerrain) -> Vec3 {
    let cx = (terrain.heightfield.width() / 2) as f32;
    Vec3::new(cx, terrain.center_height() + EMITTER_LIFT, EMITTER_Z)
}

#[derive(Debug, Default)]
pub struct WeatherSystem {
    active: Vec<WeatherEffect>,
    wind_gusts: u32,
}

impl WeatherSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a rain or snow effect over `terrain`.
    ///
    /// Returns `None` (after a warning) when the particle effect is unavailable.
    /// A missing rain material only drops the custom look.
    pub fn start(
        &mut self,
        kind: WeatherKind,
        assets: &dyn AssetStore,
        terrain: &GeneratedTerrain,
    ) -> Option<&WeatherEffect> {
        let effect = match assets.load_particle_effect(kind.effect_path()) {
            Ok(effect) => effect,
            Err(e) => {
                log::warn!("{:?} effect unavailable: {}", kind, e);
                return None;
            }
        };

        let (material, start_color) = match kind {
            WeatherKind::Rain => {
                let material = match assets.load_material(RAIN_MATERIAL) {
                    Ok(m) => Some(m),
                    Err(e) => {
                        log::warn!("Rain material not found: {}", e);
                        None
                    }
                };
                (material, RAIN_TINT)
            }
            WeatherKind::Snow => (None, effect.start_color),
        };

        let position = emitter_position(terrain);
        let mut task = TimedTask::new(EFFECT_DURATION);
        task.start();
        log::info!(
            "{:?} started at ({:.1}, {:.1}, {:.1})",
            kind,
            position.x,
            position.y,
            position.z
        );

        self.active.push(WeatherEffect {
            kind,
            effect,
            material,
            position,
            start_color,
            task,
        });
        self.active.last()
    }

    pub fn apply_wind(&mut self) {
        self.wind_gusts += 1;
        log::info!("Wind effect applied");
    }

    /// Advance every effect; finished ones are stopped and removed.
    pub fn update(&mut self, dt: Duration) -> Vec<WeatherKind> {
        let mut finished = Vec::new();
        for effect in &mut self.active {
            if effect.task.tick(dt) {
                finished.push(effect.kind);
            }
        }
        self.active.retain(|e| !e.task.is_done());
        for kind in &finished {
            log::info!("{:?} stopped", kind);
        }
        finished
    }

    /// Cancel every running effect. Returns how many were stopped.
    pub fn stop_all(&mut self) -> usize {
        let mut stopped = 0;
        for effect in self.active.drain(..) {
            let mut task = effect.task;
            if task.stop() {
                log::info!("{:?} stopped", effect.kind);
                stopped += 1;
            }
        }
        stopped
    }

    pub fn active(&self) -> &[WeatherEffect] {
        &self.active
    }

    pub fn wind_gusts(&self) -> u32 {
        self.wind_gusts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Vec2;
    use procgen::{build_terrain, PerlinSource, TerrainSettings};
    use renderer::MemoryAssets;

    fn terrain() -> GeneratedTerrain {
        let settings = TerrainSettings {
            width: 20,
            height: 20,
            ..Default::default()
        };
        build_terrain(&settings, Vec2::new(31.5, 77.25), &PerlinSource::default()).unwrap()
    }

    fn full_assets() -> MemoryAssets {
        MemoryAssets::new()
            .with_effect(RAIN_EFFECT, ParticleEffect::named("rain", 500.0, 2.0))
            .with_effect(SNOW_EFFECT, ParticleEffect::named("snow", 150.0, 8.0))
            .with_material(RAIN_MATERIAL, Material::named("rain"))
    }

    #[test]
    fn rain_is_placed_above_terrain_center() {
        let terrain = terrain();
        let mut weather = WeatherSystem::new();
        let rain = weather.start(WeatherKind::Rain, &full_assets(), &terrain).unwrap();

        let expected_y = terrain.height_at(10, 10).unwrap() + EMITTER_LIFT;
        assert_eq!(rain.position, Vec3::new(10.0, expected_y, -20.0));
        assert_eq!(rain.start_color, RAIN_TINT);
        assert!(rain.material.is_some());
    }

    #[test]
    fn missing_effect_does_not_start() {
        let mut weather = WeatherSystem::new();
        assert!(weather.start(WeatherKind::Snow, &MemoryAssets::new(), &terrain()).is_none());
        assert!(weather.active().is_empty());
    }

    #[test]
    fn rain_without_material_still_plays() {
        let assets = MemoryAssets::new()
            .with_effect(RAIN_EFFECT, ParticleEffect::named("rain", 500.0, 2.0));
        let mut weather = WeatherSystem::new();
        let rain = weather.start(WeatherKind::Rain, &assets, &terrain()).unwrap();
        assert!(rain.material.is_none());
    }

    #[test]
    fn effects_stop_after_duration() {
        let terrain = terrain();
        let assets = full_assets();
        let mut weather = WeatherSystem::new();
        weather.start(WeatherKind::Rain, &assets, &terrain);
        weather.update(Duration::from_secs(4));
        weather.start(WeatherKind::Snow, &assets, &terrain);

        let finished = weather.update(Duration::from_secs(6));
        assert_eq!(finished, vec![WeatherKind::Rain]);
        assert_eq!(weather.active().len(), 1);
        assert_eq!(weather.active()[0].remaining(), Duration::from_secs(4));

        assert_eq!(weather.update(Duration::from_secs(4)), vec![WeatherKind::Snow]);
        assert!(weather.active().is_empty());
    }

    #[test]
    fn stop_all_cancels() {
        let terrain = terrain();
        let assets = full_assets();
        let mut weather = WeatherSystem::new();
        weather.start(WeatherKind::Rain, &assets, &terrain);
        weather.start(WeatherKind::Snow, &assets, &terrain);
        assert_eq!(weather.stop_all(), 2);
        assert!(weather.active().is_empty());
        assert!(weather.update(Duration::from_secs(20)).is_empty());
    }

    #[test]
    fn wind_counts_gusts() {
        let mut weather = WeatherSystem::new();
        weather.apply_wind();
        weather.apply_wind();
        assert_eq!(weather.wind_gusts(), 2);
    }
}
