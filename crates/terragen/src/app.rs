//! Application state: current terrain, background regeneration, weather.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use procgen::{BackgroundGenerator, GeneratedTerrain, PerlinSource, RequestStatus, TerrainGenerator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use renderer::{AssetStore, FogSettings, TerrainRenderable};

use crate::commands::{Command, HELP};
use crate::config::AppConfig;
use crate::preview::save_preview;
use crate::weather::{WeatherKind, WeatherSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    generator: TerrainGenerator,
    worker: BackgroundGenerator,
    assets: Box<dyn AssetStore>,
    weather: WeatherSystem,
    fog: FogSettings,
    renderable: TerrainRenderable,
    preview_path: Option<std::path::PathBuf>,
    generations: u64,
}

impl App {
    /// Build the app and generate the first terrain synchronously.
    pub fn new(config: &AppConfig, assets: Box<dyn AssetStore>) -> Result<Self> {
        let settings = config.terrain.to_settings();
        let source = Arc::new(PerlinSource::new(config.terrain.noise_seed));
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut generator = TerrainGenerator::with_source(settings, source, rng)
            .context("invalid terrain settings")?;

        let worker = BackgroundGenerator::for_generator(&generator);
        let terrain = generator.regenerate().context("initial terrain generation")?;
        let renderable = TerrainRenderable::prepare(&terrain.mesh, assets.as_ref());

        let fog = config.fog;
        if fog.enabled {
            log::info!(
                "Fog: {:?}, density {}, color {:?}",
                fog.mode,
                fog.density,
                fog.color
            );
        }

        let app = Self {
            generator,
            worker,
            assets,
            weather: WeatherSystem::new(),
            fog,
            renderable,
            preview_path: config.preview_path.clone(),
            generations: 1,
        };
        app.write_configured_preview();
        Ok(app)
    }

    /// Run one command. Failures are logged; only `quit` ends the session.
    pub fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Regenerate => {
                if let Err(e) = self.request_regenerate() {
                    log::error!("Could not start terrain generation: {:#}", e);
                }
            }
            Command::Rain => self.start_weather(WeatherKind::Rain),
            Command::Snow => self.start_weather(WeatherKind::Snow),
            Command::Wind => self.weather.apply_wind(),
            Command::Height { x, y } => match self.generator.height_at(x, y) {
                Some(h) => log::info!("Height at ({}, {}): {:.3}", x, y, h),
                None => log::warn!("({}, {}) is outside the terrain", x, y),
            },
            Command::Preview(path) => {
                if let Some(terrain) = self.terrain() {
                    if let Err(e) = save_preview(&terrain.heightfield, &path) {
                        log::warn!("Could not write preview: {:#}", e);
                    }
                }
            }
            Command::Status => self.log_status(),
            Command::Help => println!("{HELP}"),
            Command::Quit => {
                let stopped = self.weather.stop_all();
                if stopped > 0 {
                    log::info!("Stopped {} weather effect(s)", stopped);
                }
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Ask the background worker for new terrain. Ignored while a run is in flight.
    pub fn request_regenerate(&mut self) -> Result<RequestStatus> {
        if self.worker.is_busy() {
            log::info!("Terrain generation already running, request ignored");
            return Ok(RequestStatus::Busy);
        }
        let offset = self.generator.next_offset();
        let status = self.worker.request(offset)?;
        if let RequestStatus::Started { id } = status {
            log::info!("Regenerating terrain (#{})", id);
        }
        Ok(status)
    }

    /// Per-tick work: pick up finished terrain and advance weather.
    pub fn update(&mut self, dt: Duration) {
        while let Some(outcome) = self.worker.try_recv() {
            match outcome.result {
                Ok(terrain) => self.install(terrain),
                Err(e) => log::error!("Terrain generation #{} failed: {}", outcome.id, e),
            }
        }
        self.weather.update(dt);
    }

    fn install(&mut self, terrain: Arc<GeneratedTerrain>) {
        // Renderable is built first, then both are swapped in together.
        let renderable = TerrainRenderable::prepare(&terrain.mesh, self.assets.as_ref());
        self.generator.install(terrain);
        self.renderable = renderable;
        self.generations += 1;
        log::info!(
            "Terrain updated: {} vertices, {} indices",
            self.renderable.mesh.vertices.len(),
            self.renderable.mesh.indices.len()
        );
        self.write_configured_preview();
    }

    fn start_weather(&mut self, kind: WeatherKind) {
        let Some(terrain) = self.generator.current().cloned() else {
            log::warn!("No terrain yet for {:?}", kind);
            return;
        };
        self.weather.start(kind, self.assets.as_ref(), &terrain);
    }

    fn write_configured_preview(&self) {
        let (Some(path), Some(terrain)) = (&self.preview_path, self.terrain()) else {
            return;
        };
        if let Err(e) = save_preview(&terrain.heightfield, path) {
            log::warn!("Could not write preview: {:#}", e);
        }
    }

    fn log_status(&self) {
        let Some(terrain) = self.terrain() else {
            return;
        };
        let (lo, hi) = terrain.mesh.height_range().unwrap_or((0.0, 0.0));
        log::info!(
            "Terrain {}x{} at offset ({:.1}, {:.1}); heights {:.2}..{:.2}",
            terrain.heightfield.width(),
            terrain.heightfield.height(),
            terrain.offset.x,
            terrain.offset.y,
            lo,
            hi
        );
        log::info!(
            "{} generation(s); {} active weather effect(s); worker {}",
            self.generations,
            self.weather.active().len(),
            if self.worker.is_busy() { "busy" } else { "idle" }
        );
        log::info!("Fog visibility at 10 units: {:.3}", self.fog.visibility(10.0));
    }

    pub fn terrain(&self) -> Option<&Arc<GeneratedTerrain>> {
        self.generator.current()
    }

    pub fn renderable(&self) -> &TerrainRenderable {
        &self.renderable
    }

    pub fn weather(&self) -> &WeatherSystem {
        &self.weather
    }

    pub fn is_generating(&self) -> bool {
        self.worker.is_busy()
    }

    pub fn generations(&self) -> u64 {
        self.generations
    }
}
