//! Application configuration. Loaded from config.ron at startup.

use procgen::{BorderPolicy, ErosionParameters, NoiseParameters, TerrainSettings};
use renderer::FogSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Terrain generation settings as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub width: usize,
    pub height: usize,
    /// Base noise frequency across the whole field.
    pub scale: f32,
    pub octaves: u32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub smooth_radius: usize,
    /// Keep input heights on the smoothing border instead of zeroing them.
    pub copy_border: bool,
    pub erosion_radius: usize,
    pub erosion_strength: f32,
    pub erosion_passes: u32,
    /// World height of the highest normalized point.
    pub height_scale: f32,
    /// Perlin lattice seed.
    pub noise_seed: u32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        let settings = TerrainSettings::default();
        Self {
            width: settings.width,
            height: settings.height,
            scale: settings.noise.scale,
            octaves: settings.noise.octaves,
            persistence: settings.noise.persistence,
            lacunarity: settings.noise.lacunarity,
            smooth_radius: settings.smooth_radius,
            copy_border: settings.border == BorderPolicy::CopyInput,
            erosion_radius: settings.erosion.radius,
            erosion_strength: settings.erosion.strength,
            erosion_passes: settings.erosion_passes,
            height_scale: settings.height_scale,
            noise_seed: 0,
        }
    }
}

impl TerrainConfig {
    pub fn to_settings(&self) -> TerrainSettings {
        TerrainSettings {
            width: self.width,
            height: self.height,
            noise: NoiseParameters {
                octaves: self.octaves,
                persistence: self.persistence,
                lacunarity: self.lacunarity,
                scale: self.scale,
                ..Default::default()
            },
            smooth_radius: self.smooth_radius,
            border: if self.copy_border {
                BorderPolicy::CopyInput
            } else {
                BorderPolicy::Zero
            },
            erosion: ErosionParameters {
                radius: self.erosion_radius,
                strength: self.erosion_strength,
            },
            erosion_passes: self.erosion_passes,
            height_scale: self.height_scale,
        }
    }
}

/// Persistent settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub terrain: TerrainConfig,
    /// Fixed RNG seed for noise offsets; random per run when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Directory holding `Materials/*.ron` and `Effects/*.ron`.
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,
    /// Main loop ticks per second.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// Write a color preview PNG here after every generation.
    #[serde(default)]
    pub preview_path: Option<PathBuf>,
    #[serde(default)]
    pub fog: FogSettings,
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("assets")
}
fn default_tick_rate() -> f64 {
    30.0
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            seed: None,
            asset_root: default_asset_root(),
            tick_rate: default_tick_rate(),
            preview_path: None,
            fog: FogSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load config from `config.ron`, writing defaults there on first run.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path);
            return config;
        }
        Self::load_from(&path)
    }

    /// Load config from `path`. If the file is missing or invalid, returns default config.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save config to `path`. Logs on error.
    pub fn save_to(&self, path: &Path) {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                } else {
                    log::info!("Wrote config to {:?}", path);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_defaults() {
        let config = AppConfig::default();
        let settings = config.terrain.to_settings();
        assert_eq!(settings, TerrainSettings::default());
        assert_eq!(settings.noise.octaves, 4);
        assert_eq!(settings.noise.persistence, 0.3);
        assert_eq!(settings.erosion.radius, 3);
        assert_eq!(settings.height_scale, 50.0);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let config: AppConfig =
            ron::from_str("(terrain: (width: 64, copy_border: false), seed: Some(5))").unwrap();
        assert_eq!(config.terrain.width, 64);
        assert_eq!(config.terrain.height, 256);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.tick_rate, 30.0);
        assert_eq!(config.terrain.to_settings().border, BorderPolicy::Zero);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("terragen-bad-{}.ron", std::process::id()));
        std::fs::write(&path, "(terrain: (width: \"wide\"))").unwrap();
        let config = AppConfig::load_from(&path);
        assert_eq!(config.terrain, TerrainConfig::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn saved_config_loads_back() {
        let path = std::env::temp_dir().join(format!("terragen-save-{}.ron", std::process::id()));
        let mut config = AppConfig::default();
        config.terrain.erosion_passes = 3;
        config.preview_path = Some(PathBuf::from("out.png"));
        config.save_to(&path);

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.terrain.erosion_passes, 3);
        assert_eq!(loaded.preview_path, Some(PathBuf::from("out.png")));
        assert_eq!(loaded.fog, config.fog);
        let _ = std::fs::remove_file(&path);
    }
}
