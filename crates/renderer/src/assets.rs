//! Material and particle-effect lookup.
//!
//! Lookups return `Result` so a missing asset is a value the caller decides
//! about. Terrain generation never depends on an asset being present.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TERRAIN_MATERIAL: &str = "Materials/TerrainMaterial";
pub const RAIN_MATERIAL: &str = "Materials/RainMaterial";
pub const RAIN_EFFECT: &str = "Effects/Rain";
pub const SNOW_EFFECT: &str = "Effects/Snow";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Material,
    ParticleEffect,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Material => write!(f, "material"),
            Self::ParticleEffect => write!(f, "particle effect"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("{kind} not found: {path}")]
    Missing { kind: AssetKind, path: String },

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid asset {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

impl AssetError {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// Surface description for a mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// RGBA multiplier over vertex colors.
    #[serde(default = "default_base_color")]
    pub base_color: [f32; 4],
    #[serde(default = "default_roughness")]
    pub roughness: f32,
    /// Optional albedo texture, relative to the asset root.
    #[serde(default)]
    pub texture: Option<String>,
}

fn default_base_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}
fn default_roughness() -> f32 {
    0.9
}

impl Material {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_color: default_base_color(),
            roughness: default_roughness(),
            texture: None,
        }
    }
}

/// Particle system template (rain, snow, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleEffect {
    pub name: String,
    /// Particles emitted per second.
    pub emission_rate: f32,
    /// Seconds each particle lives.
    pub lifetime: f32,
    #[serde(default = "default_start_color")]
    pub start_color: [f32; 4],
    /// Initial downward speed in units per second.
    #[serde(default = "default_fall_speed")]
    pub fall_speed: f32,
    #[serde(default = "default_max_particles")]
    pub max_particles: u32,
}

fn default_start_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}
fn default_fall_speed() -> f32 {
    5.0
}
fn default_max_particles() -> u32 {
    1000
}

impl ParticleEffect {
    pub fn named(name: impl Into<String>, emission_rate: f32, lifetime: f32) -> Self {
        Self {
            name: name.into(),
            emission_rate,
            lifetime,
            start_color: default_start_color(),
            fall_speed: default_fall_speed(),
            max_particles: default_max_particles(),
        }
    }
}

/// Source of materials and particle effects, addressed by slash-separated paths.
pub trait AssetStore: Send + Sync {
    fn load_material(&self, path: &str) -> Result<Material, AssetError>;
    fn load_particle_effect(&self, path: &str) -> Result<ParticleEffect, AssetError>;
}

/// Assets stored as `<root>/<path>.ron`.
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_for(&self, path: &str) -> PathBuf {
        self.root.join(format!("{path}.ron"))
    }

    fn load<T: serde::de::DeserializeOwned>(
        &self,
        kind: AssetKind,
        path: &str,
    ) -> Result<T, AssetError> {
        let file = self.file_for(path);
        let data = match std::fs::read_to_string(&file) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AssetError::Missing {
                    kind,
                    path: path.to_string(),
                })
            }
            Err(source) => return Err(AssetError::Io { path: file, source }),
        };
        ron::from_str(&data).map_err(|source| AssetError::Parse { path: file, source })
    }
}

impl AssetStore for DirectoryAssets {
    fn load_material(&self, path: &str) -> Result<Material, AssetError> {
        self.load(AssetKind::Material, path)
    }

    fn load_particle_effect(&self, path: &str) -> Result<ParticleEffect, AssetError> {
        self.load(AssetKind::ParticleEffect, path)
    }
}

/// In-memory asset table.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    materials: HashMap<String, Material>,
    effects: HashMap<String, ParticleEffect>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_material(mut self, path: &str, material: Material) -> Self {
        self.materials.insert(path.to_string(), material);
        self
    }

    pub fn with_effect(mut self, path: &str, effect: ParticleEffect) -> Self {
        self.effects.insert(path.to_string(), effect);
        self
    }
}

impl AssetStore for MemoryAssets {
    fn load_material(&self, path: &str) -> Result<Material, AssetError> {
        self.materials.get(path).cloned().ok_or_else(|| AssetError::Missing {
            kind: AssetKind::Material,
            path: path.to_string(),
        })
    }

    fn load_particle_effect(&self, path: &str) -> Result<ParticleEffect, AssetError> {
        self.effects.get(path).cloned().ok_or_else(|| AssetError::Missing {
            kind: AssetKind::ParticleEffect,
            path: path.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("terrain-assets-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("Materials")).unwrap();
        std::fs::create_dir_all(dir.join("Effects")).unwrap();
        dir
    }

    #[test]
    fn memory_store_reports_missing() {
        let assets =
            MemoryAssets::new().with_material(TERRAIN_MATERIAL, Material::named("terrain"));
        assert_eq!(assets.load_material(TERRAIN_MATERIAL).unwrap().name, "terrain");

        let err = assets.load_particle_effect(RAIN_EFFECT).unwrap_err();
        assert!(err.is_missing());
        assert_eq!(err.to_string(), "particle effect not found: Effects/Rain");
    }

    #[test]
    fn directory_store_reads_ron() {
        let dir = scratch_dir("read");
        std::fs::write(
            dir.join("Materials/TerrainMaterial.ron"),
            r#"(name: "terrain", roughness: 0.5)"#,
        )
        .unwrap();
        std::fs::write(
            dir.join("Effects/Snow.ron"),
            r#"(name: "snow", emission_rate: 200.0, lifetime: 6.0, fall_speed: 1.0)"#,
        )
        .unwrap();

        let assets = DirectoryAssets::new(&dir);
        let material = assets.load_material(TERRAIN_MATERIAL).unwrap();
        assert_eq!(material.roughness, 0.5);
        assert_eq!(material.base_color, [1.0, 1.0, 1.0, 1.0]);

        let snow = assets.load_particle_effect(SNOW_EFFECT).unwrap();
        assert_eq!(snow.fall_speed, 1.0);
        assert_eq!(snow.max_particles, 1000);

        assert!(assets.load_particle_effect(RAIN_EFFECT).unwrap_err().is_missing());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn directory_store_reports_parse_errors() {
        let dir = scratch_dir("parse");
        std::fs::write(dir.join("Materials/RainMaterial.ron"), "(name: ").unwrap();
        let assets = DirectoryAssets::new(&dir);
        let err = assets.load_material(RAIN_MATERIAL).unwrap_err();
        assert!(matches!(err, AssetError::Parse { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
