//! Distance fog settings handed to whatever draws the terrain.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Fog falloff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FogMode {
    /// Fades linearly from `start` to `end` distance.
    Linear { start: f32, end: f32 },
    Exponential,
    ExponentialSquared,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FogSettings {
    pub enabled: bool,
    /// Linear RGB.
    pub color: [f32; 3],
    pub mode: FogMode,
    pub density: f32,
}

impl Default for FogSettings {
    /// Light gray exponential-squared haze.
    fn default() -> Self {
        Self {
            enabled: true,
            color: [0.7, 0.7, 0.7],
            mode: FogMode::ExponentialSquared,
            density: 0.1,
        }
    }
}

impl FogSettings {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Fraction of the surface color that survives at `distance` (1 = no fog).
    pub fn visibility(&self, distance: f32) -> f32 {
        if !self.enabled {
            return 1.0;
        }
        let d = distance.max(0.0);
        let v = match self.mode {
            FogMode::Linear { start, end } => {
                if end <= start {
                    if d < start {
                        1.0
                    } else {
                        0.0
                    }
                } else {
                    (end - d) / (end - start)
                }
            }
            FogMode::Exponential => (-self.density * d).exp(),
            FogMode::ExponentialSquared => {
                let k = self.density * d;
                (-k * k).exp()
            }
        };
        v.clamp(0.0, 1.0)
    }

    /// Blend `color` toward the fog color for a surface `distance` away.
    pub fn apply(&self, color: [f32; 3], distance: f32) -> [f32; 3] {
        let t = self.visibility(distance);
        [
            self.color[0] + (color[0] - self.color[0]) * t,
            self.color[1] + (color[1] - self.color[1]) * t,
            self.color[2] + (color[2] - self.color[2]) * t,
        ]
    }

    pub fn to_uniform(&self) -> FogUniform {
        let (mode, start, end) = match self.mode {
            FogMode::Linear { start, end } => (0.0, start, end),
            FogMode::Exponential => (1.0, 0.0, 0.0),
            FogMode::ExponentialSquared => (2.0, 0.0, 0.0),
        };
        FogUniform {
            color: [
                self.color[0],
                self.color[1],
                self.color[2],
                if self.enabled { 1.0 } else { 0.0 },
            ],
            fog_params: [self.density, mode, start, end],
        }
    }
}

/// Shader-side fog block.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FogUniform {
    /// rgb = fog color, w = enabled (0 or 1)
    pub color: [f32; 4],
    /// density, mode (0 linear, 1 exp, 2 exp2), start, end
    pub fog_params: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_gray_exp2() {
        let fog = FogSettings::default();
        assert!(fog.enabled);
        assert_eq!(fog.color, [0.7, 0.7, 0.7]);
        assert_eq!(fog.mode, FogMode::ExponentialSquared);
        assert_eq!(fog.density, 0.1);
    }

    #[test]
    fn visibility_falls_with_distance() {
        let fog = FogSettings::default();
        assert_eq!(fog.visibility(0.0), 1.0);
        let near = fog.visibility(5.0);
        let far = fog.visibility(20.0);
        assert!(near > far);
        // exp(-(0.1 * 10)^2) = exp(-1)
        assert!((fog.visibility(10.0) - (-1.0f32).exp()).abs() < 1e-6);
    }

    #[test]
    fn linear_mode_ramps() {
        let fog = FogSettings {
            mode: FogMode::Linear { start: 10.0, end: 30.0 },
            ..Default::default()
        };
        assert_eq!(fog.visibility(5.0), 1.0);
        assert!((fog.visibility(20.0) - 0.5).abs() < 1e-6);
        assert_eq!(fog.visibility(40.0), 0.0);
    }

    #[test]
    fn disabled_fog_keeps_color() {
        let fog = FogSettings::disabled();
        assert_eq!(fog.apply([0.1, 0.2, 0.3], 1000.0), [0.1, 0.2, 0.3]);
        assert_eq!(fog.to_uniform().color[3], 0.0);
    }

    #[test]
    fn dense_fog_replaces_color() {
        let fog = FogSettings::default();
        let c = fog.apply([0.0, 0.0, 0.0], 1000.0);
        assert!(c.iter().all(|&v| (v - 0.7).abs() < 1e-6));
    }
}
