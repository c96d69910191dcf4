//! Color bands for normalized terrain heights.

/// Elevation band of a normalized height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainBand {
    Water,
    Sand,
    Grass,
    Rock,
    Snow,
}

impl TerrainBand {
    /// Band for a height in [0, 1]. Thresholds are strict: 0.8 is still rock.
    pub fn classify(height: f32) -> Self {
        if height > 0.8 {
            Self::Snow
        } else if height > 0.6 {
            Self::Rock
        } else if height > 0.4 {
            Self::Grass
        } else if height > 0.2 {
            Self::Sand
        } else {
            Self::Water
        }
    }

    /// Vertex color (RGBA) for this band.
    pub fn color(self) -> [f32; 4] {
        match self {
            // Light gray
            Self::Snow => [0.8, 0.8, 0.8, 1.0],
            // Gray
            Self::Rock => [0.5, 0.5, 0.5, 1.0],
            // Dark green
            Self::Grass => [0.2, 0.6, 0.2, 1.0],
            // Brown
            Self::Sand => [0.6, 0.5, 0.2, 1.0],
            // Dark blue
            Self::Water => [0.2, 0.4, 0.6, 1.0],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Sand => "sand",
            Self::Grass => "grass",
            Self::Rock => "rock",
            Self::Snow => "snow",
        }
    }
}

/// Shorthand for `TerrainBand::classify(height).color()`.
#[inline]
pub fn height_color(height: f32) -> [f32; 4] {
    TerrainBand::classify(height).color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries_are_strict() {
        assert_eq!(TerrainBand::classify(0.8), TerrainBand::Rock);
        assert_eq!(TerrainBand::classify(0.81), TerrainBand::Snow);
        assert_eq!(TerrainBand::classify(0.6), TerrainBand::Grass);
        assert_eq!(TerrainBand::classify(0.4), TerrainBand::Sand);
        assert_eq!(TerrainBand::classify(0.2), TerrainBand::Water);
        assert_eq!(TerrainBand::classify(0.0), TerrainBand::Water);
        assert_eq!(TerrainBand::classify(1.0), TerrainBand::Snow);
    }

    #[test]
    fn colors_per_band() {
        assert_eq!(height_color(0.9), [0.8, 0.8, 0.8, 1.0]);
        assert_eq!(height_color(0.8), [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(height_color(0.5), [0.2, 0.6, 0.2, 1.0]);
        assert_eq!(height_color(0.3), [0.6, 0.5, 0.2, 1.0]);
        assert_eq!(height_color(0.0), [0.2, 0.4, 0.6, 1.0]);
    }
}
