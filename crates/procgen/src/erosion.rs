//! Neighbor-diffusion erosion: each cell sheds height toward its lower neighbors.

use crate::error::TerrainError;
use crate::heightfield::Heightfield;

/// Erosion settings for a single pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErosionParameters {
    /// Half-width of the neighborhood window (>= 1).
    pub radius: usize,
    /// Fraction in [0, 1] of the average downhill difference removed per pass.
    pub strength: f32,
}

impl Default for ErosionParameters {
    fn default() -> Self {
        Self {
            radius: 3,
            strength: 0.01,
        }
    }
}

impl ErosionParameters {
    pub fn validate(&self) -> Result<(), TerrainError> {
        if self.radius == 0 {
            return Err(TerrainError::parameter("erosion.radius", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.strength) {
            return Err(TerrainError::parameter(
                "erosion.strength",
                format!("must be in [0, 1], got {}", self.strength),
            ));
        }
        Ok(())
    }
}

/// One in-place erosion sweep.
///
/// Interior cells are visited in storage order, so later cells see the
/// already-lowered heights of earlier ones. Returns how many cells were lowered.
pub fn erode(field: &mut Heightfield, params: &ErosionParameters) -> usize {
    let Some(interior) = field.interior(params.radius) else {
        log::warn!(
            "erosion skipped: {}x{} field has no interior for radius {}",
            field.width(),
            field.height(),
            params.radius
        );
        return 0;
    };

    let r = params.radius as isize;
    let mut lowered = 0;

    for (x, y) in interior.cells() {
        let current = field.get(x, y);
        let mut total_diff = 0.0;
        let mut count = 0u32;

        for dx in -r..=r {
            for dy in -r..=r {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = (x as isize + dx) as usize;
                let ny = (y as isize + dy) as usize;
                let diff = current - field.get(nx, ny);
                if diff > 0.0 {
                    total_diff += diff;
                    count += 1;
                }
            }
        }

        if count > 0 {
            let avg = total_diff / count as f32;
            field.set(x, y, current - avg * params.strength);
            if params.strength > 0.0 {
                lowered += 1;
            }
        }
    }

    lowered
}

/// Run `passes` sweeps back to back; each compounds on the previous one.
pub fn erode_passes(field: &mut Heightfield, params: &ErosionParameters, passes: u32) -> usize {
    (0..passes).map(|_| erode(field, params)).sum()
}
