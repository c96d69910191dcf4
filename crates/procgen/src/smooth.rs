//! Box-average smoothing.

use crate::heightfield::Heightfield;

/// Default half-width of the smoothing window (a 5x5 box).
pub const DEFAULT_SMOOTH_RADIUS: usize = 2;

/// What border cells (closer than `radius` to an edge) hold after smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderPolicy {
    /// Border cells keep their input height.
    #[default]
    CopyInput,
    /// Border cells are left at 0, which drops the terrain edge to the floor.
    Zero,
}

/// Replace each interior cell with the mean of its `(2r+1)^2` window.
///
/// Fields too small to have an interior for `radius` come back with only the
/// border policy applied.
pub fn smooth(field: &Heightfield, radius: usize, border: BorderPolicy) -> Heightfield {
    let mut out = match border {
        BorderPolicy::CopyInput => field.clone(),
        BorderPolicy::Zero => {
            let mut zeroed = field.clone();
            zeroed.values_mut().fill(0.0);
            zeroed
        }
    };

    let Some(interior) = field.interior(radius) else {
        log::warn!(
            "smoothing skipped: {}x{} field has no interior for radius {}",
            field.width(),
            field.height(),
            radius
        );
        return out;
    };

    let r = radius as isize;
    let count = ((2 * radius + 1) * (2 * radius + 1)) as f32;

    for (x, y) in interior.cells() {
        let mut total = 0.0;
        for dx in -r..=r {
            for dy in -r..=r {
                let nx = (x as isize + dx) as usize;
                let ny = (y as isize + dy) as usize;
                total += field.get(nx, ny);
            }
        }
        out.set(x, y, total / count);
    }

    out
}
