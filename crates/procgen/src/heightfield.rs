//! 2D grid of elevation samples shared by every pipeline stage.

use std::ops::Range;

use crate::error::TerrainError;

/// A `width × height` grid of scalar heights.
///
/// Cells are stored column by column: `(x, y)` lives at `x * height + y`.
/// That is the same order the mesh builder assigns vertex indices in, so a
/// heightfield and its mesh can be walked in lockstep.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightfield {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

/// Cells at least `radius` away from every edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interior {
    pub x: Range<usize>,
    pub y: Range<usize>,
}

impl Interior {
    /// Iterate interior coordinates in storage order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.x
            .clone()
            .flat_map(move |x| self.y.clone().map(move |y| (x, y)))
    }

    /// Whether `(x, y)` is inside the interior.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.x.contains(&x) && self.y.contains(&y)
    }
}

impl Heightfield {
    /// Zero-initialised field.
    pub fn new(width: usize, height: usize) -> Result<Self, TerrainError> {
        Self::filled(width, height, 0.0)
    }

    /// Field with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> Result<Self, TerrainError> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            values: vec![value; width * height],
        })
    }

    /// Field whose cell `(x, y)` is `f(x, y)`.
    pub fn from_fn(
        width: usize,
        height: usize,
        mut f: impl FnMut(usize, usize) -> f32,
    ) -> Result<Self, TerrainError> {
        let mut field = Self::new(width, height)?;
        for x in 0..width {
            for y in 0..height {
                let idx = field.index(x, y);
                field.values[idx] = f(x, y);
            }
        }
        Ok(field)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (`width * height`).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: construction rejects empty dimensions.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Storage index of `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        x * self.height + y
    }

    /// Height at `(x, y)`. Panics when out of bounds, like slice indexing.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[self.index(x, y)]
    }

    /// Height at `(x, y)`, or `None` outside the grid.
    pub fn try_get(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.get(x, y))
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        let idx = self.index(x, y);
        self.values[idx] = value;
    }

    /// Raw values in storage order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Smallest and largest value in the field.
    pub fn min_max(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }

    /// Interior for a square window of half-width `radius`.
    ///
    /// Returns `None` when either axis is shorter than `2 * radius + 1`:
    /// no cell then has a full window and neighborhood stages leave the
    /// interior untouched.
    pub fn interior(&self, radius: usize) -> Option<Interior> {
        let window = 2 * radius + 1;
        if self.width < window || self.height < window {
            return None;
        }
        Some(Interior {
            x: radius..self.width - radius,
            y: radius..self.height - radius,
        })
    }

    /// Bilinear sample at fractional grid coordinates, clamped to the grid.
    pub fn sample_bilinear(&self, gx: f32, gy: f32) -> f32 {
        let max_x = (self.width - 1) as f32;
        let max_y = (self.height - 1) as f32;
        let gx = gx.clamp(0.0, max_x);
        let gy = gy.clamp(0.0, max_y);

        let x0 = gx.floor() as usize;
        let y0 = gy.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let fx = gx - x0 as f32;
        let fy = gy - y0 as f32;

        let h00 = self.get(x0, y0);
        let h10 = self.get(x1, y0);
        let h01 = self.get(x0, y1);
        let h11 = self.get(x1, y1);

        let top = h00 + (h10 - h00) * fx;
        let bottom = h01 + (h11 - h01) * fx;
        top + (bottom - top) * fy
    }
}
