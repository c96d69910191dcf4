//! Rescale a raw noise field into [0, 1].

use crate::heightfield::Heightfield;
use crate::noise_field::RawField;

/// Map every cell to `(v - min) / (max - min)`, clamped to [0, 1].
///
/// A flat field (`max == min`) has no usable range; every cell becomes 0.
pub fn normalize(mut field: Heightfield, min: f32, max: f32) -> Heightfield {
    let range = max - min;
    if !(range.is_finite() && range > 0.0) {
        log::debug!("degenerate height range [{}, {}], flattening to 0", min, max);
        field.values_mut().fill(0.0);
        return field;
    }

    for v in field.values_mut() {
        *v = ((*v - min) / range).clamp(0.0, 1.0);
    }
    field
}

/// Normalize a freshly generated noise field using its tracked extremes.
pub fn normalize_raw(raw: RawField) -> Heightfield {
    normalize(raw.field, raw.min, raw.max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_spans_unit_range() {
        let field = Heightfield::from_fn(6, 5, |x, y| (x as f32 * 1.7) - (y as f32 * 3.1)).unwrap();
        let (min, max) = field.min_max();
        let out = normalize(field, min, max);

        assert!(out.values().iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(out.values().contains(&0.0));
        assert!(out.values().contains(&1.0));
    }

    #[test]
    fn constant_field_normalizes_to_zero() {
        for v in [-12.5_f32, 0.0, 0.5, 900.0] {
            let field = Heightfield::filled(4, 4, v).unwrap();
            let out = normalize(field, v, v);
            assert!(out.values().iter().all(|&c| c == 0.0), "value {v}");
        }
    }

    #[test]
    fn values_outside_observed_range_are_clamped() {
        let field = Heightfield::from_fn(3, 1, |x, _| x as f32 * 10.0 - 5.0).unwrap();
        let out = normalize(field, 0.0, 10.0);
        assert_eq!(out.values(), &[0.0, 0.5, 1.0]);
    }
}
