//! Dimensions: per-row attribute values pulled from a frame field

use ahash::AHashMap;
use arrow::record_batch::RecordBatch;
use gm_core::{field_by_name, FieldMatch, Rgba};
use std::sync::Arc;

use super::colors::{categorical_color, ColorScheme};

/// Per-row values of one visual attribute, bound to a single frame
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension<T> {
    /// Field the values were read from
    pub field: String,
    /// Value used for rows without data
    pub fixed: T,
    values: Arc<[T]>,
}

impl<T: Copy> Dimension<T> {
    pub fn new(field: impl Into<String>, fixed: T, values: Vec<T>) -> Self {
        Self {
            field: field.into(),
            fixed,
            values: values.into(),
        }
    }

    /// A dimension whose field is missing from the frame: every row gets `fixed`
    pub fn unbound(field: impl Into<String>, fixed: T) -> Self {
        Self::new(field, fixed, Vec::new())
    }

    pub fn get(&self, row: usize) -> T {
        self.values.get(row).copied().unwrap_or(self.fixed)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Dimensions bound to one frame, created fresh by each data update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleDims {
    pub color: Option<Dimension<Rgba>>,
    pub line_width: Option<Dimension<f32>>,
    pub opacity: Option<Dimension<f32>>,
}

impl StyleDims {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.line_width.is_none() && self.opacity.is_none()
    }
}

/// Look up a dimension's field, logging when the frame does not have it
fn lookup(frame: &RecordBatch, field: &str) -> Option<FieldMatch> {
    let found = field_by_name(frame, field);
    if found.is_none() {
        tracing::warn!("Style field {} not found in frame, using fixed value", field);
    }
    found
}

fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// Colors for each row of `field`.
///
/// Numeric fields are normalized over their range and mapped through `scheme`;
/// other fields get a categorical color per distinct value.
pub fn color_dimension(
    frame: &RecordBatch,
    field: &str,
    scheme: ColorScheme,
    fixed: Rgba,
) -> Dimension<Rgba> {
    let Some(found) = lookup(frame, field) else {
        return Dimension::unbound(field, fixed);
    };

    if found.is_numeric() {
        let numbers = match found.numbers() {
            Ok(numbers) => numbers,
            Err(e) => {
                tracing::warn!("Could not read color field {}: {}", field, e);
                return Dimension::unbound(field, fixed);
            }
        };
        let Some((min, max)) = finite_range(&numbers) else {
            return Dimension::new(field, fixed, vec![fixed; numbers.len()]);
        };
        let delta = max - min;
        let values = numbers
            .iter()
            .map(|v| {
                if !v.is_finite() {
                    fixed
                } else if delta > 0.0 {
                    scheme.color(((v - min) / delta) as f32)
                } else {
                    scheme.color(1.0)
                }
            })
            .collect();
        return Dimension::new(field, fixed, values);
    }

    let text = match found.strings() {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Could not read color field {}: {}", field, e);
            return Dimension::unbound(field, fixed);
        }
    };
    let mut categories: AHashMap<String, usize> = AHashMap::new();
    let values = text
        .into_iter()
        .map(|v| match v {
            Some(v) => {
                let next = categories.len();
                categorical_color(*categories.entry(v).or_insert(next))
            }
            None => fixed,
        })
        .collect();
    Dimension::new(field, fixed, values)
}

/// Values of `field` scaled linearly from the field's range into `[min, max]`.
///
/// A constant field or an empty output range maps every row to `max`;
/// missing values map to `min`.
pub fn scale_dimension(
    frame: &RecordBatch,
    field: &str,
    min: f32,
    max: f32,
    fixed: f32,
) -> Dimension<f32> {
    let Some(found) = lookup(frame, field) else {
        return Dimension::unbound(field, fixed);
    };
    let numbers = match found.numbers() {
        Ok(numbers) => numbers,
        Err(e) => {
            tracing::warn!("Could not read scale field {}: {}", field, e);
            return Dimension::unbound(field, fixed);
        }
    };

    let range = finite_range(&numbers);
    let out_delta = max - min;
    let values = numbers
        .iter()
        .map(|v| match range {
            _ if !v.is_finite() => min,
            Some((lo, hi)) if hi > lo && out_delta > 0.0 => {
                min + (((v - lo) / (hi - lo)) as f32) * out_delta
            }
            _ => max,
        })
        .collect();
    Dimension::new(field, fixed, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array, StringArray};

    fn frame() -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            (
                "weight",
                Arc::new(Float64Array::from(vec![Some(0.0), Some(5.0), Some(10.0), None]))
                    as ArrayRef,
            ),
            (
                "kind",
                Arc::new(StringArray::from(vec![Some("a"), Some("b"), Some("a"), None]))
                    as ArrayRef,
            ),
            ("flat", Arc::new(Float64Array::from(vec![2.0, 2.0, 2.0, 2.0])) as ArrayRef),
        ])
        .unwrap()
    }

    #[test]
    fn test_scale_maps_field_range() {
        let dim = scale_dimension(&frame(), "weight", 1.0, 21.0, 6.0);
        assert_eq!(dim.get(0), 1.0);
        assert_eq!(dim.get(1), 11.0);
        assert_eq!(dim.get(2), 21.0);
        assert_eq!(dim.get(3), 1.0);
        // Out of range rows fall back to the fixed value
        assert_eq!(dim.get(99), 6.0);
    }

    #[test]
    fn test_scale_constant_field_uses_max() {
        let dim = scale_dimension(&frame(), "flat", 1.0, 20.0, 6.0);
        assert_eq!(dim.get(0), 20.0);
    }

    #[test]
    fn test_missing_field_is_unbound() {
        let dim = scale_dimension(&frame(), "nope", 1.0, 20.0, 6.0);
        assert!(dim.is_empty());
        assert_eq!(dim.get(0), 6.0);
    }

    #[test]
    fn test_numeric_color_uses_scheme() {
        let fixed = Rgba::from_rgb(0, 0, 0);
        let dim = color_dimension(&frame(), "weight", ColorScheme::Viridis, fixed);
        assert_eq!(dim.get(0), ColorScheme::Viridis.color(0.0));
        assert_eq!(dim.get(2), ColorScheme::Viridis.color(1.0));
        assert_eq!(dim.get(3), fixed);
    }

    #[test]
    fn test_text_color_is_categorical() {
        let fixed = Rgba::from_rgb(0, 0, 0);
        let dim = color_dimension(&frame(), "kind", ColorScheme::Viridis, fixed);
        assert_eq!(dim.get(0), categorical_color(0));
        assert_eq!(dim.get(1), categorical_color(1));
        assert_eq!(dim.get(2), dim.get(0));
        assert_eq!(dim.get(3), fixed);
    }
}
