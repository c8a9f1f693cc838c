//! Per-feature style evaluation

use gm_core::{Feature, FeatureStyle, StyleFn};
use std::sync::Arc;

use super::dims::StyleDims;

/// Style of the feature at `row`.
///
/// Returns `base` unchanged when the feature has no row or no dimensions are bound.
pub fn evaluate(row: Option<usize>, dims: Option<&StyleDims>, base: &FeatureStyle) -> FeatureStyle {
    let (Some(row), Some(dims)) = (row, dims) else {
        return *base;
    };

    let mut style = *base;
    if let Some(color) = &dims.color {
        style.color = color.get(row);
    }
    if let Some(width) = &dims.line_width {
        style.line_width = width.get(row);
    }
    if let Some(opacity) = &dims.opacity {
        style.opacity = opacity.get(row);
    }
    style
}

/// Per-feature style callback over one immutable dims snapshot
pub fn style_fn(base: FeatureStyle, dims: Arc<StyleDims>) -> StyleFn {
    Arc::new(move |feature: &Feature| evaluate(feature.row_index, Some(dims.as_ref()), &base))
}
