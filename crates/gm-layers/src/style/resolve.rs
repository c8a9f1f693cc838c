//! Resolving a style configuration into a fixed style or a data-driven one

use arrow::record_batch::RecordBatch;
use gm_core::{FeatureStyle, Rgba};
use std::fmt;

use super::colors::ColorScheme;
use super::dims::{color_dimension, scale_dimension, StyleDims};
use super::types::{
    ArrowStyleConfig, OpacityConfig, DEFAULT_COLOR, DEFAULT_LINE_WIDTH, DEFAULT_OPACITY,
    LINE_WIDTH_MAX, LINE_WIDTH_MIN,
};

/// A visual attribute that can be driven by data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleAttribute {
    Color,
    LineWidth,
    Opacity,
}

impl fmt::Display for StyleAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleAttribute::Color => "color",
            StyleAttribute::LineWidth => "lineWidth",
            StyleAttribute::Opacity => "opacity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorBinding {
    pub field: String,
    pub scheme: ColorScheme,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBinding {
    pub field: String,
    pub min: f32,
    pub max: f32,
}

/// Style with at least one field-driven attribute
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicStyle {
    /// Fallback for features without a row and for attributes that are fixed
    pub base: FeatureStyle,
    pub color: Option<ColorBinding>,
    pub line_width: Option<ScaleBinding>,
    pub opacity: Option<ScaleBinding>,
}

impl DynamicStyle {
    pub fn fields(&self) -> Vec<StyleAttribute> {
        let mut fields = Vec::new();
        if self.color.is_some() {
            fields.push(StyleAttribute::Color);
        }
        if self.line_width.is_some() {
            fields.push(StyleAttribute::LineWidth);
        }
        if self.opacity.is_some() {
            fields.push(StyleAttribute::Opacity);
        }
        fields
    }

    /// Build the dimensions for one frame
    pub fn bind(&self, frame: &RecordBatch) -> StyleDims {
        StyleDims {
            color: self
                .color
                .as_ref()
                .map(|c| color_dimension(frame, &c.field, c.scheme, self.base.color)),
            line_width: self
                .line_width
                .as_ref()
                .map(|s| scale_dimension(frame, &s.field, s.min, s.max, self.base.line_width)),
            opacity: self
                .opacity
                .as_ref()
                .map(|s| scale_dimension(frame, &s.field, s.min, s.max, self.base.opacity)),
        }
    }
}

/// Resolved style state of a layer, recomputed only when its configuration changes
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedStyle {
    Static(FeatureStyle),
    Dynamic(DynamicStyle),
}

impl ResolvedStyle {
    pub fn base(&self) -> &FeatureStyle {
        match self {
            ResolvedStyle::Static(base) => base,
            ResolvedStyle::Dynamic(dynamic) => &dynamic.base,
        }
    }

    /// Field-driven attributes, or `None` when the style is fully fixed
    pub fn fields(&self) -> Option<Vec<StyleAttribute>> {
        match self {
            ResolvedStyle::Static(_) => None,
            ResolvedStyle::Dynamic(dynamic) => Some(dynamic.fields()),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, ResolvedStyle::Dynamic(_))
    }
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        resolve_style(&ArrowStyleConfig::default())
    }
}

fn default_color() -> Rgba {
    Rgba::parse(DEFAULT_COLOR).unwrap_or(Rgba::from_rgb(237, 30, 164))
}

fn resolve_color(fixed: Option<&str>) -> Rgba {
    match fixed {
        Some(text) => Rgba::parse(text).unwrap_or_else(|| {
            tracing::warn!("Unrecognized color {:?}, using default", text);
            default_color()
        }),
        None => default_color(),
    }
}

/// Finite value or the default
fn or_default(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

/// Merge a configuration with the defaults. Every unset attribute is defaulted here.
pub fn resolve_style(config: &ArrowStyleConfig) -> ResolvedStyle {
    let color = config.color.as_ref();
    let width = config.line_width.as_ref();
    let opacity = config.opacity.as_ref();

    let width_min = or_default(width.and_then(|w| w.min), LINE_WIDTH_MIN).max(LINE_WIDTH_MIN);
    let width_max = or_default(width.and_then(|w| w.max), LINE_WIDTH_MAX).max(width_min);

    let base = FeatureStyle {
        color: resolve_color(color.and_then(|c| c.fixed.as_deref())),
        line_width: or_default(width.and_then(|w| w.fixed), DEFAULT_LINE_WIDTH)
            .max(LINE_WIDTH_MIN) as f32,
        opacity: or_default(opacity.and_then(OpacityConfig::fixed_value), DEFAULT_OPACITY)
            .clamp(0.0, 1.0) as f32,
    };

    let color_binding = color.and_then(|c| {
        c.field_name().map(|field| ColorBinding {
            field: field.to_string(),
            scheme: c.scheme.unwrap_or_default(),
        })
    });
    let width_binding = width.and_then(|w| {
        w.field_name().map(|field| ScaleBinding {
            field: field.to_string(),
            min: width_min as f32,
            max: width_max as f32,
        })
    });
    let opacity_binding = opacity.and_then(|o| {
        let OpacityConfig::Scaled(scale) = o else {
            return None;
        };
        o.field_name().map(|field| {
            let min = or_default(scale.min, 0.0).clamp(0.0, 1.0);
            let max = or_default(scale.max, 1.0).clamp(min, 1.0);
            ScaleBinding {
                field: field.to_string(),
                min: min as f32,
                max: max as f32,
            }
        })
    });

    if color_binding.is_none() && width_binding.is_none() && opacity_binding.is_none() {
        return ResolvedStyle::Static(base);
    }

    ResolvedStyle::Dynamic(DynamicStyle {
        base,
        color: color_binding,
        line_width: width_binding,
        opacity: opacity_binding,
    })
}
