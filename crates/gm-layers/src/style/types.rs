//! Persisted style configuration for line overlays

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::colors::ColorScheme;

pub const DEFAULT_COLOR: &str = "#ed1ea4";
pub const DEFAULT_OPACITY: f64 = 0.8;
pub const DEFAULT_LINE_WIDTH: f64 = 6.0;
pub const LINE_WIDTH_MIN: f64 = 1.0;
pub const LINE_WIDTH_MAX: f64 = 20.0;

/// Color: a fixed value, or a data field mapped through a color scheme
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorDimensionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<ColorScheme>,
}

impl ColorDimensionConfig {
    pub fn fixed(color: impl Into<String>) -> Self {
        Self {
            fixed: Some(color.into()),
            ..Default::default()
        }
    }

    /// The referenced field, if one is set and non-empty
    pub fn field_name(&self) -> Option<&str> {
        non_empty(self.field.as_deref())
    }
}

/// A numeric attribute: a fixed value, or a data field scaled into `[min, max]`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScaleDimensionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ScaleDimensionConfig {
    pub fn fixed(value: f64) -> Self {
        Self {
            fixed: Some(value),
            ..Default::default()
        }
    }

    pub fn field_name(&self) -> Option<&str> {
        non_empty(self.field.as_deref())
    }
}

/// Opacity is stored as a bare number, or as a scale dimension when field driven
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OpacityConfig {
    Fixed(f64),
    Scaled(ScaleDimensionConfig),
}

impl OpacityConfig {
    pub fn fixed_value(&self) -> Option<f64> {
        match self {
            OpacityConfig::Fixed(v) => Some(*v),
            OpacityConfig::Scaled(scale) => scale.fixed,
        }
    }

    pub fn field_name(&self) -> Option<&str> {
        match self {
            OpacityConfig::Fixed(_) => None,
            OpacityConfig::Scaled(scale) => scale.field_name(),
        }
    }
}

/// Style of an arrow overlay. Unset attributes take the defaults at resolve time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowStyleConfig {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorDimensionConfig>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub opacity: Option<OpacityConfig>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub line_width: Option<ScaleDimensionConfig>,
}

impl ArrowStyleConfig {
    /// Fully populated default style, as offered to a new layer
    pub fn with_defaults() -> Self {
        Self {
            color: Some(ColorDimensionConfig::fixed(DEFAULT_COLOR)),
            opacity: Some(OpacityConfig::Fixed(DEFAULT_OPACITY)),
            line_width: Some(ScaleDimensionConfig {
                fixed: Some(DEFAULT_LINE_WIDTH),
                min: Some(LINE_WIDTH_MIN),
                max: Some(LINE_WIDTH_MAX),
                field: None,
            }),
        }
    }
}

/// Decode one attribute on its own. A malformed attribute is logged and left unset
/// so the rest of the configuration survives.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(attribute) => Ok(Some(attribute)),
        Err(e) => {
            tracing::warn!("Ignoring invalid style attribute: {}, using default", e);
            Ok(None)
        }
    }
}

/// Like [`lenient`], for values that are defaulted rather than optional
pub(crate) fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|f| !f.is_empty())
}
