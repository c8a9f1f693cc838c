//! Concrete styles understood by the render surface

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::layer::Feature;

/// 8-bit sRGB color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Named colors accepted in fixed color values
const NAMED_COLORS: &[(&str, Rgba)] = &[
    ("transparent", Rgba::from_rgba(0, 0, 0, 0)),
    ("black", Rgba::from_rgb(0, 0, 0)),
    ("white", Rgba::from_rgb(255, 255, 255)),
    ("red", Rgba::from_rgb(242, 73, 92)),
    ("dark-red", Rgba::from_rgb(196, 22, 42)),
    ("orange", Rgba::from_rgb(255, 152, 48)),
    ("dark-orange", Rgba::from_rgb(250, 100, 0)),
    ("yellow", Rgba::from_rgb(250, 222, 42)),
    ("dark-yellow", Rgba::from_rgb(224, 180, 0)),
    ("green", Rgba::from_rgb(115, 191, 105)),
    ("dark-green", Rgba::from_rgb(55, 135, 45)),
    ("blue", Rgba::from_rgb(87, 148, 242)),
    ("dark-blue", Rgba::from_rgb(31, 96, 196)),
    ("purple", Rgba::from_rgb(184, 119, 217)),
    ("dark-purple", Rgba::from_rgb(143, 59, 184)),
];

impl Rgba {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)` or a named color
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let lower = text.to_ascii_lowercase();
        if let Some(args) = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse_functional(args);
        }
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
                Some(Self::from_rgb(digits.next()??, digits.next()??, digits.next()??))
            }
            6 => Some(Self::from_rgb(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            8 => Some(Self::from_rgba(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
                channel(hex.get(6..8)?)?,
            )),
            _ => None,
        }
    }

    fn parse_functional(args: &str) -> Option<Self> {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let channel = |s: &str| s.parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
        let alpha = match parts.get(3) {
            Some(a) => (a.parse::<f64>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
            None => 255,
        };
        Some(Self::from_rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }

    /// Scale the alpha channel by an opacity in [0, 1]
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (self.a as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// The visual style of one rendered feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStyle {
    pub color: Rgba,
    pub line_width: f32,
    pub opacity: f32,
}

impl FeatureStyle {
    /// Stroke color with the opacity folded into the alpha channel
    pub fn stroke(&self) -> Rgba {
        self.color.with_opacity(self.opacity)
    }
}

/// Per-feature style callback installed on a vector layer
pub type StyleFn = Arc<dyn Fn(&Feature) -> FeatureStyle + Send + Sync>;

/// Style attached to a vector layer: one style for all features, or one per feature
#[derive(Clone)]
pub enum LayerStyle {
    Fixed(FeatureStyle),
    PerFeature(StyleFn),
}

impl LayerStyle {
    pub fn style_for(&self, feature: &Feature) -> FeatureStyle {
        match self {
            LayerStyle::Fixed(style) => *style,
            LayerStyle::PerFeature(f) => f(feature),
        }
    }

    pub fn is_per_feature(&self) -> bool {
        matches!(self, LayerStyle::PerFeature(_))
    }
}

impl fmt::Debug for LayerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerStyle::Fixed(style) => f.debug_tuple("Fixed").field(style).finish(),
            LayerStyle::PerFeature(_) => f.write_str("PerFeature(..)"),
        }
    }
}
