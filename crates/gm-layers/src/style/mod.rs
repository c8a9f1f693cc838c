//! Line styles: configuration, resolution and per-feature evaluation

pub mod colors;
pub mod dims;
pub mod evaluate;
pub mod resolve;
pub mod types;

pub use colors::ColorScheme;
pub use dims::{Dimension, StyleDims};
pub use evaluate::{evaluate, style_fn};
pub use resolve::{resolve_style, DynamicStyle, ResolvedStyle, StyleAttribute};
pub use types::{ArrowStyleConfig, ColorDimensionConfig, OpacityConfig, ScaleDimensionConfig};
