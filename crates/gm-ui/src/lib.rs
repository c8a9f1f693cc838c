//! egui options editors for geomap layers
//!
//! The host creates an [`OptionsPanel`] per layer, lets the layer register its
//! editors into it and draws the panel against the layer's options document.

pub mod options_panel;
pub mod style_editor;
pub mod widget_utils;

pub use options_panel::{OptionItem, OptionsPanel};
pub use style_editor::{from_color32, to_color32, ArrowStyleEditor, ValueMode};
pub use widget_utils::WidgetId;
