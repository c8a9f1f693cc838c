//! Map layer plugins for the geomap panel
//!
//! Base maps provide tile layers; data layers turn query frames into styled
//! features. Every layer type is registered in a [`LayerRegistry`].

pub mod basemaps;
pub mod data;
pub mod registry;
pub mod style;

// Re-exports
pub use basemaps::{basemap_layers, BasemapHandler};
pub use data::{data_layers, ArrowsConfig, ArrowsLayer, ArrowsLayerItem, LayerState};
pub use registry::LayerRegistry;
pub use style::{ArrowStyleConfig, ResolvedStyle};
