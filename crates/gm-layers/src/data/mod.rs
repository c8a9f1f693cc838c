//! Data layers: overlays built from query results

pub mod arrows;

use gm_core::MapLayerRegistryItem;
use std::sync::Arc;

pub use arrows::{ArrowsConfig, ArrowsLayer, ArrowsLayerItem, LayerState, ARROWS_LAYER_ID};

/// All data layer types
pub fn data_layers() -> Vec<Arc<dyn MapLayerRegistryItem>> {
    vec![Arc::new(ArrowsLayerItem)]
}
