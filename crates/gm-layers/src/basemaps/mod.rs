//! Base maps: tile layers drawn under the data overlays

pub mod gsi;
pub mod xyz;

use gm_core::{
    GeomapError, MapLayer, MapLayerHandler, MapLayerRegistryItem, OptionsUIBuilder, Result,
    TileLayer,
};
use std::sync::Arc;

pub use gsi::{GsiConfig, GsiLayerItem, GsiMapTheme, GSI_LAYER_ID};
pub use xyz::{OsmStandardItem, XyzConfig, XyzLayerItem, OSM_LAYER_ID, XYZ_LAYER_ID};

/// Live instance of a tile base map. Tile layers never change after `init`.
pub struct BasemapHandler {
    layer: TileLayer,
    initialized: bool,
    register: fn(&mut dyn OptionsUIBuilder),
}

impl BasemapHandler {
    pub fn new(layer: TileLayer, register: fn(&mut dyn OptionsUIBuilder)) -> Self {
        Self {
            layer,
            initialized: false,
            register,
        }
    }

    /// A base map without options
    pub fn fixed(layer: TileLayer) -> Self {
        Self::new(layer, |_| {})
    }
}

impl MapLayerHandler for BasemapHandler {
    fn init(&mut self) -> Result<MapLayer> {
        if self.initialized {
            return Err(GeomapError::Lifecycle {
                expected: "uninitialized",
                actual: "ready",
            });
        }
        self.initialized = true;
        Ok(MapLayer::Tile(self.layer.clone()))
    }

    fn register_options_ui(&self, builder: &mut dyn OptionsUIBuilder) {
        (self.register)(builder);
    }
}

/// All base map types
pub fn basemap_layers() -> Vec<Arc<dyn MapLayerRegistryItem>> {
    vec![
        Arc::new(OsmStandardItem),
        Arc::new(XyzLayerItem),
        Arc::new(GsiLayerItem),
    ]
}
