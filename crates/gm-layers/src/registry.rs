//! Registry of every layer type known to the panel

use gm_core::{
    GeomapError, MapContext, MapLayerHandler, MapLayerOptions, MapLayerRegistryItem, Result, Theme,
};
use indexmap::IndexMap;
use std::sync::Arc;

use crate::basemaps::basemap_layers;
use crate::data::data_layers;

/// Layer types by id, in registration order
#[derive(Clone, Default)]
pub struct LayerRegistry {
    items: IndexMap<String, Arc<dyn MapLayerRegistryItem>>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in base maps and data layers
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for item in basemap_layers().into_iter().chain(data_layers()) {
            registry.register(item);
        }
        registry
    }

    /// Add a layer type; an existing type with the same id is replaced
    pub fn register(&mut self, item: Arc<dyn MapLayerRegistryItem>) {
        if self.items.contains_key(item.id()) {
            tracing::warn!("Replacing registered layer type {}", item.id());
        }
        self.items.insert(item.id().to_string(), item);
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn MapLayerRegistryItem>> {
        self.items.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn base_maps(&self) -> impl Iterator<Item = &Arc<dyn MapLayerRegistryItem>> {
        self.items.values().filter(|item| item.is_base_map())
    }

    pub fn data_layers(&self) -> impl Iterator<Item = &Arc<dyn MapLayerRegistryItem>> {
        self.items.values().filter(|item| !item.is_base_map())
    }

    /// Create a layer instance for persisted options
    pub fn create(
        &self,
        map: &MapContext,
        options: &MapLayerOptions,
        theme: &Theme,
    ) -> Result<Box<dyn MapLayerHandler>> {
        let item = self
            .get(&options.layer_type)
            .ok_or_else(|| GeomapError::UnknownLayer(options.layer_type.clone()))?;
        tracing::debug!("Creating {} layer", item.id());
        item.create(map, options, theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_standard_registry() {
        let registry = LayerRegistry::standard();
        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["osm-standard", "xyz", "gsi", "arrows"]);
        assert_eq!(registry.base_maps().count(), 3);
        assert_eq!(registry.data_layers().count(), 1);
        assert!(registry.get("arrows").unwrap().show_location());
    }

    #[test]
    fn test_unknown_layer_type() {
        let registry = LayerRegistry::standard();
        let options = MapLayerOptions::new("heatmap", Value::Null);
        let err = registry
            .create(&MapContext::default(), &options, &Theme::default())
            .err()
            .unwrap();
        assert!(matches!(err, GeomapError::UnknownLayer(id) if id == "heatmap"));
    }

    #[test]
    fn test_default_options_create_layers() {
        let registry = LayerRegistry::standard();
        for id in ["osm-standard", "xyz", "gsi", "arrows"] {
            let options = registry.get(id).unwrap().default_options();
            assert_eq!(options.layer_type, id);
            let mut handler = registry
                .create(&MapContext::default(), &options, &Theme::default())
                .unwrap();
            assert!(handler.init().is_ok());
        }
    }
}
