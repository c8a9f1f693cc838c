//! Generic XYZ tile base maps

use gm_core::{
    MapContext, MapLayerHandler, MapLayerOptions, MapLayerRegistryItem, OptionsUIBuilder, Result,
    TextInputItem, Theme, TileLayer, XyzSource,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::BasemapHandler;

pub const XYZ_LAYER_ID: &str = "xyz";
pub const OSM_LAYER_ID: &str = "osm-standard";

pub const DEFAULT_XYZ_URL: &str =
    "https://services.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
pub const DEFAULT_XYZ_ATTRIBUTION: &str = "Tiles © ArcGIS";

const OSM_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const OSM_ATTRIBUTION: &str = r#"© <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XyzConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<String>,
}

impl XyzConfig {
    /// Tile layer for this config; blank values take the defaults
    pub fn tile_layer(&self) -> TileLayer {
        let url = self
            .url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_XYZ_URL);
        let attribution = self
            .attribution
            .as_deref()
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(DEFAULT_XYZ_ATTRIBUTION);
        TileLayer::new(XyzSource::new(url).with_attributions(attribution))
    }
}

fn register_xyz_options(builder: &mut dyn OptionsUIBuilder) {
    builder.add_text_input(TextInputItem {
        path: "config.url".to_string(),
        name: "URL template".to_string(),
        description: Some("Must include {x}, {y} or {-y}, and {z} placeholders".to_string()),
        placeholder: Some(DEFAULT_XYZ_URL.to_string()),
    });
    builder.add_text_input(TextInputItem {
        path: "config.attribution".to_string(),
        name: "Attribution".to_string(),
        description: None,
        placeholder: Some(DEFAULT_XYZ_ATTRIBUTION.to_string()),
    });
}

/// Registry entry for a user-supplied XYZ template
pub struct XyzLayerItem;

impl MapLayerRegistryItem for XyzLayerItem {
    fn id(&self) -> &str {
        XYZ_LAYER_ID
    }

    fn name(&self) -> &str {
        "XYZ Tile layer"
    }

    fn is_base_map(&self) -> bool {
        true
    }

    fn default_options(&self) -> MapLayerOptions {
        MapLayerOptions::new(
            XYZ_LAYER_ID,
            json!({ "url": DEFAULT_XYZ_URL, "attribution": DEFAULT_XYZ_ATTRIBUTION }),
        )
    }

    fn create(
        &self,
        _map: &MapContext,
        options: &MapLayerOptions,
        _theme: &Theme,
    ) -> Result<Box<dyn MapLayerHandler>> {
        let config: XyzConfig = options.config_or_default();
        Ok(Box::new(BasemapHandler::new(config.tile_layer(), register_xyz_options)))
    }
}

/// Registry entry for OpenStreetMap standard tiles
pub struct OsmStandardItem;

impl MapLayerRegistryItem for OsmStandardItem {
    fn id(&self) -> &str {
        OSM_LAYER_ID
    }

    fn name(&self) -> &str {
        "Open Street Map"
    }

    fn description(&self) -> &str {
        "Add map from a collaborative free geographic world database"
    }

    fn is_base_map(&self) -> bool {
        true
    }

    fn default_options(&self) -> MapLayerOptions {
        MapLayerOptions::new(OSM_LAYER_ID, serde_json::Value::Null)
    }

    fn create(
        &self,
        _map: &MapContext,
        _options: &MapLayerOptions,
        _theme: &Theme,
    ) -> Result<Box<dyn MapLayerHandler>> {
        let source = XyzSource::new(OSM_URL).with_attributions(OSM_ATTRIBUTION);
        Ok(Box::new(BasemapHandler::fixed(
            TileLayer::new(source).with_zoom_range(0.0, 19.0),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_url_uses_default() {
        let config = XyzConfig {
            url: Some("  ".to_string()),
            attribution: None,
        };
        let layer = config.tile_layer();
        assert_eq!(layer.source.url, DEFAULT_XYZ_URL);
        assert_eq!(layer.source.attributions.as_deref(), Some(DEFAULT_XYZ_ATTRIBUTION));
    }

    #[test]
    fn test_custom_template() {
        let options = MapLayerOptions::new(
            XYZ_LAYER_ID,
            json!({ "url": "https://tiles.example.com/{z}/{x}/{y}.png" }),
        );
        let mut handler = XyzLayerItem
            .create(&MapContext::default(), &options, &Theme::default())
            .unwrap();
        let layer = handler.init().unwrap();
        assert_eq!(
            layer.as_tile().unwrap().source.tile_url(2, 1, 3),
            "https://tiles.example.com/2/1/3.png"
        );
        assert!(handler.init().is_err());
    }

    #[test]
    fn test_osm_layer() {
        let mut handler = OsmStandardItem
            .create(
                &MapContext::default(),
                &OsmStandardItem.default_options(),
                &Theme::default(),
            )
            .unwrap();
        let layer = handler.init().unwrap();
        let tile = layer.as_tile().unwrap();
        assert_eq!(tile.source.tile_url(0, 0, 0), "https://tile.openstreetmap.org/0/0/0.png");
        assert!(tile.visible_at(19.0));
    }
}
