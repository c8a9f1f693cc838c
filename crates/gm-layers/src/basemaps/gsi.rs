//! GSI Japan base map tiles

use gm_core::{
    MapContext, MapLayerHandler, MapLayerOptions, MapLayerRegistryItem, OptionsUIBuilder, Result,
    SelectItem, SelectOption, Theme, TileLayer, XyzSource,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::BasemapHandler;

pub const GSI_LAYER_ID: &str = "gsi";
pub const GSI_DEFAULT_THEME: &str = "Standard";

const GSI_ATTRIBUTION: &str = r#"<a href="https://maps.gsi.go.jp/development/ichiran.html">©The Geospatial Information Authority of Japan</a>"#;

/// One GSI map style
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GsiMapTheme {
    pub id: &'static str,
    pub name: &'static str,
    /// Path segment of the tile URL
    pub style: &'static str,
    pub ext: &'static str,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

pub static GSI_THEMES: [GsiMapTheme; 5] = [
    GsiMapTheme {
        id: GSI_DEFAULT_THEME,
        name: "Standard",
        style: "std",
        ext: "png",
        min_zoom: 1,
        max_zoom: 18,
    },
    GsiMapTheme {
        id: "Pale",
        name: "Pale",
        style: "pale",
        ext: "png",
        min_zoom: 2,
        max_zoom: 18,
    },
    GsiMapTheme {
        id: "English",
        name: "English",
        style: "english",
        ext: "png",
        min_zoom: 5,
        max_zoom: 11,
    },
    GsiMapTheme {
        id: "Photo",
        name: "Photo",
        style: "seamlessphoto",
        ext: "jpg",
        min_zoom: 2,
        max_zoom: 18,
    },
    GsiMapTheme {
        id: "Blank",
        name: "Blank",
        style: "blank",
        ext: "png",
        min_zoom: 5,
        max_zoom: 14,
    },
];

impl GsiMapTheme {
    /// Look up a theme by id, falling back to the default theme
    pub fn find(id: &str) -> &'static GsiMapTheme {
        GSI_THEMES
            .iter()
            .find(|t| t.id == id)
            .unwrap_or_else(|| {
                tracing::warn!("Unknown GSI theme {}, using {}", id, GSI_DEFAULT_THEME);
                &GSI_THEMES[0]
            })
    }

    pub fn url_template(&self) -> String {
        format!(
            "https://cyberjapandata.gsi.go.jp/xyz/{}/{{z}}/{{x}}/{{y}}.{}",
            self.style, self.ext
        )
    }

    pub fn tile_layer(&self) -> TileLayer {
        TileLayer::new(XyzSource::new(self.url_template()).with_attributions(GSI_ATTRIBUTION))
            .with_zoom_range(self.min_zoom as f64, self.max_zoom as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GsiConfig {
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    GSI_DEFAULT_THEME.to_string()
}

impl Default for GsiConfig {
    fn default() -> Self {
        Self {
            theme: default_theme(),
        }
    }
}

fn register_gsi_options(builder: &mut dyn OptionsUIBuilder) {
    builder.add_select(SelectItem {
        path: "config.theme".to_string(),
        name: "Theme".to_string(),
        options: GSI_THEMES
            .iter()
            .map(|t| SelectOption {
                value: t.id.to_string(),
                label: t.name.to_string(),
            })
            .collect(),
        default_value: Some(json!(GSI_DEFAULT_THEME)),
    });
}

/// Registry entry for the GSI base map
pub struct GsiLayerItem;

impl MapLayerRegistryItem for GsiLayerItem {
    fn id(&self) -> &str {
        GSI_LAYER_ID
    }

    fn name(&self) -> &str {
        "GSI Japan map"
    }

    fn is_base_map(&self) -> bool {
        true
    }

    fn default_options(&self) -> MapLayerOptions {
        MapLayerOptions::new(GSI_LAYER_ID, json!(GsiConfig::default()))
    }

    fn create(
        &self,
        _map: &MapContext,
        options: &MapLayerOptions,
        _theme: &Theme,
    ) -> Result<Box<dyn MapLayerHandler>> {
        let config: GsiConfig = options.config_or_default();
        let theme = GsiMapTheme::find(&config.theme);
        Ok(Box::new(BasemapHandler::new(
            theme.tile_layer(),
            register_gsi_options,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_urls() {
        assert_eq!(
            GsiMapTheme::find("Photo").url_template(),
            "https://cyberjapandata.gsi.go.jp/xyz/seamlessphoto/{z}/{x}/{y}.jpg"
        );
        let layer = GsiMapTheme::find("English").tile_layer();
        assert_eq!((layer.min_zoom, layer.max_zoom), (Some(5.0), Some(11.0)));
        assert_eq!(
            layer.source.tile_url(7, 113, 50),
            "https://cyberjapandata.gsi.go.jp/xyz/english/7/113/50.png"
        );
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert_eq!(GsiMapTheme::find("Sepia").id, GSI_DEFAULT_THEME);
    }

    #[test]
    fn test_create_uses_configured_theme() {
        let options = MapLayerOptions::new(GSI_LAYER_ID, json!({ "theme": "Pale" }));
        let mut handler = GsiLayerItem
            .create(&MapContext::default(), &options, &Theme::default())
            .unwrap();
        let layer = handler.init().unwrap();
        let tile = layer.as_tile().unwrap();
        assert!(tile.source.url.contains("/pale/"));
        assert!(tile.source.attributions.is_some());
    }

    #[test]
    fn test_missing_config_uses_standard() {
        let options = MapLayerOptions::new(GSI_LAYER_ID, serde_json::Value::Null);
        let mut handler = GsiLayerItem
            .create(&MapContext::default(), &options, &Theme::default())
            .unwrap();
        let layer = handler.init().unwrap();
        assert!(layer.as_tile().unwrap().source.url.contains("/std/"));
    }
}
