//! Layer plugin traits - the factory contract between host and layers

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::PanelData;
use crate::layer::MapLayer;
use crate::options::OptionsUIBuilder;
use crate::projection::Projection;
use crate::Result;

/// The host map a layer is created for
#[derive(Debug, Clone, Default)]
pub struct MapContext {
    pub projection: Projection,
}

impl MapContext {
    pub fn new(projection: Projection) -> Self {
        Self { projection }
    }
}

/// Host theme passed to layer factories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Theme {
    pub is_dark: bool,
}

impl Theme {
    pub fn light() -> Self {
        Self { is_dark: false }
    }

    pub fn dark() -> Self {
        Self { is_dark: true }
    }
}

/// How a data layer finds locations in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameGeometrySourceMode {
    #[default]
    Auto,
    Geohash,
    Coords,
    Lookup,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub mode: FrameGeometrySourceMode,
}

/// Persisted options of one map layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapLayerOptions {
    #[serde(rename = "type")]
    pub layer_type: String,
    #[serde(default)]
    pub name: String,
    /// Layer-specific configuration, defaulted by the layer itself
    #[serde(default)]
    pub config: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<bool>,
}

impl MapLayerOptions {
    pub fn new(layer_type: impl Into<String>, config: Value) -> Self {
        Self {
            layer_type: layer_type.into(),
            name: String::new(),
            config,
            location: None,
            tooltip: None,
        }
    }

    /// Decode the layer config, falling back to the defaults when it is absent or malformed
    pub fn config_or_default<T: DeserializeOwned + Default>(&self) -> T {
        if self.config.is_null() {
            return T::default();
        }
        match serde_json::from_value(self.config.clone()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(
                    "Invalid config for layer type {}: {}, using defaults",
                    self.layer_type,
                    e
                );
                T::default()
            }
        }
    }
}

/// What an update did to the rendered layer
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Nothing to process; the layer kept its previous state
    Ignored,
    /// A frame was rendered
    Rendered {
        frame_index: usize,
        features: usize,
        warnings: Vec<String>,
    },
    /// No frame could be used; the layer now shows nothing
    Cleared { warnings: Vec<String> },
}

impl UpdateOutcome {
    pub fn feature_count(&self) -> usize {
        match self {
            UpdateOutcome::Rendered { features, .. } => *features,
            _ => 0,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            UpdateOutcome::Rendered { warnings, .. } | UpdateOutcome::Cleared { warnings } => {
                warnings
            }
            UpdateOutcome::Ignored => &[],
        }
    }
}

/// A live layer instance created by a registry item
pub trait MapLayerHandler: Send {
    /// Build the render layer handle. Called once per instance.
    fn init(&mut self) -> Result<MapLayer>;

    /// Handle a host data update
    fn update(&mut self, _data: &PanelData) -> Result<UpdateOutcome> {
        Ok(UpdateOutcome::Ignored)
    }

    /// Describe the option editors for this layer
    fn register_options_ui(&self, _builder: &mut dyn OptionsUIBuilder) {}

    /// Release the layer's resources
    fn dispose(&mut self) {}
}

/// A layer type known to the host
pub trait MapLayerRegistryItem: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    fn is_base_map(&self) -> bool;

    /// Whether the host should show location options for this layer
    fn show_location(&self) -> bool {
        false
    }

    /// Default persisted options for a new layer of this type
    fn default_options(&self) -> MapLayerOptions;

    fn create(
        &self,
        map: &MapContext,
        options: &MapLayerOptions,
        theme: &Theme,
    ) -> Result<Box<dyn MapLayerHandler>>;
}
