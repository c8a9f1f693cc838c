//! Core contracts for geomap layer plugins
//!
//! This crate provides the types shared between the host panel and the
//! layer plugins: data frames, field resolution, projections, render-layer
//! handles and the plugin traits.

pub mod data;
pub mod fields;
pub mod layer;
pub mod options;
pub mod plugin;
pub mod projection;
pub mod style;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use data::PanelData;
pub use fields::{field_by_name, resolve_fields, FieldMapping, FieldMatch, FieldRole};
pub use layer::{Feature, MapLayer, TileLayer, VectorLayer, VectorSource, XyzSource};
pub use options::{CustomEditorItem, OptionsUIBuilder, SelectItem, SelectOption, TextInputItem};
pub use plugin::{
    FrameGeometrySourceMode, LocationConfig, MapContext, MapLayerHandler, MapLayerOptions,
    MapLayerRegistryItem, Theme, UpdateOutcome,
};
pub use projection::Projection;
pub use style::{FeatureStyle, LayerStyle, Rgba, StyleFn};

/// Errors that can occur while building or driving map layers
#[derive(Error, Debug)]
pub enum GeomapError {
    #[error("{role} field not found.")]
    MissingField { role: String },

    #[error("Unknown layer type: {0}")]
    UnknownLayer(String),

    #[error("Layer is {actual}, expected {expected}")]
    Lifecycle {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Invalid layer configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(ArrowError),
}

impl From<ArrowError> for GeomapError {
    fn from(error: ArrowError) -> Self {
        GeomapError::Arrow(error)
    }
}

pub type Result<T, E = GeomapError> = std::result::Result<T, E>;
