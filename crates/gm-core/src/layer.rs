//! Render-layer handles shared between a plugin and the host map surface

use arrow::record_batch::RecordBatch;
use geo_types::Geometry;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::style::{FeatureStyle, LayerStyle};

/// One renderable unit: a geometry bound to the frame row it came from
#[derive(Debug, Clone)]
pub struct Feature {
    pub frame: RecordBatch,
    /// Row in `frame`; `None` for synthetic geometry not backed by data
    pub row_index: Option<usize>,
    pub geometry: Geometry<f64>,
}

impl Feature {
    pub fn new(frame: RecordBatch, row_index: usize, geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            frame,
            row_index: Some(row_index),
            geometry: geometry.into(),
        }
    }

    /// A feature with no backing row
    pub fn synthetic(frame: RecordBatch, geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            frame,
            row_index: None,
            geometry: geometry.into(),
        }
    }
}

/// Immutable set of features backing a vector layer
#[derive(Debug, Clone, Default)]
pub struct VectorSource {
    features: Vec<Feature>,
}

impl VectorSource {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[derive(Debug)]
struct VectorLayerState {
    style: LayerStyle,
    source: Arc<VectorSource>,
    /// Bumped on every source swap
    revision: u64,
}

/// Shared handle to a vector layer.
///
/// The host reads it while rendering; the owning plugin is its only writer.
#[derive(Debug, Clone)]
pub struct VectorLayer {
    state: Arc<RwLock<VectorLayerState>>,
}

impl VectorLayer {
    /// Create a layer with the given style and an empty source
    pub fn new(style: LayerStyle) -> Self {
        Self {
            state: Arc::new(RwLock::new(VectorLayerState {
                style,
                source: Arc::new(VectorSource::empty()),
                revision: 0,
            })),
        }
    }

    pub fn style(&self) -> LayerStyle {
        self.state.read().style.clone()
    }

    pub fn source(&self) -> Arc<VectorSource> {
        self.state.read().source.clone()
    }

    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }

    /// Replace the source, and the style when given, under a single write
    pub fn swap(&self, style: Option<LayerStyle>, source: VectorSource) {
        let mut state = self.state.write();
        if let Some(style) = style {
            state.style = style;
        }
        state.source = Arc::new(source);
        state.revision += 1;
    }

    /// Replace the style for the current source.
    ///
    /// `make_style` sees the source the style is installed against, under the same write lock.
    pub fn restyle(&self, make_style: impl FnOnce(&VectorSource) -> LayerStyle) {
        let mut state = self.state.write();
        state.style = make_style(&state.source);
    }

    /// Styles of all current features in source order
    pub fn feature_styles(&self) -> Vec<FeatureStyle> {
        let state = self.state.read();
        state
            .source
            .features()
            .iter()
            .map(|f| state.style.style_for(f))
            .collect()
    }

    /// Whether two handles point at the same layer
    pub fn same_layer(&self, other: &VectorLayer) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

/// XYZ tile source described by a URL template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XyzSource {
    /// Template with `{z}`, `{x}` and `{y}` placeholders
    pub url: String,
    pub attributions: Option<String>,
}

impl XyzSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            attributions: None,
        }
    }

    pub fn with_attributions(mut self, attributions: impl Into<String>) -> Self {
        self.attributions = Some(attributions.into());
        self
    }

    /// URL of one tile. `{-y}` is the row counted from the bottom (TMS).
    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        let rows = 1u64 << z.min(32);
        let tms_y = (rows - 1).saturating_sub(y as u64);
        self.url
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{-y}", &tms_y.to_string())
            .replace("{y}", &y.to_string())
    }
}

/// Raster tile layer
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub source: XyzSource,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

impl TileLayer {
    pub fn new(source: XyzSource) -> Self {
        Self {
            source,
            min_zoom: None,
            max_zoom: None,
        }
    }

    pub fn with_zoom_range(mut self, min_zoom: f64, max_zoom: f64) -> Self {
        self.min_zoom = Some(min_zoom);
        self.max_zoom = Some(max_zoom);
        self
    }

    /// Whether the layer should be drawn at a zoom level
    pub fn visible_at(&self, zoom: f64) -> bool {
        self.min_zoom.map_or(true, |min| zoom >= min)
            && self.max_zoom.map_or(true, |max| zoom <= max)
    }
}

/// Handle produced by a plugin's `init`
#[derive(Debug, Clone)]
pub enum MapLayer {
    Vector(VectorLayer),
    Tile(TileLayer),
}

impl MapLayer {
    pub fn as_vector(&self) -> Option<&VectorLayer> {
        match self {
            MapLayer::Vector(layer) => Some(layer),
            MapLayer::Tile(_) => None,
        }
    }

    pub fn as_tile(&self) -> Option<&TileLayer> {
        match self {
            MapLayer::Tile(layer) => Some(layer),
            MapLayer::Vector(_) => None,
        }
    }
}
