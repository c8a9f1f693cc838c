//! Arrow overlay: one styled line per row, from a source to a destination coordinate

use arrow::record_batch::RecordBatch;
use geo_types::LineString;
use gm_core::options::CustomEditorItem;
use gm_core::{
    resolve_fields, Feature, FieldMapping, FieldRole, GeomapError, LayerStyle, LocationConfig,
    MapContext, MapLayer, MapLayerHandler, MapLayerOptions, MapLayerRegistryItem,
    OptionsUIBuilder, PanelData, Projection, Result, Theme, UpdateOutcome, VectorLayer,
    VectorSource,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::style::types::lenient_or_default;
use crate::style::{resolve_style, style_fn, ArrowStyleConfig, ResolvedStyle, StyleDims};

pub const ARROWS_LAYER_ID: &str = "arrows";

/// Editor id the host uses to render the arrow style editor
pub const ARROW_STYLE_EDITOR: &str = "arrow-style";

// "lot" is the longitude alias the data sources use
pub const SRC_LAT: FieldRole = FieldRole::new("src_lat", &["src_lat"]);
pub const SRC_LON: FieldRole = FieldRole::new("src_lot", &["src_lot"]);
pub const DST_LAT: FieldRole = FieldRole::new("dst_lat", &["dst_lat"]);
pub const DST_LON: FieldRole = FieldRole::new("dst_lot", &["dst_lot"]);

pub const ARROW_FIELDS: [FieldRole; 4] = [SRC_LAT, SRC_LON, DST_LAT, DST_LON];

/// Configuration of an arrows layer
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrowsConfig {
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub style: ArrowStyleConfig,
}

impl ArrowsConfig {
    pub fn with_defaults() -> Self {
        Self {
            style: ArrowStyleConfig::with_defaults(),
        }
    }
}

/// One projected line per row, in row order
pub fn build_arrow_geometries(
    mapping: &FieldMapping,
    projection: Projection,
) -> Result<Vec<LineString<f64>>> {
    let src_lat = mapping.numbers(SRC_LAT.name)?;
    let src_lon = mapping.numbers(SRC_LON.name)?;
    let dst_lat = mapping.numbers(DST_LAT.name)?;
    let dst_lon = mapping.numbers(DST_LON.name)?;

    Ok((0..src_lat.len())
        .map(|i| {
            LineString::new(vec![
                projection.from_lon_lat(src_lon[i], src_lat[i]),
                projection.from_lon_lat(dst_lon[i], dst_lat[i]),
            ])
        })
        .collect())
}

/// Bind each line to its originating row
pub fn arrow_features(frame: &RecordBatch, lines: Vec<LineString<f64>>) -> Vec<Feature> {
    lines
        .into_iter()
        .enumerate()
        .map(|(row, line)| Feature::new(frame.clone(), row, line))
        .collect()
}

/// Lifecycle of a layer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    Uninitialized,
    Ready,
    Updating,
    Disposed,
}

impl LayerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerState::Uninitialized => "uninitialized",
            LayerState::Ready => "ready",
            LayerState::Updating => "updating",
            LayerState::Disposed => "disposed",
        }
    }
}

/// Controller of one arrows layer
pub struct ArrowsLayer {
    projection: Projection,
    config: ArrowsConfig,
    style: ResolvedStyle,
    layer: Option<VectorLayer>,
    state: LayerState,
}

impl ArrowsLayer {
    pub fn new(map: &MapContext, config: ArrowsConfig) -> Self {
        let style = resolve_style(&config.style);
        Self {
            projection: map.projection,
            config,
            style,
            layer: None,
            state: LayerState::Uninitialized,
        }
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    pub fn config(&self) -> &ArrowsConfig {
        &self.config
    }

    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    /// The render layer, once initialized
    pub fn layer(&self) -> Option<&VectorLayer> {
        self.layer.as_ref()
    }

    /// Apply a configuration change.
    ///
    /// The style is resolved once here; dynamic styles are rebound to the frame
    /// currently on screen so style and source stay consistent.
    pub fn set_config(&mut self, config: ArrowsConfig) {
        self.style = resolve_style(&config.style);
        self.config = config;
        if let Some(layer) = &self.layer {
            let style = self.style.clone();
            layer.restyle(|source| {
                let frame = source.features().first().map(|f| &f.frame);
                layer_style(&style, frame)
            });
        }
    }

    fn expect_state(&self, expected: LayerState) -> Result<()> {
        if self.state != expected {
            return Err(GeomapError::Lifecycle {
                expected: expected.as_str(),
                actual: self.state.as_str(),
            });
        }
        Ok(())
    }

    /// The render layer, if the controller is ready for updates
    fn ready_layer(&self) -> Result<VectorLayer> {
        match (&self.layer, self.state) {
            (Some(layer), LayerState::Ready) => Ok(layer.clone()),
            _ => Err(GeomapError::Lifecycle {
                expected: LayerState::Ready.as_str(),
                actual: self.state.as_str(),
            }),
        }
    }

    fn render(&self, layer: &VectorLayer, data: &PanelData) -> UpdateOutcome {
        let mut warnings = Vec::new();

        for (frame_index, frame) in data.series.iter().enumerate() {
            let lines = resolve_fields(frame, &ARROW_FIELDS)
                .and_then(|mapping| build_arrow_geometries(&mapping, self.projection));
            let lines = match lines {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::warn!("Skipping frame {} for arrows layer: {}", frame_index, e);
                    warnings.push(e.to_string());
                    continue;
                }
            };

            let features = arrow_features(frame, lines);
            let count = features.len();
            let style = match &self.style {
                ResolvedStyle::Static(_) => None,
                ResolvedStyle::Dynamic(_) => Some(layer_style(&self.style, Some(frame))),
            };
            layer.swap(style, VectorSource::new(features));

            tracing::debug!("Arrows layer rendered {} features from frame {}", count, frame_index);
            // Only the first usable frame is rendered
            return UpdateOutcome::Rendered {
                frame_index,
                features: count,
                warnings,
            };
        }

        layer.swap(None, VectorSource::empty());
        UpdateOutcome::Cleared { warnings }
    }
}

/// Layer style for a resolved style, with dimensions bound to `frame` when data driven
fn layer_style(style: &ResolvedStyle, frame: Option<&RecordBatch>) -> LayerStyle {
    match style {
        ResolvedStyle::Static(base) => LayerStyle::Fixed(*base),
        ResolvedStyle::Dynamic(dynamic) => {
            let dims = frame.map(|f| dynamic.bind(f)).unwrap_or_else(StyleDims::default);
            LayerStyle::PerFeature(style_fn(dynamic.base, Arc::new(dims)))
        }
    }
}

impl MapLayerHandler for ArrowsLayer {
    fn init(&mut self) -> Result<MapLayer> {
        self.expect_state(LayerState::Uninitialized)?;
        let layer = VectorLayer::new(layer_style(&self.style, None));
        self.layer = Some(layer.clone());
        self.state = LayerState::Ready;
        Ok(MapLayer::Vector(layer))
    }

    fn update(&mut self, data: &PanelData) -> Result<UpdateOutcome> {
        let layer = self.ready_layer()?;
        if data.is_empty() {
            return Ok(UpdateOutcome::Ignored);
        }

        self.state = LayerState::Updating;
        let outcome = self.render(&layer, data);
        self.state = LayerState::Ready;
        Ok(outcome)
    }

    fn register_options_ui(&self, builder: &mut dyn OptionsUIBuilder) {
        builder.add_custom_editor(CustomEditorItem {
            id: "config.style".to_string(),
            path: "config.style".to_string(),
            name: "Arrow style".to_string(),
            editor: ARROW_STYLE_EDITOR.to_string(),
            settings: json!({ "simpleFixedValues": false }),
            default_value: serde_json::to_value(ArrowStyleConfig::with_defaults())
                .unwrap_or_default(),
        });
    }

    fn dispose(&mut self) {
        if let Some(layer) = self.layer.take() {
            layer.swap(None, VectorSource::empty());
        }
        self.state = LayerState::Disposed;
    }
}

/// Registry entry for the arrows overlay
pub struct ArrowsLayerItem;

impl MapLayerRegistryItem for ArrowsLayerItem {
    fn id(&self) -> &str {
        ARROWS_LAYER_ID
    }

    fn name(&self) -> &str {
        "Arrows"
    }

    fn description(&self) -> &str {
        "arrow to render parent/child relationships between data points"
    }

    fn is_base_map(&self) -> bool {
        false
    }

    fn show_location(&self) -> bool {
        true
    }

    fn default_options(&self) -> MapLayerOptions {
        MapLayerOptions {
            layer_type: ARROWS_LAYER_ID.to_string(),
            name: String::new(),
            config: serde_json::to_value(ArrowsConfig::with_defaults()).unwrap_or_default(),
            location: Some(LocationConfig::default()),
            tooltip: Some(true),
        }
    }

    fn create(
        &self,
        map: &MapContext,
        options: &MapLayerOptions,
        _theme: &Theme,
    ) -> Result<Box<dyn MapLayerHandler>> {
        let config: ArrowsConfig = options.config_or_default();
        Ok(Box::new(ArrowsLayer::new(map, config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{ColorDimensionConfig, ScaleDimensionConfig};
    use arrow::array::{ArrayRef, Float64Array};
    use geo_types::Geometry;
    use gm_core::{FeatureStyle, Rgba};

    fn column(values: &[f64]) -> ArrayRef {
        Arc::new(Float64Array::from(values.to_vec()))
    }

    fn arrows_frame() -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            ("src_lat", column(&[10.0, 20.0])),
            ("SRC_LOT", column(&[100.0, 110.0])),
            ("dst_lat", column(&[15.0, 25.0])),
            ("dst_lot", column(&[105.0, 115.0])),
            ("weight", column(&[1.0, 3.0])),
        ])
        .unwrap()
    }

    fn frame_without_dst_lon() -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            ("src_lat", column(&[10.0])),
            ("src_lot", column(&[100.0])),
            ("dst_lat", column(&[15.0])),
        ])
        .unwrap()
    }

    fn ready_layer(config: ArrowsConfig) -> (ArrowsLayer, VectorLayer) {
        let mut arrows = ArrowsLayer::new(&MapContext::default(), config);
        let layer = arrows.init().unwrap().as_vector().cloned().unwrap();
        (arrows, layer)
    }

    #[test]
    fn test_geometries_follow_rows() {
        let frame = arrows_frame();
        let mapping = resolve_fields(&frame, &ARROW_FIELDS).unwrap();
        let lines = build_arrow_geometries(&mapping, Projection::WebMercator).unwrap();

        assert_eq!(lines.len(), 2);
        let p = Projection::WebMercator;
        assert_eq!(lines[0].0, vec![p.from_lon_lat(100.0, 10.0), p.from_lon_lat(105.0, 15.0)]);
        assert_eq!(lines[1].0, vec![p.from_lon_lat(110.0, 20.0), p.from_lon_lat(115.0, 25.0)]);
    }

    #[test]
    fn test_zero_rows_yield_no_geometries() {
        let frame = arrows_frame().slice(0, 0);
        let mapping = resolve_fields(&frame, &ARROW_FIELDS).unwrap();
        let lines = build_arrow_geometries(&mapping, Projection::Geographic).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_update_renders_first_frame() {
        let (mut arrows, layer) = ready_layer(ArrowsConfig::default());
        let outcome = arrows.update(&PanelData::from(arrows_frame())).unwrap();

        assert_eq!(outcome.feature_count(), 2);
        let source = layer.source();
        let features = source.features();
        assert_eq!(features[1].row_index, Some(1));
        assert!(matches!(features[0].geometry, Geometry::LineString(_)));
        assert_eq!(arrows.state(), LayerState::Ready);
    }

    #[test]
    fn test_empty_series_keeps_previous_render() {
        let (mut arrows, layer) = ready_layer(ArrowsConfig::default());
        arrows.update(&PanelData::from(arrows_frame())).unwrap();
        let revision = layer.revision();

        let outcome = arrows.update(&PanelData::default()).unwrap();

        assert_eq!(outcome, UpdateOutcome::Ignored);
        assert_eq!(layer.revision(), revision);
        assert_eq!(layer.source().len(), 2);
    }

    #[test]
    fn test_rejected_frame_clears_features() {
        let (mut arrows, layer) = ready_layer(ArrowsConfig::default());
        arrows.update(&PanelData::from(arrows_frame())).unwrap();

        let outcome = arrows.update(&PanelData::from(frame_without_dst_lon())).unwrap();

        assert_eq!(outcome.warnings(), ["dst_lot field not found.".to_string()]);
        assert_eq!(outcome.feature_count(), 0);
        assert!(layer.source().is_empty());
    }

    #[test]
    fn test_skips_to_first_resolving_frame() {
        let (mut arrows, layer) = ready_layer(ArrowsConfig::default());
        let data = PanelData::new(vec![frame_without_dst_lon(), arrows_frame(), arrows_frame()]);

        let outcome = arrows.update(&data).unwrap();

        let UpdateOutcome::Rendered { frame_index, features, warnings } = outcome else {
            panic!("expected a rendered frame");
        };
        assert_eq!((frame_index, features), (1, 2));
        assert_eq!(warnings.len(), 1);
        assert_eq!(layer.source().len(), 2);
    }

    #[test]
    fn test_static_style_is_kept() {
        let (mut arrows, layer) = ready_layer(ArrowsConfig::default());
        arrows.update(&PanelData::from(arrows_frame())).unwrap();

        let base = *arrows.style().base();
        assert!(!layer.style().is_per_feature());
        assert_eq!(layer.feature_styles(), vec![base, base]);
    }

    #[test]
    fn test_field_driven_width() {
        let config = ArrowsConfig {
            style: ArrowStyleConfig {
                line_width: Some(ScaleDimensionConfig {
                    fixed: Some(2.0),
                    min: Some(1.0),
                    max: Some(9.0),
                    field: Some("weight".to_string()),
                }),
                ..Default::default()
            },
        };
        let (mut arrows, layer) = ready_layer(config);
        arrows.update(&PanelData::from(arrows_frame())).unwrap();

        let widths: Vec<f32> = layer.feature_styles().iter().map(|s| s.line_width).collect();
        assert_eq!(widths, vec![1.0, 9.0]);
    }

    #[test]
    fn test_config_change_restyles_current_features() {
        let (mut arrows, layer) = ready_layer(ArrowsConfig::default());
        arrows.update(&PanelData::from(arrows_frame())).unwrap();
        let revision = layer.revision();

        arrows.set_config(ArrowsConfig {
            style: ArrowStyleConfig {
                color: Some(ColorDimensionConfig::fixed("#000000")),
                ..Default::default()
            },
        });

        let expected = FeatureStyle {
            color: Rgba::from_rgb(0, 0, 0),
            line_width: 6.0,
            opacity: 0.8,
        };
        assert_eq!(layer.feature_styles(), vec![expected, expected]);
        assert_eq!(layer.revision(), revision);
    }

    #[test]
    fn test_lifecycle_errors() {
        let mut arrows = ArrowsLayer::new(&MapContext::default(), ArrowsConfig::default());
        assert!(matches!(
            arrows.update(&PanelData::default()),
            Err(GeomapError::Lifecycle { .. })
        ));

        arrows.init().unwrap();
        assert!(arrows.init().is_err());

        arrows.dispose();
        assert_eq!(arrows.state(), LayerState::Disposed);
        assert!(arrows.update(&PanelData::from(arrows_frame())).is_err());
    }

    #[test]
    fn test_registers_style_editor() {
        struct Collect(Vec<CustomEditorItem>);
        impl OptionsUIBuilder for Collect {
            fn add_select(&mut self, _item: gm_core::SelectItem) {}
            fn add_text_input(&mut self, _item: gm_core::TextInputItem) {}
            fn add_custom_editor(&mut self, item: CustomEditorItem) {
                self.0.push(item);
            }
        }

        let arrows = ArrowsLayer::new(&MapContext::default(), ArrowsConfig::default());
        let mut builder = Collect(Vec::new());
        arrows.register_options_ui(&mut builder);

        assert_eq!(builder.0.len(), 1);
        let item = &builder.0[0];
        assert_eq!(item.path, "config.style");
        assert_eq!(item.editor, ARROW_STYLE_EDITOR);
        let default: ArrowStyleConfig = serde_json::from_value(item.default_value.clone()).unwrap();
        assert_eq!(default, ArrowStyleConfig::with_defaults());
    }
}
