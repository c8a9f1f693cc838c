use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use geo_types::Geometry;
use gm_core::{
    MapContext, MapLayerOptions, PanelData, Projection, Rgba, Theme, UpdateOutcome, VectorLayer,
};
use gm_layers::style::colors::categorical_color;
use gm_layers::LayerRegistry;
use serde_json::json;
use std::sync::Arc;

fn column(values: &[f64]) -> ArrayRef {
    Arc::new(Float64Array::from(values.to_vec()))
}

fn flows() -> RecordBatch {
    RecordBatch::try_from_iter(vec![
        ("src_lat", column(&[10.0, 20.0])),
        ("src_lot", column(&[100.0, 110.0])),
        ("dst_lat", column(&[15.0, 25.0])),
        ("dst_lot", column(&[105.0, 115.0])),
        (
            "carrier",
            Arc::new(StringArray::from(vec!["north", "south"])) as ArrayRef,
        ),
    ])
    .unwrap()
}

fn create_arrows(config: serde_json::Value) -> (Box<dyn gm_core::MapLayerHandler>, VectorLayer) {
    let registry = LayerRegistry::standard();
    let options = MapLayerOptions::new("arrows", config);
    let mut handler = registry
        .create(
            &MapContext::new(Projection::WebMercator),
            &options,
            &Theme::default(),
        )
        .unwrap();
    let layer = handler.init().unwrap().as_vector().cloned().unwrap();
    (handler, layer)
}

#[test]
fn renders_projected_lines_for_each_row() {
    let (mut handler, layer) = create_arrows(serde_json::Value::Null);

    let outcome = handler.update(&PanelData::from(flows())).unwrap();
    assert_eq!(outcome.feature_count(), 2);

    let p = Projection::WebMercator;
    let expected = [
        [p.from_lon_lat(100.0, 10.0), p.from_lon_lat(105.0, 15.0)],
        [p.from_lon_lat(110.0, 20.0), p.from_lon_lat(115.0, 25.0)],
    ];
    let source = layer.source();
    for (feature, ends) in source.features().iter().zip(expected) {
        let Geometry::LineString(line) = &feature.geometry else {
            panic!("arrow features are lines");
        };
        assert_eq!(line.0, ends.to_vec());
    }
}

#[test]
fn missing_column_clears_previous_features() {
    let (mut handler, layer) = create_arrows(serde_json::Value::Null);
    handler.update(&PanelData::from(flows())).unwrap();
    assert_eq!(layer.source().len(), 2);

    let partial = flows().project(&[0, 1, 2]).unwrap();
    let outcome = handler.update(&PanelData::from(partial)).unwrap();

    assert_eq!(
        outcome,
        UpdateOutcome::Cleared {
            warnings: vec!["dst_lot field not found.".to_string()],
        }
    );
    assert!(layer.source().is_empty());
}

#[test]
fn color_follows_text_field() {
    let (mut handler, layer) = create_arrows(json!({
        "style": {
            "color": { "fixed": "#000000", "field": "carrier" },
            "opacity": 0.5,
        }
    }));
    handler.update(&PanelData::from(flows())).unwrap();

    let styles = layer.feature_styles();
    assert_eq!(styles[0].color, categorical_color(0));
    assert_eq!(styles[1].color, categorical_color(1));
    assert_eq!(styles[1].opacity, 0.5);
    assert_eq!(styles[1].line_width, 6.0);
    assert_eq!(styles[0].stroke().a, 128);

    // A new frame gets its own dimensions
    let reordered = RecordBatch::try_from_iter(vec![
        ("src_lat", column(&[1.0])),
        ("src_lot", column(&[2.0])),
        ("dst_lat", column(&[3.0])),
        ("dst_lot", column(&[4.0])),
        ("carrier", Arc::new(StringArray::from(vec!["south"])) as ArrayRef),
    ])
    .unwrap();
    handler.update(&PanelData::from(reordered)).unwrap();
    assert_eq!(layer.feature_styles(), vec![styles[0]]);
    assert_ne!(layer.feature_styles()[0].color, Rgba::from_rgb(0, 0, 0));
}

#[test]
fn malformed_style_attribute_keeps_the_others() {
    let (mut handler, layer) = create_arrows(json!({
        "style": {
            "color": { "fixed": "#000000" },
            "lineWidth": { "fixed": "wide" },
        }
    }));
    handler.update(&PanelData::from(flows())).unwrap();

    let styles = layer.feature_styles();
    assert_eq!(styles.len(), 2);
    assert_eq!(styles[0].color, Rgba::from_rgb(0, 0, 0));
    assert_eq!(styles[0].line_width, 6.0);
    assert_eq!(styles[0].opacity, 0.8);
}

#[test]
fn malformed_style_object_uses_defaults() {
    let (mut handler, layer) = create_arrows(json!({ "style": "thin and red" }));
    handler.update(&PanelData::from(flows())).unwrap();

    assert_eq!(layer.feature_styles()[0].color, Rgba::from_rgb(0xed, 0x1e, 0xa4));
}
