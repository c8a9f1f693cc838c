//! GeoJSON export of rendered vector layers

use geo_types::{Coord, Geometry, LineString, Point};
use geojson::{Feature as GeoJsonFeature, FeatureCollection, JsonObject};
use gm_core::{Projection, VectorLayer};
use serde_json::json;

/// Output coordinate space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputCoords {
    /// Longitude and latitude in degrees
    LonLat,
    /// Coordinates of the map projection
    Projected,
}

/// Every feature of the layer with its evaluated stroke as simplestyle properties
pub fn layer_to_geojson(
    layer: &VectorLayer,
    projection: Projection,
    coords: OutputCoords,
) -> FeatureCollection {
    let source = layer.source();
    let styles = layer.feature_styles();

    let features = source
        .features()
        .iter()
        .zip(styles)
        .map(|(feature, style)| {
            let geometry = match coords {
                OutputCoords::Projected => feature.geometry.clone(),
                OutputCoords::LonLat => unproject(&feature.geometry, projection),
            };

            let mut properties = JsonObject::new();
            properties.insert("stroke".to_string(), json!(style.color.to_hex()));
            properties.insert("stroke-width".to_string(), json!(style.line_width));
            properties.insert("stroke-opacity".to_string(), json!(style.opacity));
            if let Some(row) = feature.row_index {
                properties.insert("row".to_string(), json!(row));
            }

            GeoJsonFeature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn unproject_coord(coord: Coord<f64>, projection: Projection) -> Coord<f64> {
    let (x, y) = projection.to_lon_lat(coord);
    Coord { x, y }
}

fn unproject(geometry: &Geometry<f64>, projection: Projection) -> Geometry<f64> {
    match geometry {
        Geometry::LineString(line) => Geometry::LineString(LineString::new(
            line.coords()
                .map(|c| unproject_coord(*c, projection))
                .collect(),
        )),
        Geometry::Point(point) => {
            Geometry::Point(Point::from(unproject_coord(point.0, projection)))
        }
        other => {
            tracing::warn!("Exporting unsupported geometry in projected coordinates");
            other.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array};
    use arrow::record_batch::RecordBatch;
    use gm_core::{Feature, FeatureStyle, LayerStyle, Rgba, VectorSource};
    use std::sync::Arc;

    fn layer_with_line() -> VectorLayer {
        let frame = RecordBatch::try_from_iter(vec![(
            "v",
            Arc::new(Float64Array::from(vec![1.0])) as ArrayRef,
        )])
        .unwrap();
        let p = Projection::WebMercator;
        let line = LineString::new(vec![p.from_lon_lat(100.0, 10.0), p.from_lon_lat(105.0, 15.0)]);
        let layer = VectorLayer::new(LayerStyle::Fixed(FeatureStyle {
            color: Rgba::from_rgb(0xed, 0x1e, 0xa4),
            line_width: 6.0,
            opacity: 0.8,
        }));
        layer.swap(None, VectorSource::new(vec![Feature::new(frame, 0, line)]));
        layer
    }

    #[test]
    fn test_export_carries_stroke() {
        let collection =
            layer_to_geojson(&layer_with_line(), Projection::WebMercator, OutputCoords::LonLat);

        assert_eq!(collection.features.len(), 1);
        let properties = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["stroke"], json!("#ed1ea4"));
        assert_eq!(properties["stroke-width"], json!(6.0));
        assert_eq!(properties["row"], json!(0));
    }

    #[test]
    fn test_export_unprojects_to_degrees() {
        let collection =
            layer_to_geojson(&layer_with_line(), Projection::WebMercator, OutputCoords::LonLat);
        let geometry = collection.features[0].geometry.as_ref().unwrap();
        let geojson::Value::LineString(points) = &geometry.value else {
            panic!("expected a line");
        };
        assert!((points[0][0] - 100.0).abs() < 1e-9);
        assert!((points[1][1] - 15.0).abs() < 1e-9);
    }
}
