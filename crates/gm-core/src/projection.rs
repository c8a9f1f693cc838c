//! Map projections between longitude/latitude and map coordinates

use geo_types::Coord;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Earth radius used by spherical Web Mercator (EPSG:3857)
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the EPSG:3857 world extent in meters
pub const HALF_SIZE: f64 = PI * EARTH_RADIUS;

/// Map projection used by the render surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    /// Spherical Web Mercator, coordinates in meters
    #[default]
    WebMercator,
    /// Plain longitude/latitude degrees (EPSG:4326)
    Geographic,
}

impl Projection {
    /// Convert a geographic coordinate to the projected coordinate system
    pub fn from_lon_lat(&self, lon: f64, lat: f64) -> Coord<f64> {
        match self {
            Projection::WebMercator => {
                let x = EARTH_RADIUS * lon.to_radians();
                let mut y = EARTH_RADIUS * (PI * (lat + 90.0) / 360.0).tan().ln();
                // Poles project to infinity; clamp to the world extent
                if y > HALF_SIZE {
                    y = HALF_SIZE;
                } else if y < -HALF_SIZE {
                    y = -HALF_SIZE;
                }
                Coord { x, y }
            }
            Projection::Geographic => Coord { x: lon, y: lat },
        }
    }

    /// Convert a projected coordinate back to (lon, lat)
    pub fn to_lon_lat(&self, coord: Coord<f64>) -> (f64, f64) {
        match self {
            Projection::WebMercator => {
                let lon = (coord.x / EARTH_RADIUS).to_degrees();
                let lat = (360.0 * (coord.y / EARTH_RADIUS).exp().atan()) / PI - 90.0;
                (lon, lat)
            }
            Projection::Geographic => (coord.x, coord.y),
        }
    }
}
