//! Turns dataset observations into per-unit elevations and colors.

mod hexagon;
mod labels;
mod region;

use geo::{MultiPolygon, Point};
use serde::{Serialize, Serializer};

pub use hexagon::{aggregate_hexagons, hex_radius, CategoryPoints, HexAggregation, HexBin};
pub use labels::{label_elevation, town_labels, TownLabel, LABEL_ELEVATION_OFFSET};
pub use region::{aggregate_regions, region_intensity, RegionUnit};

/// Display multiplier applied to weights in both modes, and to the label height.
pub const ELEVATION_SCALE: f64 = 5.0;

/// Serialize a point as `[x, y]`.
pub(crate) fn serialize_point<S: Serializer>(point: &Point<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    [point.x(), point.y()].serialize(serializer)
}

/// Serialize a MultiPolygon as a GeoJSON geometry object.
pub(crate) fn serialize_multipolygon<S: Serializer>(polygons: &MultiPolygon<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    geojson::Geometry::new(geojson::Value::from(polygons)).serialize(serializer)
}
