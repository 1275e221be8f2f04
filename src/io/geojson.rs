use anyhow::{Context, Result};
use geo::{Coord, Geometry};
use geojson::{Feature, GeoJson, Value};

use crate::dataset::RegionBoundary;

/// Parse GeoJSON bytes into their features; a bare geometry yields no features.
fn read_features(bytes: &[u8]) -> Result<Vec<Feature>> {
    let text = std::str::from_utf8(bytes).context("GeoJSON is not valid UTF-8")?;
    let geojson: GeoJson = text.parse().context("Failed to parse GeoJSON")?;
    Ok(match geojson {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => Vec::new(),
    })
}

/// Read the coordinates of every Point feature; other features are skipped.
pub fn read_point_features(bytes: &[u8]) -> Result<Vec<Coord<f64>>> {
    Ok(read_features(bytes)?
        .into_iter()
        .filter_map(|feature| match geometry_from_value(feature.geometry?.value)? {
            Geometry::Point(point) => Some(point.0),
            _ => None,
        })
        .collect())
}

/// Read named region boundaries. The name comes from `name_property`, empty when absent.
pub fn read_region_boundaries(bytes: &[u8], name_property: &str) -> Result<Vec<RegionBoundary>> {
    Ok(read_features(bytes)?
        .into_iter()
        .filter_map(|feature| {
            let name = feature.property(name_property)
                .and_then(|value| value.as_str())
                .unwrap_or_default()
                .to_string();
            let geometry = geometry_from_value(feature.geometry?.value)?;
            Some(RegionBoundary::new(name, geometry))
        })
        .collect())
}

/// Convert a GeoJSON geometry value into `geo` types.
/// `None` if any position has fewer than two components or a polygon has no rings.
pub fn geometry_from_value(value: Value) -> Option<Geometry<f64>> {
    if !well_formed(&value) { return None }
    Geometry::try_from(value).ok()
}

fn well_formed(value: &Value) -> bool {
    let position = |p: &Vec<f64>| p.len() >= 2;
    let line = |l: &Vec<Vec<f64>>| l.iter().all(position);
    let polygon = |rings: &Vec<Vec<Vec<f64>>>| !rings.is_empty() && rings.iter().all(line);
    match value {
        Value::Point(p) => position(p),
        Value::MultiPoint(points) => points.iter().all(position),
        Value::LineString(l) => line(l),
        Value::MultiLineString(lines) => lines.iter().all(line),
        Value::Polygon(rings) => polygon(rings),
        Value::MultiPolygon(polygons) => polygons.iter().all(polygon),
        Value::GeometryCollection(geometries) => geometries.iter().all(|g| well_formed(&g.value)),
    }
}
