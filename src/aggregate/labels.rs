use geo::Point;
use serde::Serialize;

use super::ELEVATION_SCALE;
use crate::dataset::{DatasetConfig, RegionBoundary};
use crate::geom::centroid;

/// Height added above the tallest possible column so labels stay visible.
pub const LABEL_ELEVATION_OFFSET: f64 = 5000.0;

/// A region name placed at the region's representative point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TownLabel {
    pub name: String,
    #[serde(serialize_with = "super::serialize_point")]
    pub position: Point<f64>,
}

/// One label per boundary. Computed once per boundary load and reused by every render.
pub fn town_labels(boundaries: &[RegionBoundary]) -> Vec<TownLabel> {
    boundaries.iter()
        .map(|boundary| TownLabel { name: boundary.name.clone(), position: centroid(&boundary.geometry) })
        .collect()
}

/// Label height for a dataset: above the tallest extruded column in either mode.
#[inline]
pub fn label_elevation(config: &DatasetConfig) -> f64 {
    config.max_weight() * ELEVATION_SCALE + LABEL_ELEVATION_OFFSET
}

#[cfg(test)]
mod tests {
    use geo::{polygon, Geometry};

    use super::*;
    use crate::dataset::DatasetCatalog;

    #[test]
    fn labels_sit_at_centroids() {
        let boundaries = vec![RegionBoundary::new(
            "STERLING",
            Geometry::Polygon(polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 2.0), (x: 0.0, y: 2.0)]),
        )];
        let labels = town_labels(&boundaries);
        assert_eq!(labels, vec![TownLabel { name: "STERLING".into(), position: Point::new(1.0, 1.0) }]);
    }

    #[test]
    fn label_height_clears_max_column() {
        let catalog = DatasetCatalog::worcester();
        assert_eq!(label_elevation(catalog.get("battery").unwrap()), 5025.0);
    }
}
