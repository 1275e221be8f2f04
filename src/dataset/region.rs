use std::collections::HashMap;

use geo::{Geometry, MultiPolygon};
use serde::{Deserialize, Serialize};

use super::Category;

/// A named administrative boundary (a town), loaded once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBoundary {
    pub name: String,
    pub geometry: Geometry<f64>,
}

impl RegionBoundary {
    pub fn new(name: impl Into<String>, geometry: Geometry<f64>) -> Self {
        Self { name: name.into(), geometry }
    }

    /// The polygonal footprint used for region rendering; `None` for non-areal geometry.
    pub fn polygons(&self) -> Option<MultiPolygon<f64>> {
        match &self.geometry {
            Geometry::Polygon(polygon) => Some(MultiPolygon::new(vec![polygon.clone()])),
            Geometry::MultiPolygon(polygons) => Some(polygons.clone()),
            _ => None,
        }
    }
}

/// Precomputed per-region category counts from the aggregated table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRegionRecord {
    #[serde(rename = "town", alias = "region")]
    pub region: String,
    #[serde(rename = "class_counts", alias = "categoryCounts")]
    pub category_counts: HashMap<Category, u64>,
    /// Dominant category; `Unknown` excludes the region from intensity.
    #[serde(rename = "suitability_label", alias = "dominantLabel")]
    pub dominant_label: Category,
    #[serde(rename = "avg_score", alias = "avgScore", default)]
    pub avg_score: f64,
}
