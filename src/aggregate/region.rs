use ahash::AHashMap;
use geo::MultiPolygon;
use serde::Serialize;

use super::ELEVATION_SCALE;
use crate::dataset::{AggregatedRegionRecord, ColorMean, DatasetConfig, EnabledCategories, RegionBoundary, Rgba};

/// One region polygon with its computed intensity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionUnit {
    pub name: String,
    #[serde(serialize_with = "super::serialize_multipolygon")]
    pub polygon: MultiPolygon<f64>,
    pub elevation: f64,
    pub color: Rgba,
}

/// Elevation and fill color of a region from its aggregated record.
///
/// A region counts only if its dominant label is enabled and is not `Unknown`.
/// Within a counted region every category except `Unknown` contributes, weighted by its count.
pub fn region_intensity(
    config: &DatasetConfig,
    enabled: &EnabledCategories,
    record: Option<&AggregatedRegionRecord>,
) -> (f64, Rgba) {
    const EXCLUDED: (f64, Rgba) = (0.0, Rgba::TRANSPARENT);

    let Some(record) = record else { return EXCLUDED };
    if !enabled.admits(&record.dominant_label) { return EXCLUDED }

    let mut weighted = 0.0;
    let mut color = ColorMean::default();
    for (category, &count) in &record.category_counts {
        if category.is_unknown() { continue }
        let count = count as f64;
        weighted += config.weight(category) * count;
        color.add(config.color(category), count);
    }

    let total = color.total_weight();
    if total <= 0.0 { return EXCLUDED }
    (weighted / total * ELEVATION_SCALE, color.finish().unwrap_or(Rgba::TRANSPARENT))
}

/// Join boundaries with their records by region name and compute each region's intensity.
/// Boundaries without polygonal geometry are not rendered; regions without a record are transparent.
pub fn aggregate_regions(
    config: &DatasetConfig,
    enabled: &EnabledCategories,
    boundaries: &[RegionBoundary],
    records: &[AggregatedRegionRecord],
) -> Vec<RegionUnit> {
    let mut by_name: AHashMap<&str, &AggregatedRegionRecord> = AHashMap::with_capacity(records.len());
    for record in records {
        by_name.entry(record.region.as_str()).or_insert(record);
    }

    boundaries.iter()
        .filter_map(|boundary| {
            let polygon = boundary.polygons()?;
            let (elevation, color) = region_intensity(config, enabled, by_name.get(boundary.name.as_str()).copied());
            Some(RegionUnit { name: boundary.name.clone(), polygon, elevation, color })
        })
        .collect()
}
