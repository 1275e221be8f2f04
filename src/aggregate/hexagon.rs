use std::collections::BTreeMap;

use anyhow::Result;
use geo::{Coord, Point, Rect};
use serde::Serialize;
use tracing::{debug, warn};

use crate::dataset::{Category, ColorMean, DatasetConfig, EnabledCategories, Rgba};
use crate::geom::{HexCell, HexGrid, MetricProjection};

/// Hexagon radius in metres for a given number of observations.
/// Larger data sets get coarser bins; non-decreasing in `count`.
pub fn hex_radius(count: usize) -> f64 {
    match count {
        n if n > 500_000 => 500.0,
        n if n > 200_000 => 350.0,
        n if n > 100_000 => 250.0,
        _ => 200.0,
    }
}

/// Point observations loaded from one category's source document.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryPoints {
    pub category: Category,
    pub points: Vec<Coord<f64>>,
}

impl CategoryPoints {
    pub fn new(category: Category, points: Vec<Coord<f64>>) -> Self { Self { category, points } }
}

/// One aggregated hexagon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HexBin {
    /// Bin centre, lon/lat.
    #[serde(serialize_with = "super::serialize_point")]
    pub position: Point<f64>,
    pub count: usize,
    /// Mean weight of the observations in the bin.
    pub elevation: f64,
    /// Per-channel mean color of the observations in the bin.
    pub color: Rgba,
}

/// Result of binning the enabled observations of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct HexAggregation {
    pub radius: f64,
    /// (min, max) weight over the whole dataset, not just the enabled categories.
    pub elevation_domain: (f64, f64),
    /// Included categories in first-seen order.
    pub categories: Vec<Category>,
    /// Colors of `categories`, in the same order.
    pub color_range: Vec<Rgba>,
    pub bins: Vec<HexBin>,
}

impl HexAggregation {
    /// Total number of binned observations.
    pub fn observations(&self) -> usize { self.bins.iter().map(|bin| bin.count).sum() }

    /// Elevation of a bin mapped into [0, 1] against the dataset's weight domain.
    pub fn normalized_elevation(&self, bin: &HexBin) -> f64 {
        let (min, max) = self.elevation_domain;
        if max > min { ((bin.elevation - min) / (max - min)).clamp(0.0, 1.0) } else { 0.0 }
    }
}

#[derive(Default)]
struct BinAccumulator {
    count: usize,
    weight: f64,
    color: ColorMean,
}

/// Bin the observations of enabled categories into hexagons.
/// Sources whose category is disabled, or `Unknown`, are ignored.
pub fn aggregate_hexagons(
    config: &DatasetConfig,
    enabled: &EnabledCategories,
    sources: &[CategoryPoints],
) -> Result<HexAggregation> {
    let included: Vec<&CategoryPoints> = sources.iter()
        .filter(|source| enabled.admits(&source.category))
        .collect();

    let mut categories: Vec<Category> = Vec::new();
    for source in &included {
        if !categories.contains(&source.category) { categories.push(source.category.clone()) }
    }

    let count: usize = included.iter().map(|source| source.points.len()).sum();
    let radius = hex_radius(count);

    let mut aggregation = HexAggregation {
        radius,
        elevation_domain: config.weight_domain(),
        color_range: categories.iter().map(|category| config.color(category)).collect(),
        categories,
        bins: Vec::new(),
    };

    let Some(bounds) = bounds(included.iter().flat_map(|source| source.points.iter().copied())) else {
        return Ok(aggregation);
    };

    let proj = MetricProjection::for_bounds(bounds)?;
    let grid = HexGrid::new(radius);

    let mut cells: BTreeMap<HexCell, BinAccumulator> = BTreeMap::new();
    let mut skipped = 0usize;
    for source in &included {
        let weight = config.weight(&source.category);
        let color = config.color(&source.category);
        for &point in &source.points {
            let Ok(projected) = proj.forward(point) else { skipped += 1; continue };
            let bin = cells.entry(grid.cell(projected)).or_default();
            bin.count += 1;
            bin.weight += weight;
            bin.color.add(color, 1.0);
        }
    }
    if skipped > 0 { warn!("[hexagon] skipped {skipped} observations that could not be projected") }

    aggregation.bins = cells.into_iter()
        .map(|(cell, bin)| {
            Ok(HexBin {
                position: proj.inverse(grid.center(cell))?.into(),
                count: bin.count,
                elevation: bin.weight / bin.count as f64,
                color: bin.color.finish().unwrap_or(Rgba::TRANSPARENT),
            })
        })
        .collect::<Result<_>>()?;

    debug!("[hexagon] {count} observations -> {} bins (radius {} m)", aggregation.bins.len(), grid.radius());
    Ok(aggregation)
}

/// Bounding rectangle of finite coordinates, `None` when there are none.
fn bounds(coords: impl Iterator<Item = Coord<f64>>) -> Option<Rect<f64>> {
    coords
        .filter(|c| c.x.is_finite() && c.y.is_finite())
        .map(|c| Rect::new(c, c))
        .reduce(|a, b| Rect::new(
            Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
            Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{category_table, DatasetFile};

    fn config() -> DatasetConfig {
        DatasetConfig {
            id: "battery".into(),
            name: "Battery Analysis".into(),
            property_key: "Class".into(),
            files: ["Low", "High", "Unknown"].iter()
                .map(|&label| DatasetFile { path: format!("/{label}.geojson"), category: label.into() })
                .collect(),
            colors: category_table(&[
                ("Low", Rgba::new(200, 200, 255, 200)),
                ("High", Rgba::new(50, 50, 200, 200)),
            ]),
            weights: category_table(&[("Low", 2.0), ("High", 4.0), ("Very High", 5.0), ("Unknown", 0.0)]),
            percentages: Default::default(),
            aggregated_data_path: None,
            legend_info: Default::default(),
        }
    }

    fn at(lon: f64, lat: f64) -> Coord<f64> { Coord { x: lon, y: lat } }

    #[test]
    fn radius_steps_are_monotonic() {
        assert_eq!(hex_radius(0), 200.0);
        assert_eq!(hex_radius(100_000), 200.0);
        assert_eq!(hex_radius(100_001), 250.0);
        assert_eq!(hex_radius(200_001), 350.0);
        assert_eq!(hex_radius(500_001), 500.0);

        let mut last = 0.0;
        for n in (0..700_000).step_by(997) {
            assert!(hex_radius(n) >= last);
            last = hex_radius(n);
        }
    }

    #[test]
    fn coincident_points_blend_into_one_bin() {
        let sources = vec![
            CategoryPoints::new("Low".into(), vec![at(-71.80, 42.26)]),
            CategoryPoints::new("High".into(), vec![at(-71.80, 42.26), at(-71.80, 42.26)]),
        ];
        let enabled: EnabledCategories = ["Low", "High"].into_iter().collect();
        let agg = aggregate_hexagons(&config(), &enabled, &sources).unwrap();

        assert_eq!(agg.bins.len(), 1);
        let bin = &agg.bins[0];
        assert_eq!(bin.count, 3);
        assert!((bin.elevation - 10.0 / 3.0).abs() < 1e-12);
        assert_eq!(bin.color, Rgba::new(100, 100, 218, 200));
        assert!((bin.position.x() + 71.80).abs() < 0.01 && (bin.position.y() - 42.26).abs() < 0.01);
    }

    #[test]
    fn distant_points_land_in_separate_bins() {
        let sources = vec![CategoryPoints::new("Low".into(), vec![at(-71.80, 42.26), at(-71.70, 42.26)])];
        let enabled: EnabledCategories = ["Low"].into_iter().collect();
        let agg = aggregate_hexagons(&config(), &enabled, &sources).unwrap();
        assert_eq!(agg.bins.len(), 2);
        assert_eq!(agg.observations(), 2);
    }

    #[test]
    fn disabled_and_unknown_sources_are_excluded() {
        let sources = vec![
            CategoryPoints::new("Unknown".into(), vec![at(-71.8, 42.2)]),
            CategoryPoints::new("High".into(), vec![at(-71.8, 42.2)]),
            CategoryPoints::new("Low".into(), vec![at(-71.9, 42.3)]),
        ];
        let enabled: EnabledCategories = ["Unknown", "Low"].into_iter().collect();
        let agg = aggregate_hexagons(&config(), &enabled, &sources).unwrap();
        assert_eq!(agg.categories, vec![Category::from("Low")]);
        assert_eq!(agg.observations(), 1);
        assert_eq!(agg.bins[0].elevation, 2.0);
    }

    #[test]
    fn color_range_follows_first_seen_order() {
        let sources = vec![
            CategoryPoints::new("High".into(), vec![at(-71.8, 42.2)]),
            CategoryPoints::new("Low".into(), vec![at(-71.8, 42.2)]),
        ];
        let enabled: EnabledCategories = ["Low", "High"].into_iter().collect();
        let agg = aggregate_hexagons(&config(), &enabled, &sources).unwrap();
        assert_eq!(agg.categories, vec![Category::from("High"), Category::from("Low")]);
        assert_eq!(agg.color_range, vec![Rgba::new(50, 50, 200, 200), Rgba::new(200, 200, 255, 200)]);
    }

    #[test]
    fn domain_covers_all_weights_not_just_enabled() {
        let sources = vec![CategoryPoints::new("Low".into(), vec![at(-71.8, 42.2)])];
        let enabled: EnabledCategories = ["Low"].into_iter().collect();
        let agg = aggregate_hexagons(&config(), &enabled, &sources).unwrap();
        assert_eq!(agg.elevation_domain, (0.0, 5.0));
        assert!((agg.normalized_elevation(&agg.bins[0]) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn empty_enabled_set_renders_nothing() {
        let sources = vec![CategoryPoints::new("Low".into(), vec![at(-71.8, 42.2)])];
        let agg = aggregate_hexagons(&config(), &EnabledCategories::new(), &sources).unwrap();
        assert!(agg.bins.is_empty());
        assert!(agg.color_range.is_empty());
        assert_eq!(agg.radius, 200.0);
    }
}
