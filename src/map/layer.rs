use serde::Serialize;

use crate::aggregate::{label_elevation, HexAggregation, HexBin, RegionUnit, TownLabel, ELEVATION_SCALE};
use crate::dataset::{DatasetConfig, EnabledCategories, RegionBoundary, Rgba};

/// Keys the host compares to decide whether per-unit accessors must be re-evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTriggers {
    pub get_elevation: String,
    pub get_fill_color: String,
}

impl UpdateTriggers {
    /// Both accessors change whenever the enabled set does.
    pub fn for_enabled(enabled: &EnabledCategories) -> Self {
        let key = enabled.trigger_key();
        Self { get_elevation: key.clone(), get_fill_color: key }
    }
}

/// How values inside a hexagon are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BinAggregation { Mean }

/// Extruded hexagon density layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HexagonLayer {
    pub id: String,
    pub radius: f64,
    pub elevation_scale: f64,
    pub elevation_domain: (f64, f64),
    pub coverage: f64,
    pub extruded: bool,
    pub color_range: Vec<Rgba>,
    pub color_aggregation: BinAggregation,
    pub elevation_aggregation: BinAggregation,
    pub bins: Vec<HexBin>,
    pub update_triggers: UpdateTriggers,
}

impl HexagonLayer {
    pub fn new(config: &DatasetConfig, enabled: &EnabledCategories, aggregation: HexAggregation) -> Self {
        Self {
            id: format!("deck-hexagon-{}", config.id),
            radius: aggregation.radius,
            elevation_scale: ELEVATION_SCALE,
            elevation_domain: aggregation.elevation_domain,
            coverage: 1.0,
            extruded: true,
            color_range: aggregation.color_range,
            color_aggregation: BinAggregation::Mean,
            elevation_aggregation: BinAggregation::Mean,
            bins: aggregation.bins,
            update_triggers: UpdateTriggers::for_enabled(enabled),
        }
    }
}

/// Extruded per-region polygons.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionLayer {
    pub id: String,
    pub extruded: bool,
    pub wireframe: bool,
    pub pickable: bool,
    pub units: Vec<RegionUnit>,
    pub update_triggers: UpdateTriggers,
}

impl RegionLayer {
    pub fn new(config: &DatasetConfig, enabled: &EnabledCategories, units: Vec<RegionUnit>) -> Self {
        Self {
            id: format!("deck-town-polygons-{}", config.id),
            extruded: true,
            wireframe: true,
            pickable: true,
            units,
            update_triggers: UpdateTriggers::for_enabled(enabled),
        }
    }
}

/// A label positioned in 3D: lon, lat, height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel {
    pub text: String,
    pub position: [f64; 3],
}

/// Billboarded region-name labels floating above the columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    pub id: String,
    pub labels: Vec<PlacedLabel>,
    pub size: f64,
    pub size_units: &'static str,
    pub color: Rgba,
    pub text_anchor: &'static str,
    pub alignment_baseline: &'static str,
    pub billboard: bool,
    pub pickable: bool,
    pub background_color: Rgba,
    pub background_padding: [u8; 4],
}

impl TextLayer {
    pub fn new(config: &DatasetConfig, labels: &[TownLabel]) -> Self {
        let z = label_elevation(config);
        Self {
            id: "town-labels".to_string(),
            labels: labels.iter()
                .map(|label| PlacedLabel {
                    text: label.name.clone(),
                    position: [label.position.x(), label.position.y(), z],
                })
                .collect(),
            size: 14.0,
            size_units: "pixels",
            color: Rgba::WHITE,
            text_anchor: "middle",
            alignment_baseline: "center",
            billboard: true,
            pickable: false,
            background_color: Rgba::new(0, 0, 0, 120),
            background_padding: [6, 2, 6, 2],
        }
    }
}

/// Static white outline of every region boundary, added once to the base map.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineLayer {
    pub id: String,
    pub color: Rgba,
    pub width: f64,
    pub boundaries: Vec<RegionBoundary>,
}

impl OutlineLayer {
    pub fn new(boundaries: &[RegionBoundary]) -> Self {
        Self { id: "town-outline".to_string(), color: Rgba::WHITE, width: 2.0, boundaries: boundaries.to_vec() }
    }
}

/// Any layer the overlay can hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Layer {
    #[serde(rename = "HexagonLayer")]
    Hexagon(HexagonLayer),
    #[serde(rename = "PolygonLayer")]
    Region(RegionLayer),
    #[serde(rename = "TextLayer")]
    Text(TextLayer),
}

impl Layer {
    pub fn id(&self) -> &str {
        match self {
            Layer::Hexagon(layer) => &layer.id,
            Layer::Region(layer) => &layer.id,
            Layer::Text(layer) => &layer.id,
        }
    }

    /// Update triggers of data layers; labels have none.
    pub fn update_triggers(&self) -> Option<&UpdateTriggers> {
        match self {
            Layer::Hexagon(layer) => Some(&layer.update_triggers),
            Layer::Region(layer) => Some(&layer.update_triggers),
            Layer::Text(_) => None,
        }
    }
}

/// The complete overlay produced by one update cycle. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSet {
    /// Order in which the producing cycle started.
    pub generation: u64,
    pub dataset: String,
    pub layers: Vec<Layer>,
}

impl LayerSet {
    #[inline] pub fn get(&self, id: &str) -> Option<&Layer> { self.layers.iter().find(|layer| layer.id() == id) }

    /// The density or region layer, if the cycle produced one.
    pub fn data_layer(&self) -> Option<&Layer> {
        self.layers.iter().find(|layer| !matches!(layer, Layer::Text(_)))
    }

    pub fn labels(&self) -> Option<&TextLayer> {
        self.layers.iter().find_map(|layer| match layer { Layer::Text(text) => Some(text), _ => None })
    }
}
