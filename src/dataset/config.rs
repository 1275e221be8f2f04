use std::{collections::HashMap, path::Path, sync::Arc};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{Category, Rgba};

/// One per-category source document of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetFile {
    pub path: String,
    #[serde(rename = "propertyValue", alias = "category")]
    pub category: Category,
}

/// Display metadata shown beside the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendInfo {
    pub total_entries: u64,
    pub report_path: String,
    pub description: String,
}

/// Static description of one suitability dataset. Read-only for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetConfig {
    pub id: String,
    pub name: String,
    pub property_key: String,
    pub files: Vec<DatasetFile>,
    pub colors: HashMap<Category, Rgba>,
    pub weights: HashMap<Category, f64>,
    #[serde(default)]
    pub percentages: HashMap<Category, f64>,
    #[serde(default)]
    pub aggregated_data_path: Option<String>,
    #[serde(default)]
    pub legend_info: LegendInfo,
}

impl DatasetConfig {
    /// Color of a category, opaque gray if the table has no entry.
    #[inline]
    pub fn color(&self, category: &Category) -> Rgba {
        self.colors.get(category).copied().unwrap_or(Rgba::GRAY)
    }

    /// Weight of a category, zero if the table has no entry.
    #[inline]
    pub fn weight(&self, category: &Category) -> f64 {
        self.weights.get(category).copied().unwrap_or(0.0)
    }

    /// Display share of a category in percent.
    #[inline]
    pub fn percentage(&self, category: &Category) -> f64 {
        self.percentages.get(category).copied().unwrap_or(0.0)
    }

    /// Global (min, max) over every weight in the table, independent of what is enabled.
    pub fn weight_domain(&self) -> (f64, f64) {
        let (min, max) = self.weights.values()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &w| (lo.min(w), hi.max(w)));
        if min.is_finite() && max.is_finite() { (min, max) } else { (0.0, 0.0) }
    }

    #[inline] pub fn max_weight(&self) -> f64 { self.weight_domain().1 }

    /// Categories in file order, without repeats.
    pub fn categories(&self) -> Vec<Category> {
        let mut seen = Vec::with_capacity(self.files.len());
        for file in &self.files {
            if !seen.contains(&file.category) { seen.push(file.category.clone()) }
        }
        seen
    }
}

/// Ordered collection of datasets; the first one is the session default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetCatalog {
    datasets: Vec<Arc<DatasetConfig>>,
}

impl DatasetCatalog {
    pub fn new(datasets: Vec<DatasetConfig>) -> Self {
        Self { datasets: datasets.into_iter().map(Arc::new).collect() }
    }

    /// Reads a catalog from JSON bytes: an array of dataset objects.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).context("Failed to parse dataset catalog JSON")
    }

    /// Reads a catalog from a JSON file at `path`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read dataset catalog: {}", path.display()))?;
        Self::from_json_bytes(&bytes)
    }

    #[inline] pub fn len(&self) -> usize { self.datasets.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.datasets.is_empty() }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &Arc<DatasetConfig>> { self.datasets.iter() }

    pub fn get(&self, id: &str) -> Option<&Arc<DatasetConfig>> {
        self.datasets.iter().find(|config| config.id == id)
    }

    #[inline] pub fn default_dataset(&self) -> Option<&Arc<DatasetConfig>> { self.datasets.first() }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_JSON: &str = r#"{
        "id": "ev",
        "name": "EV Charging Analysis",
        "propertyKey": "Class",
        "aggregatedDataPath": "/data/ev/aggregated.json",
        "files": [
            { "path": "/data/ev/low.geojson", "propertyValue": "Low" },
            { "path": "/data/ev/high.geojson", "propertyValue": "High" },
            { "path": "/data/ev/unknown.geojson", "propertyValue": "Unknown" }
        ],
        "colors": { "Low": [200, 255, 200, 200], "Unknown": [128, 128, 128, 30] },
        "weights": { "Low": 2, "High": 4, "Unknown": 0 },
        "percentages": { "Low": 60.5, "High": 25.0, "Unknown": 14.5 }
    }"#;

    #[test]
    fn parses_camel_case_config() {
        let config: DatasetConfig = serde_json::from_str(CONFIG_JSON).unwrap();
        assert_eq!(config.property_key, "Class");
        assert_eq!(config.files[2].category, Category::Unknown);
        assert_eq!(config.aggregated_data_path.as_deref(), Some("/data/ev/aggregated.json"));
        assert_eq!(config.legend_info, LegendInfo::default());
    }

    #[test]
    fn missing_mappings_fall_back_to_neutral() {
        let config: DatasetConfig = serde_json::from_str(CONFIG_JSON).unwrap();
        let high = Category::from("High");
        assert_eq!(config.color(&high), Rgba::GRAY);
        assert_eq!(config.weight(&Category::from("Moderate")), 0.0);
        assert_eq!(config.weight(&high), 4.0);
    }

    #[test]
    fn weight_domain_spans_all_categories() {
        let config: DatasetConfig = serde_json::from_str(CONFIG_JSON).unwrap();
        assert_eq!(config.weight_domain(), (0.0, 4.0));
    }

    #[test]
    fn catalog_lookup_and_default() {
        let json = format!("[{CONFIG_JSON}]");
        let catalog = DatasetCatalog::from_json_bytes(json.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.default_dataset().unwrap().id, "ev");
        assert!(catalog.get("ev").is_some());
        assert!(catalog.get("solar").is_none());
    }
}
