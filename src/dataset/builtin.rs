use std::collections::HashMap;

use super::{gradient_colors, Category, DatasetCatalog, DatasetConfig, DatasetFile, LegendInfo, Rgba};

const LEVELS: [&str; 5] = ["Very Low", "Low", "Moderate", "High", "Very High"];

/// Builds a dataset whose five suitability levels map onto a two-color gradient.
fn graded_dataset(
    id: &str,
    name: &str,
    aggregated: &str,
    paths: &[&str],
    ramp: ([u8; 3], [u8; 3]),
    percentages: [f64; 5],
    legend: LegendInfo,
) -> DatasetConfig {
    let gradient = gradient_colors(ramp.0, ramp.1, LEVELS.len(), 200);
    let categories: Vec<Category> = LEVELS.iter().map(|&level| Category::from(level)).collect();

    DatasetConfig {
        id: id.to_string(),
        name: name.to_string(),
        property_key: "Class".to_string(),
        files: paths.iter().zip(&categories)
            .map(|(path, category)| DatasetFile { path: path.to_string(), category: category.clone() })
            .collect(),
        colors: categories.iter().cloned().zip(gradient).collect(),
        weights: categories.iter().cloned().zip(1..).map(|(c, w)| (c, w as f64)).collect(),
        percentages: categories.iter().cloned().zip(percentages).collect(),
        aggregated_data_path: Some(aggregated.to_string()),
        legend_info: legend,
    }
}

impl DatasetCatalog {
    /// The battery storage, rooftop solar and EV charging analyses for Worcester County.
    pub fn worcester() -> Self {
        let battery = graded_dataset(
            "battery",
            "Battery Analysis",
            "/data/Battery_analysis/Battery_aggregated_suitability_scored.json",
            &[
                "/data/Battery_analysis/Battery_analysis_wgs84_Very_Low_stripped.geojson",
                "/data/Battery_analysis/Battery_analysis_wgs84_Low_stripped.geojson",
                "/data/Battery_analysis/Battery_analysis_wgs84_Moderate_stripped.geojson",
                "/data/Battery_analysis/Battery_analysis_wgs84_High_stripped.geojson",
                "/data/Battery_analysis/Battery_analysis_wgs84_Very_High_stripped.geojson",
            ],
            ([200, 200, 255], [50, 50, 200]),
            [19.94, 20.05, 19.77, 20.22, 20.03],
            LegendInfo {
                total_entries: 319_619,
                report_path: "/data/reports/battery_storage_report.pdf".to_string(),
                description: "Analyzes potential locations for battery energy storage systems across \
                    Worcester County based on proximity to infrastructure, land use, and grid connectivity."
                    .to_string(),
            },
        );

        let solar = graded_dataset(
            "solar",
            "Solar Analysis",
            "/data/Solar_analysis/Roof_solar_aggregated_suitability_scored.json",
            &[
                "/data/Solar_analysis/Roof_solar_suitability_OK_wgs84_Very_Low_S_stripped.geojson",
                "/data/Solar_analysis/Roof_solar_suitability_OK_wgs84_Low_Suitab_stripped.geojson",
                "/data/Solar_analysis/Roof_solar_suitability_OK_wgs84_Moderate_S_stripped.geojson",
                "/data/Solar_analysis/Roof_solar_suitability_OK_wgs84_High_Suita_stripped.geojson",
                "/data/Solar_analysis/Roof_solar_suitability_OK_wgs84_Very_High_stripped.geojson",
            ],
            ([255, 200, 0], [150, 0, 0]),
            [19.96, 20.02, 20.11, 19.56, 20.36],
            LegendInfo {
                total_entries: 348_668,
                report_path: "/data/reports/Solar_siting_report.pdf".to_string(),
                description: "Evaluates rooftop solar panel suitability across Worcester County based on \
                    infrastructure proximity, environmental constraints, and equity considerations."
                    .to_string(),
            },
        );

        let mut ev = graded_dataset(
            "EV",
            "EV Charging Analysis",
            "/data/EV_analysis/EV_aggregated_suitability_scored.json",
            &[
                "/data/EV_analysis/EV_Analysis_wgs84_Very_Low_stripped.geojson",
                "/data/EV_analysis/EV_Analysis_wgs84_Low_stripped.geojson",
                "/data/EV_analysis/EV_Analysis_wgs84_Moderate_stripped.geojson",
                "/data/EV_analysis/EV_Analysis_wgs84_High_stripped.geojson",
                "/data/EV_analysis/EV_Analysis_wgs84_Very_High_stripped.geojson",
            ],
            ([200, 255, 200], [0, 100, 0]),
            [18.58, 20.96, 19.64, 18.51, 7.45],
            LegendInfo {
                total_entries: 624_520,
                report_path: "/data/reports/EV_Charging_Siting_Analysis.pdf".to_string(),
                description: "Identifies optimal locations for EV charging stations across Worcester \
                    County based on population density."
                    .to_string(),
            },
        );
        ev.files.push(DatasetFile {
            path: "/data/EV_analysis/EV_Analysis_wgs84_Unknown_stripped.geojson".to_string(),
            category: Category::Unknown,
        });
        ev.colors.insert(Category::Unknown, Rgba::new(128, 128, 128, 30));
        ev.weights.insert(Category::Unknown, 0.0);
        ev.percentages.insert(Category::Unknown, 14.87);

        Self::new(vec![battery, solar, ev])
    }
}

/// Convenience for building small tables in tests and embedding code.
pub fn category_table<V: Copy>(entries: &[(&str, V)]) -> HashMap<Category, V> {
    entries.iter().map(|&(label, value)| (Category::from(label), value)).collect()
}
