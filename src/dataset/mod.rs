mod builtin;
mod category;
mod color;
mod config;
mod region;

pub use builtin::category_table;
pub use category::{Category, EnabledCategories};
pub use color::{gradient_colors, ColorMean, Rgba};
pub use config::{DatasetCatalog, DatasetConfig, DatasetFile, LegendInfo};
pub use region::{AggregatedRegionRecord, RegionBoundary};
