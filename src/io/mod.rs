mod geojson;
mod json;
mod source;

pub use self::geojson::{geometry_from_value, read_point_features, read_region_boundaries};
pub use json::read_aggregated_records;
#[cfg(feature = "download")]
pub use source::HttpSource;
pub use source::{DiskSource, DocumentSource, MemSource};
