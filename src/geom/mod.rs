mod centroid;
mod hexbin;
mod proj;

pub use centroid::centroid;
pub(crate) use hexbin::{HexCell, HexGrid};
pub(crate) use proj::MetricProjection;
