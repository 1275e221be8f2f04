#![doc = "Suitability map core: centroids, hexagon and region aggregation, and debounced layer updates"]
mod aggregate;
mod dataset;
mod geom;
mod io;
mod legend;
mod map;
mod session;

#[doc(inline)]
pub use geom::centroid;

#[doc(inline)]
pub use dataset::{
    category_table, gradient_colors, AggregatedRegionRecord, Category, ColorMean, DatasetCatalog,
    DatasetConfig, DatasetFile, EnabledCategories, LegendInfo, RegionBoundary, Rgba,
};

#[doc(inline)]
pub use aggregate::{
    aggregate_hexagons, aggregate_regions, hex_radius, label_elevation, region_intensity, town_labels,
    CategoryPoints, HexAggregation, HexBin, RegionUnit, TownLabel, ELEVATION_SCALE, LABEL_ELEVATION_OFFSET,
};

#[doc(inline)]
pub use io::{
    geometry_from_value, read_aggregated_records, read_point_features,
    read_region_boundaries, DiskSource, DocumentSource, MemSource,
};

#[cfg(feature = "download")]
#[doc(inline)]
pub use io::HttpSource;

#[doc(inline)]
pub use map::{
    BinAggregation, ControllerOptions, HeadlessFactory, HeadlessSurface, HexagonLayer, Layer, LayerController,
    LayerSet, MapOptions, MapSurface, OutlineLayer, PlacedLabel, RegionLayer, SurfaceFactory, TextLayer,
    UpdateRequest, UpdateTriggers,
};

#[doc(inline)]
pub use session::{Debouncer, Session, SessionOptions, ViewState};

#[doc(inline)]
pub use legend::{pie_slices, PieSlice, PIE_START_ANGLE};
