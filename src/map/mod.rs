//! Layer descriptors, the map surface seam, and the controller that swaps overlays.

mod controller;
mod layer;
mod surface;

pub use controller::{ControllerOptions, LayerController, UpdateRequest};
pub use layer::{BinAggregation, HexagonLayer, Layer, LayerSet, OutlineLayer, PlacedLabel, RegionLayer, TextLayer, UpdateTriggers};
pub use surface::{HeadlessFactory, HeadlessSurface, MapOptions, MapSurface, SurfaceFactory};
