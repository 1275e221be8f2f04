use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::layer::{LayerSet, OutlineLayer};

/// Camera and style settings used when the base map is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub style: String,
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub max_bounds: [[f64; 2]; 2],
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            style: "https://basemaps.cartocdn.com/gl/dark-matter-gl-style/style.json".to_string(),
            center: [-71.0589, 42.3601],
            zoom: 8.0,
            min_zoom: 6.0,
            max_zoom: 14.0,
            max_bounds: [[-73.6, 41.1], [-69.8, 42.9]],
        }
    }
}

/// The external map-rendering surface. Tile rendering and navigation live on the other side.
pub trait MapSurface: Send + Sync + 'static {
    /// Add the static region outline beneath the overlay. Called at most once per boundary load.
    fn add_outline(&self, outline: OutlineLayer);

    /// Replace the whole overlay in a single step.
    fn set_overlay(&self, layers: Arc<LayerSet>);

    /// Release the surface at session end.
    fn release(&self);
}

/// Creates a surface inside a host container.
pub trait SurfaceFactory {
    type Surface: MapSurface;

    fn create(&self, container: &str, options: &MapOptions) -> Result<Self::Surface>;
}

#[derive(Debug, Default)]
struct Recorded {
    container: String,
    outlines: Vec<OutlineLayer>,
    overlays: Vec<Arc<LayerSet>>,
    released: bool,
}

/// A surface that renders nothing and records what it was given.
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    recorded: Arc<Mutex<Recorded>>,
}

impl HeadlessSurface {
    pub fn new() -> Self { Self::default() }

    fn with<T>(&self, f: impl FnOnce(&mut Recorded) -> T) -> T {
        f(&mut self.recorded.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn container(&self) -> String { self.with(|r| r.container.clone()) }

    /// Every overlay set so far, oldest first.
    pub fn overlays(&self) -> Vec<Arc<LayerSet>> { self.with(|r| r.overlays.clone()) }

    /// The overlay currently shown.
    pub fn current(&self) -> Option<Arc<LayerSet>> { self.with(|r| r.overlays.last().cloned()) }

    pub fn outlines(&self) -> Vec<OutlineLayer> { self.with(|r| r.outlines.clone()) }

    pub fn is_released(&self) -> bool { self.with(|r| r.released) }
}

impl MapSurface for HeadlessSurface {
    fn add_outline(&self, outline: OutlineLayer) { self.with(|r| r.outlines.push(outline)) }

    fn set_overlay(&self, layers: Arc<LayerSet>) { self.with(|r| r.overlays.push(layers)) }

    fn release(&self) { self.with(|r| r.released = true) }
}

/// Hands out a pre-built [`HeadlessSurface`], so callers can keep a handle for inspection.
#[derive(Debug, Clone, Default)]
pub struct HeadlessFactory {
    surface: HeadlessSurface,
}

impl HeadlessFactory {
    pub fn new(surface: HeadlessSurface) -> Self { Self { surface } }
}

impl SurfaceFactory for HeadlessFactory {
    type Surface = HeadlessSurface;

    fn create(&self, container: &str, _options: &MapOptions) -> Result<HeadlessSurface> {
        self.surface.with(|r| r.container = container.to_string());
        Ok(self.surface.clone())
    }
}
