use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, PoisonError, RwLock,
};

use anyhow::Result;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};

use super::layer::{HexagonLayer, Layer, LayerSet, OutlineLayer, RegionLayer, TextLayer};
use super::surface::{MapOptions, MapSurface, SurfaceFactory};
use crate::aggregate::{aggregate_hexagons, aggregate_regions, town_labels, CategoryPoints, TownLabel};
use crate::dataset::{DatasetConfig, EnabledCategories, RegionBoundary};
use crate::io::{read_aggregated_records, read_point_features, read_region_boundaries, DocumentSource};

/// Where the controller finds the region boundaries, and how the surface is set up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ControllerOptions {
    pub boundary_path: String,
    /// Feature property holding a region's name.
    pub name_property: String,
    pub map: MapOptions,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            boundary_path: "/data/boundaries/TOWNSSURVEY_POLYM_wgs84_worcester_only.geojson".to_string(),
            name_property: "TOWN".to_string(),
            map: MapOptions::default(),
        }
    }
}

/// Inputs of one update cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub config: Arc<DatasetConfig>,
    pub enabled: EnabledCategories,
    pub aggregate_by_town: bool,
}

impl UpdateRequest {
    /// Hex mode with every category of the dataset enabled.
    pub fn all_enabled(config: Arc<DatasetConfig>) -> Self {
        let enabled = EnabledCategories::all_of(&config);
        Self { config, enabled, aggregate_by_town: false }
    }
}

/// Boundaries and their labels, immutable once loaded.
#[derive(Debug)]
struct Towns {
    boundaries: Vec<RegionBoundary>,
    labels: Vec<TownLabel>,
}

/// Owns the overlay of one map surface and rebuilds it on request.
///
/// The overlay is only ever replaced whole; a cycle that finishes after a newer
/// cycle has already been published is discarded.
pub struct LayerController<S, M> {
    source: S,
    surface: M,
    options: ControllerOptions,
    ready: watch::Sender<bool>,
    /// False while the startup sequence is still loading boundaries.
    settled: watch::Sender<bool>,
    towns: RwLock<Option<Arc<Towns>>>,
    outline_added: AtomicBool,
    overlay: Mutex<Option<Arc<LayerSet>>>,
    generation: AtomicU64,
    closed: AtomicBool,
    startup: Mutex<Option<JoinHandle<()>>>,
}

impl<S: DocumentSource, M: MapSurface> LayerController<S, M> {
    pub fn new(surface: M, source: S, options: ControllerOptions) -> Self {
        Self {
            source,
            surface,
            options,
            ready: watch::Sender::new(false),
            settled: watch::Sender::new(true),
            towns: RwLock::new(None),
            outline_added: AtomicBool::new(false),
            overlay: Mutex::new(None),
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            startup: Mutex::new(None),
        }
    }

    /// Create the surface in `container` and schedule the startup sequence:
    /// once the surface is ready, load boundaries, add the outline, and render `initial`.
    ///
    /// The initial cycle takes its generation now, so any update requested meanwhile
    /// supersedes it. Such updates also wait for the boundaries, so they carry labels.
    /// Must be called from within a tokio runtime.
    pub fn initialize<F>(
        factory: &F,
        container: &str,
        source: S,
        options: ControllerOptions,
        initial: UpdateRequest,
    ) -> Result<Arc<Self>>
    where
        F: SurfaceFactory<Surface = M>,
    {
        let surface = factory.create(container, &options.map)?;
        let controller = Arc::new(Self::new(surface, source, options));

        controller.settled.send_replace(false);
        let generation = controller.next_generation();

        let this = Arc::clone(&controller);
        let handle = tokio::spawn(async move {
            wait_until(&this.ready).await;
            this.load_boundaries().await;
            this.settled.send_replace(true);
            this.update_layers_with(generation, &initial).await;
        });
        *controller.startup.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        Ok(controller)
    }

    /// Signal from the host that the surface finished loading.
    pub fn mark_ready(&self) { self.ready.send_replace(true); }

    #[inline] pub fn is_ready(&self) -> bool { *self.ready.borrow() }

    #[inline] fn next_generation(&self) -> u64 { self.generation.fetch_add(1, Ordering::SeqCst) + 1 }

    fn towns(&self) -> Option<Arc<Towns>> {
        self.towns.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Whether outlines, region mode and labels are available.
    #[inline] pub fn towns_available(&self) -> bool { self.towns().is_some() }

    pub fn town_labels(&self) -> Vec<TownLabel> {
        self.towns().map(|towns| towns.labels.clone()).unwrap_or_default()
    }

    /// Fetch the boundary document and derive labels from it.
    /// On failure the per-town features stay unavailable until a later call succeeds.
    pub async fn load_boundaries(&self) -> bool {
        let path = &self.options.boundary_path;
        let loaded = match self.source.fetch(path).await {
            Ok(bytes) => read_region_boundaries(&bytes, &self.options.name_property),
            Err(err) => Err(err),
        };

        let boundaries = match loaded {
            Ok(boundaries) => boundaries,
            Err(err) => {
                warn!("[boundaries] could not load town boundaries from {path}: {err:#}");
                return false;
            }
        };

        let labels = town_labels(&boundaries);
        if !self.outline_added.swap(true, Ordering::SeqCst) {
            self.surface.add_outline(OutlineLayer::new(&boundaries));
        }
        info!("[boundaries] loaded {} regions from {path}", boundaries.len());

        *self.towns.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(Towns { boundaries, labels }));
        true
    }

    /// Rebuild every overlay layer for `request` and swap them in at once.
    /// Returns the published set, or `None` if it was superseded or the controller was torn down.
    pub async fn update_layers(&self, request: &UpdateRequest) -> Option<Arc<LayerSet>> {
        wait_until(&self.ready).await;
        wait_until(&self.settled).await;
        let generation = self.next_generation();
        self.update_layers_with(generation, request).await
    }

    async fn update_layers_with(&self, generation: u64, request: &UpdateRequest) -> Option<Arc<LayerSet>> {
        let config = &request.config;
        let towns = self.towns();

        let region_source = match (request.aggregate_by_town, &config.aggregated_data_path, &towns) {
            (false, _, _) => None,
            (true, Some(path), Some(towns)) => Some((path.as_str(), towns)),
            (true, None, _) => {
                info!("[update] dataset {} has no aggregated table; rendering hexagons", config.id);
                None
            }
            (true, _, None) => {
                warn!("[update] town boundaries unavailable; rendering hexagons");
                None
            }
        };

        let data_layer = match region_source {
            Some((path, towns)) => self.region_layer(request, path, towns).await,
            None => self.hexagon_layer(request).await,
        };

        let mut layers = Vec::with_capacity(2);
        layers.extend(data_layer);
        if let Some(towns) = &towns {
            layers.push(Layer::Text(TextLayer::new(config, &towns.labels)));
        }

        self.publish(LayerSet { generation, dataset: config.id.clone(), layers })
    }

    async fn hexagon_layer(&self, request: &UpdateRequest) -> Option<Layer> {
        let config = &request.config;
        let files: Vec<_> = config.files.iter()
            .filter(|file| request.enabled.admits(&file.category))
            .collect();

        let loads: Vec<_> = files.iter()
            .map(|file| async move {
                let bytes = self.source.fetch(&file.path).await?;
                read_point_features(&bytes)
            })
            .collect();
        let fetched = join_all(loads).await;

        let mut sources = Vec::with_capacity(files.len());
        for (file, result) in files.iter().zip(fetched) {
            match result {
                Ok(points) => sources.push(CategoryPoints::new(file.category.clone(), points)),
                Err(err) => warn!("[update] could not load file {}: {err:#}", file.path),
            }
        }

        match aggregate_hexagons(config, &request.enabled, &sources) {
            Ok(aggregation) => Some(Layer::Hexagon(HexagonLayer::new(config, &request.enabled, aggregation))),
            Err(err) => {
                warn!("[update] could not bin observations for {}: {err:#}", config.id);
                None
            }
        }
    }

    async fn region_layer(&self, request: &UpdateRequest, path: &str, towns: &Towns) -> Option<Layer> {
        let records = match self.source.fetch(path).await {
            Ok(bytes) => read_aggregated_records(&bytes),
            Err(err) => Err(err),
        };

        match records {
            Ok(records) => {
                let units = aggregate_regions(&request.config, &request.enabled, &towns.boundaries, &records);
                Some(Layer::Region(RegionLayer::new(&request.config, &request.enabled, units)))
            }
            Err(err) => {
                warn!("[update] could not load aggregated data {path}: {err:#}");
                None
            }
        }
    }

    /// The single write point of the overlay.
    fn publish(&self, set: LayerSet) -> Option<Arc<LayerSet>> {
        let mut overlay = self.overlay.lock().unwrap_or_else(PoisonError::into_inner);

        if self.closed.load(Ordering::SeqCst) {
            debug!("[update] discarding cycle {} after teardown", set.generation);
            return None;
        }
        if let Some(current) = overlay.as_ref() {
            if current.generation > set.generation {
                debug!("[update] discarding cycle {}, superseded by {}", set.generation, current.generation);
                return None;
            }
        }

        let set = Arc::new(set);
        *overlay = Some(Arc::clone(&set));
        self.surface.set_overlay(Arc::clone(&set));
        debug!("[update] published cycle {} with {} layers", set.generation, set.layers.len());
        Some(set)
    }

    /// The overlay currently on the surface.
    pub fn active_layers(&self) -> Option<Arc<LayerSet>> {
        self.overlay.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Stop the startup sequence, refuse further swaps, and release the surface. Idempotent.
    pub fn teardown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) { return }
        if let Some(handle) = self.startup.lock().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
        }
        // Release updates parked behind the aborted startup; their swaps are refused.
        self.settled.send_replace(true);
        // Taking the overlay lock orders the release after any swap already in progress.
        let _overlay = self.overlay.lock().unwrap_or_else(PoisonError::into_inner);
        self.surface.release();
        info!("[session] map surface released");
    }
}

/// Suspend until `signal` is true. The sender outlives every waiter, so the channel cannot close.
async fn wait_until(signal: &watch::Sender<bool>) {
    let mut receiver = signal.subscribe();
    let _ = receiver.wait_for(|value| *value).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetCatalog;
    use crate::io::MemSource;
    use crate::map::HeadlessSurface;

    fn request() -> UpdateRequest {
        UpdateRequest::all_enabled(Arc::clone(DatasetCatalog::worcester().get("battery").unwrap()))
    }

    #[tokio::test]
    async fn stale_cycle_is_discarded_at_swap() {
        let surface = HeadlessSurface::new();
        let controller = LayerController::new(surface.clone(), MemSource::new(), ControllerOptions::default());

        let newer = controller.publish(LayerSet { generation: 2, dataset: "battery".into(), layers: vec![] });
        let older = controller.publish(LayerSet { generation: 1, dataset: "solar".into(), layers: vec![] });

        assert!(newer.is_some());
        assert!(older.is_none());
        assert_eq!(controller.active_layers().unwrap().dataset, "battery");
        assert_eq!(surface.overlays().len(), 1);
    }

    #[tokio::test]
    async fn missing_sources_still_publish() {
        let surface = HeadlessSurface::new();
        let controller = LayerController::new(surface.clone(), MemSource::new(), ControllerOptions::default());
        controller.mark_ready();

        assert!(!controller.load_boundaries().await);
        assert!(!controller.towns_available());

        let set = controller.update_layers(&request()).await.unwrap();
        assert_eq!(set.layers.len(), 1);
        match &set.layers[0] {
            Layer::Hexagon(layer) => assert!(layer.bins.is_empty()),
            other => panic!("unexpected layer {}", other.id()),
        }
        assert!(surface.outlines().is_empty());
    }

    #[tokio::test]
    async fn teardown_releases_once_and_blocks_swaps() {
        let surface = HeadlessSurface::new();
        let controller = LayerController::new(surface.clone(), MemSource::new(), ControllerOptions::default());
        controller.mark_ready();
        controller.teardown();
        controller.teardown();

        assert!(surface.is_released());
        assert!(controller.update_layers(&request()).await.is_none());
        assert!(surface.overlays().is_empty());
    }
}
