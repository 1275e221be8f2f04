//! The UI boundary: user-driven state changes, debounced into controller updates.

mod debounce;
mod state;

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::dataset::DatasetCatalog;
use crate::io::DocumentSource;
use crate::map::{ControllerOptions, LayerController, MapSurface, SurfaceFactory};

pub use debounce::Debouncer;
pub use state::ViewState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionOptions {
    /// Quiet period after the last change before layers are rebuilt.
    pub debounce_ms: u64,
}

impl Default for SessionOptions {
    fn default() -> Self { Self { debounce_ms: 1000 } }
}

impl SessionOptions {
    #[inline] pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }
}

/// One map view and the selection driving it.
pub struct Session<S: DocumentSource, M: MapSurface> {
    controller: Arc<LayerController<S, M>>,
    catalog: DatasetCatalog,
    state: Arc<Mutex<ViewState>>,
    debouncer: Arc<Debouncer>,
}

impl<S: DocumentSource, M: MapSurface> Session<S, M> {
    /// Create the map in `container` showing the catalog's first dataset with every category enabled.
    /// Must be called from within a tokio runtime.
    pub fn start<F>(
        factory: &F,
        container: &str,
        source: S,
        catalog: DatasetCatalog,
        controller_options: ControllerOptions,
        options: SessionOptions,
    ) -> Result<Self>
    where
        F: SurfaceFactory<Surface = M>,
    {
        let dataset = catalog.default_dataset().context("dataset catalog is empty")?;
        let state = ViewState::new(Arc::clone(dataset));
        let controller = LayerController::initialize(factory, container, source, controller_options, state.request())?;

        Ok(Self {
            controller,
            catalog,
            state: Arc::new(Mutex::new(state)),
            debouncer: Debouncer::new(options.debounce()),
        })
    }

    #[inline] pub fn controller(&self) -> &Arc<LayerController<S, M>> { &self.controller }

    #[inline] pub fn catalog(&self) -> &DatasetCatalog { &self.catalog }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A snapshot of the current selection.
    pub fn state(&self) -> ViewState { self.lock().clone() }

    pub fn on_dataset_change(&self, id: &str) {
        let Some(dataset) = self.catalog.get(id) else {
            warn!("[session] unknown dataset {id:?} ignored");
            return;
        };
        self.lock().select_dataset(Arc::clone(dataset));
        debug!("[session] dataset -> {id}");
        self.schedule();
    }

    pub fn on_category_toggle(&self, label: &str, enabled: bool) {
        self.lock().toggle_category(label, enabled);
        debug!("[session] category {label:?} -> {enabled}");
        self.schedule();
    }

    pub fn on_aggregation_mode_toggle(&self, enabled: bool) {
        self.lock().set_aggregate_by_town(enabled);
        debug!("[session] aggregate by town -> {enabled}");
        self.schedule();
    }

    /// Re-arm the debounce timer. The state is read when the timer fires, not now.
    fn schedule(&self) {
        let controller = Arc::clone(&self.controller);
        let state = Arc::clone(&self.state);
        self.debouncer.arm(move || async move {
            let request = state.lock().unwrap_or_else(PoisonError::into_inner).request();
            controller.update_layers(&request).await;
        });
    }

    /// True while a change is waiting out the debounce delay or an update is running.
    pub fn is_update_pending(&self) -> bool { self.debouncer.is_pending() }

    pub fn pending_updates(&self) -> watch::Receiver<bool> { self.debouncer.subscribe() }

    /// Clear the pending timer and release the map. No update fires afterwards.
    pub fn teardown(&self) {
        self.debouncer.cancel();
        self.controller.teardown();
    }
}

/// Dropping a session tears it down.
impl<S: DocumentSource, M: MapSurface> Drop for Session<S, M> {
    fn drop(&mut self) { self.teardown() }
}
