use std::sync::Arc;

use crate::dataset::{Category, DatasetConfig, EnabledCategories};
use crate::map::UpdateRequest;

/// What the user currently has selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub dataset: Arc<DatasetConfig>,
    pub enabled: EnabledCategories,
    pub aggregate_by_town: bool,
}

impl ViewState {
    /// `dataset` with every category enabled, hex mode.
    pub fn new(dataset: Arc<DatasetConfig>) -> Self {
        let enabled = EnabledCategories::all_of(&dataset);
        Self { dataset, enabled, aggregate_by_town: false }
    }

    /// Switch datasets; every category of the new one starts enabled.
    pub fn select_dataset(&mut self, dataset: Arc<DatasetConfig>) {
        self.enabled = EnabledCategories::all_of(&dataset);
        self.dataset = dataset;
    }

    /// Returns whether the enabled set changed.
    pub fn toggle_category(&mut self, label: &str, enabled: bool) -> bool {
        self.enabled.set(Category::new(label), enabled)
    }

    pub fn set_aggregate_by_town(&mut self, enabled: bool) { self.aggregate_by_town = enabled; }

    pub fn request(&self) -> UpdateRequest {
        UpdateRequest {
            config: Arc::clone(&self.dataset),
            enabled: self.enabled.clone(),
            aggregate_by_town: self.aggregate_by_town,
        }
    }
}
