use anyhow::{bail, Context, Result};
use suitmap::{
    ControllerOptions, DatasetCatalog, EnabledCategories, HeadlessSurface, LayerController, UpdateRequest,
};
use tracing::info;

use super::{write_json, DataSource};

pub async fn run(_cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => DatasetCatalog::from_json_file(path)?,
        None => DatasetCatalog::worcester(),
    };
    let config = match &args.dataset {
        Some(id) => catalog.get(id).with_context(|| format!("unknown dataset {id:?}"))?,
        None => catalog.default_dataset().context("dataset catalog is empty")?,
    };

    let mut enabled = EnabledCategories::all_of(config);
    for label in &args.disabled {
        if !enabled.set(label.as_str().into(), false) {
            bail!("dataset {} has no category {label:?}", config.id);
        }
    }

    let mut options = ControllerOptions::default();
    if let Some(path) = &args.boundaries { options.boundary_path = path.clone() }

    let surface = HeadlessSurface::new();
    let controller = LayerController::new(surface, DataSource::open(&args.data)?, options);
    controller.mark_ready();
    // Failure is logged; the render continues without labels or region mode.
    controller.load_boundaries().await;

    info!("[render] {} ({} of {} categories enabled)", config.name, enabled.len(), config.categories().len());
    let request = UpdateRequest { config: config.clone(), enabled, aggregate_by_town: args.by_town };
    let layers = controller.update_layers(&request).await.context("update cycle produced no layers")?;
    controller.teardown();

    write_json(&*layers, args.output.as_deref())
}
