use anyhow::{bail, Result};
use suitmap::{ControllerOptions, HeadlessSurface, LayerController};
use tracing::info;

use super::{write_json, DataSource};

pub async fn run(_cli: &crate::cli::Cli, args: &crate::cli::LabelsArgs) -> Result<()> {
    let mut options = ControllerOptions::default();
    if let Some(path) = &args.boundaries { options.boundary_path = path.clone() }
    let path = options.boundary_path.clone();

    let controller = LayerController::new(HeadlessSurface::new(), DataSource::open(&args.data)?, options);
    if !controller.load_boundaries().await {
        bail!("could not load town boundaries from {path}");
    }

    let labels = controller.town_labels();
    info!("[labels] {} towns", labels.len());
    controller.teardown();

    write_json(&labels, args.output.as_deref())
}
