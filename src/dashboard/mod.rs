//! Interactive dashboard: controller state plus the egui renderer.

mod controller;
pub mod ui;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{self, DashboardConfig};
use crate::dataset;

pub use controller::DashboardController;
pub use ui::{DashboardApp, LaunchError, MIN_VIEWPORT_SIZE};

/// Load config and dataset for a launch; errors are shown on the launch screen.
///
/// `dataset_override` replaces the configured dataset path.
pub fn load_controller(dataset_override: Option<PathBuf>) -> Result<DashboardController, String> {
    let config_path = config::config_path().map_err(|err| format!("Failed to locate config: {err}"))?;
    let config = config::load_from_path(&config_path)
        .map_err(|err| format!("Failed to load config: {err}"))?;
    let dataset_path = dataset_override.unwrap_or_else(|| config.dataset_path.clone());
    controller_for(&dataset_path, config).map(|controller| controller.with_config_path(config_path))
}

/// Build a controller over the dataset at `path` with an explicit config.
pub fn controller_for(path: &Path, config: DashboardConfig) -> Result<DashboardController, String> {
    let table = dataset::load_dataset(path)
        .map_err(|err| format!("Failed to load dataset {}: {err}", path.display()))?;
    info!(
        dataset = %path.display(),
        extended_report = config.extended_report,
        "Dashboard ready"
    );
    Ok(DashboardController::new(table, config))
}
