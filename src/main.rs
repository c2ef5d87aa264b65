//! Entry point for the loan prediction dashboard.
//!
//! Usage: `loanlens [dataset.csv]`; without an argument the configured dataset is used.
use std::path::PathBuf;

use eframe::egui;
use loanlens::dashboard::{self, DashboardApp, LaunchError, MIN_VIEWPORT_SIZE};
use loanlens::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let dataset_override = std::env::args_os().nth(1).map(PathBuf::from);
    let launch = dashboard::load_controller(dataset_override);
    if let Err(err) = &launch {
        tracing::error!("{err}");
    }

    let viewport = egui::ViewportBuilder::default()
        .with_title("Loan Prediction Dataset")
        .with_min_inner_size(MIN_VIEWPORT_SIZE)
        .with_inner_size(egui::vec2(1280.0, 860.0));
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "LoanLens",
        native_options,
        Box::new(move |_cc| match launch {
            Ok(controller) => Ok(Box::new(DashboardApp::new(controller))),
            Err(message) => Ok(Box::new(LaunchError::new(message))),
        }),
    )?;
    Ok(())
}
