//! Library exports for the dashboard binary, the headless scorer, benches and tests.
/// Application directory resolution.
pub mod app_dirs;
/// TOML-backed dashboard configuration.
pub mod config;
/// Interactive egui dashboard.
pub mod dashboard;
/// CSV loading and categorical normalization.
pub mod dataset;
/// Applicant inputs and their bounds.
pub mod input;
/// Tracing subscriber setup.
pub mod logging;
/// Random forest and evaluation metrics.
pub mod ml;
/// Fit-and-score pipeline.
pub mod pipeline;
/// Correlation and histogram report data.
pub mod report;
