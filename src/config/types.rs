use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::ml::forest::ForestOptions;
use crate::report::{DEFAULT_HISTOGRAM_BINS, HISTOGRAM_COLUMNS, MAX_HISTOGRAM_BINS};

/// Upper bound on `forest.n_trees`.
pub const MAX_TREES: usize = 1_000;

/// Errors that may occur while loading or saving the dashboard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The application directory could not be prepared.
    #[error(transparent)]
    AppDir(#[from] crate::app_dirs::AppDirError),
    /// Failed to create the config directory.
    #[error("Unable to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to read a config file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to write a config file.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse TOML config.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Failed to serialize config to TOML.
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Dashboard settings stored in `config.toml`.
///
/// Config keys (TOML): `dataset_path`, `extended_report`, `[forest]`, `[report]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// CSV source; relative paths resolve against the working directory.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    /// Show the correlation heatmap and histogram below the prediction.
    #[serde(default)]
    pub extended_report: bool,
    #[serde(default)]
    pub forest: ForestSettings,
    #[serde(default)]
    pub report: ReportSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            extended_report: false,
            forest: ForestSettings::default(),
            report: ReportSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Clamp numeric settings and repair an unknown histogram column.
    pub fn normalized(mut self) -> Self {
        self.forest.n_trees = self.forest.n_trees.clamp(1, MAX_TREES);
        self.forest.min_samples_split = self.forest.min_samples_split.max(2);
        self.forest.min_samples_leaf = self.forest.min_samples_leaf.max(1);
        self.report.histogram_bins = self.report.histogram_bins.clamp(1, MAX_HISTOGRAM_BINS);
        if !HISTOGRAM_COLUMNS.contains(&self.report.histogram_column.as_str()) {
            warn!(
                "Unknown histogram column {:?}; falling back to {}",
                self.report.histogram_column,
                default_histogram_column()
            );
            self.report.histogram_column = default_histogram_column();
        }
        self
    }
}

/// Forest hyperparameters.
///
/// Config keys: `n_trees`, `max_depth`, `min_samples_split`, `min_samples_leaf`, `seed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestSettings {
    #[serde(default = "default_n_trees")]
    pub n_trees: usize,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,
    /// Pin the forest's randomness; unset means every fit differs slightly.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ForestSettings {
    fn default() -> Self {
        Self {
            n_trees: default_n_trees(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            min_samples_leaf: default_min_samples_leaf(),
            seed: None,
        }
    }
}

impl ForestSettings {
    pub fn to_options(&self) -> ForestOptions {
        ForestOptions {
            n_trees: self.n_trees,
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            seed: self.seed,
            ..ForestOptions::default()
        }
    }
}

/// Extended report settings.
///
/// Config keys: `histogram_bins`, `histogram_column`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
    /// Column selected when the dashboard opens.
    #[serde(default = "default_histogram_column")]
    pub histogram_column: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            histogram_bins: default_histogram_bins(),
            histogram_column: default_histogram_column(),
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("loan_approval_dataset.csv")
}

fn default_n_trees() -> usize {
    100
}

fn default_min_samples_split() -> usize {
    2
}

fn default_min_samples_leaf() -> usize {
    1
}

fn default_histogram_bins() -> usize {
    DEFAULT_HISTOGRAM_BINS
}

fn default_histogram_column() -> String {
    "cibil_score".to_string()
}
