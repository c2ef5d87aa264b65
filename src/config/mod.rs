//! Dashboard configuration persisted as TOML under the app root.

mod io;
mod types;

pub use crate::app_dirs::CONFIG_FILE_NAME;
pub use io::{config_path, load_from_path, load_or_default, save_to_path};
pub use types::{ConfigError, DashboardConfig, ForestSettings, ReportSettings};
pub use types::MAX_TREES;
