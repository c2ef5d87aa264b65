use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::app_dirs;

use super::types::{ConfigError, DashboardConfig};

/// Resolve the configuration file path inside the app root.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::config_file()?)
}

/// Load the configuration from the app root, returning defaults if missing.
pub fn load_or_default() -> Result<DashboardConfig, ConfigError> {
    let path = config_path()?;
    load_from_path(&path)
}

/// Load and normalize a config file; a missing file yields defaults.
pub fn load_from_path(path: &Path) -> Result<DashboardConfig, ConfigError> {
    if !path.exists() {
        info!("No config at {}; using defaults", path.display());
        return Ok(DashboardConfig::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: DashboardConfig = toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(config.normalized())
}

/// Write the config as TOML, replacing the target only after a full write.
pub fn save_to_path(config: &DashboardConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(config).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    let tmp_path = path.with_extension("toml.tmp");
    let write_err = |source| ConfigError::Write {
        path: tmp_path.clone(),
        source,
    };
    let mut file = std::fs::File::create(&tmp_path).map_err(write_err)?;
    file.write_all(data.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;
    drop(file);
    std::fs::rename(&tmp_path, path).map_err(|source| {
        let _ = std::fs::remove_file(&tmp_path);
        ConfigError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONFIG_FILE_NAME, ForestSettings, MAX_TREES};
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from_path(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.forest.n_trees, 100);
        assert_eq!(config.report.histogram_column, "cibil_score");
    }

    #[test]
    fn partial_files_fill_in_defaults_and_clamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
dataset_path = "data/loans.csv"
extended_report = true

[forest]
n_trees = 0
seed = 42

[report]
histogram_bins = 5000
histogram_column = "loan_id"
"#,
        )
        .unwrap();
        let config = load_from_path(&path).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("data/loans.csv"));
        assert!(config.extended_report);
        assert_eq!(config.forest.n_trees, 1);
        assert_eq!(config.forest.seed, Some(42));
        assert_eq!(config.forest.min_samples_split, 2);
        assert_eq!(config.report.histogram_bins, 200);
        assert_eq!(config.report.histogram_column, "cibil_score");
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = DashboardConfig {
            extended_report: true,
            forest: ForestSettings {
                n_trees: MAX_TREES,
                max_depth: Some(12),
                seed: Some(7),
                ..ForestSettings::default()
            },
            ..DashboardConfig::default()
        };
        save_to_path(&config, &path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "extended_report = maybe").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn forest_settings_map_onto_options() {
        let settings = ForestSettings {
            n_trees: 12,
            seed: Some(3),
            ..ForestSettings::default()
        };
        let options = settings.to_options();
        assert_eq!(options.n_trees, 12);
        assert_eq!(options.seed, Some(3));
        assert!(options.bootstrap);
    }
}
