//! Where LoanLens keeps its files: one `.loanlens` folder holding `config.toml`
//! and a `logs/` directory.
//!
//! The folder sits under the OS config directory (`~/.config` on Linux,
//! `%APPDATA%` on Windows) unless `LOANLENS_CONFIG_HOME` names another base.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use thiserror::Error;

/// Name of the application folder created under the config base.
pub const APP_DIR_NAME: &str = ".loanlens";
/// Environment variable that replaces the OS config directory as the base.
pub const CONFIG_HOME_ENV: &str = "LOANLENS_CONFIG_HOME";
/// File name of the dashboard configuration inside the application folder.
pub const CONFIG_FILE_NAME: &str = "config.toml";

const LOGS_DIR_NAME: &str = "logs";

#[derive(Debug, Error)]
pub enum AppDirError {
    #[error("Neither LOANLENS_CONFIG_HOME nor an OS config directory is available")]
    NoBaseDir,
    #[error("Failed to create application directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolved file locations for one application folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    root: PathBuf,
}

impl AppPaths {
    /// Locations for an application folder placed directly under `base`.
    pub fn under(base: &Path) -> Self {
        Self {
            root: base.join(APP_DIR_NAME),
        }
    }

    /// Locations under `LOANLENS_CONFIG_HOME`, or the OS config directory.
    pub fn resolve() -> Result<Self, AppDirError> {
        let base = choose_base(std::env::var_os(CONFIG_HOME_ENV), || {
            BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
        })
        .ok_or(AppDirError::NoBaseDir)?;
        Ok(Self::under(&base))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join(LOGS_DIR_NAME)
    }

    /// Create the application folder and its `logs/` directory.
    pub fn ensure(&self) -> Result<(), AppDirError> {
        create_dir(&self.logs_dir())
    }
}

/// Return the path of `config.toml`; its folder is created, the file is not.
pub fn config_file() -> Result<PathBuf, AppDirError> {
    let paths = AppPaths::resolve()?;
    paths.ensure()?;
    Ok(paths.config_file())
}

/// Return the log directory, creating it if needed.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    let paths = AppPaths::resolve()?;
    paths.ensure()?;
    Ok(paths.logs_dir())
}

/// An empty override counts as unset so a blank variable never lands files in
/// the working directory.
fn choose_base(
    override_base: Option<OsString>,
    os_default: impl FnOnce() -> Option<PathBuf>,
) -> Option<PathBuf> {
    match override_base {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => os_default(),
    }
}

fn create_dir(path: &Path) -> Result<(), AppDirError> {
    std::fs::create_dir_all(path).map_err(|source| AppDirError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn paths_share_one_application_folder() {
        let paths = AppPaths::under(Path::new("/srv/loans"));
        assert_eq!(paths.root(), Path::new("/srv/loans/.loanlens"));
        assert_eq!(paths.config_file(), PathBuf::from("/srv/loans/.loanlens/config.toml"));
        assert_eq!(paths.logs_dir(), PathBuf::from("/srv/loans/.loanlens/logs"));
    }

    #[test]
    fn ensure_creates_root_and_logs_but_not_the_config_file() {
        let base = tempdir().unwrap();
        let paths = AppPaths::under(base.path());
        paths.ensure().unwrap();
        assert!(paths.root().is_dir());
        assert!(paths.logs_dir().is_dir());
        assert!(!paths.config_file().exists());
        // Idempotent on an existing folder.
        paths.ensure().unwrap();
    }

    #[test]
    fn ensure_reports_the_directory_it_could_not_create() {
        let base = tempdir().unwrap();
        let blocker = base.path().join("occupied");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let paths = AppPaths::under(&blocker);
        match paths.ensure() {
            Err(AppDirError::CreateDir { path, .. }) => assert_eq!(path, paths.logs_dir()),
            other => panic!("expected CreateDir, got {other:?}"),
        }
    }

    #[test]
    fn override_wins_unless_blank() {
        let os_default = || Some(PathBuf::from("/home/ana/.config"));
        assert_eq!(
            choose_base(Some(OsString::from("/tmp/portable")), os_default),
            Some(PathBuf::from("/tmp/portable"))
        );
        assert_eq!(
            choose_base(Some(OsString::new()), os_default),
            Some(PathBuf::from("/home/ana/.config"))
        );
        assert_eq!(choose_base(None, os_default), Some(PathBuf::from("/home/ana/.config")));
        assert_eq!(choose_base(None, || None), None);
    }
}
