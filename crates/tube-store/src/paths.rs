//! # Application Paths
//!
//! Where TubeClient keeps its files.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TUBE_DATA_DIR=/some/dir  →  both directories are /some/dir             │
//! │                                                                         │
//! │  otherwise ProjectDirs("com", "tubeclient", "TubeClient"):              │
//! │    Linux    ~/.local/share/tubeclient       ~/.config/tubeclient        │
//! │    macOS    ~/Library/Application Support/com.tubeclient.TubeClient     │
//! │    Windows  %APPDATA%\tubeclient\TubeClient\{data,config}               │
//! │                                                                         │
//! │  data_dir/cookies.txt                         config_dir/settings.toml  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tube_core::{COOKIE_FILE_NAME, SETTINGS_FILE_NAME};

use crate::error::{StoreError, StoreResult};

/// Environment variable that overrides both directories.
pub const DATA_DIR_ENV: &str = "TUBE_DATA_DIR";

/// Data and config directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl AppPaths {
    /// Creates paths from explicit directories.
    pub fn new(data_dir: impl Into<PathBuf>, config_dir: impl Into<PathBuf>) -> Self {
        AppPaths {
            data_dir: data_dir.into(),
            config_dir: config_dir.into(),
        }
    }

    /// Uses one directory for everything.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir, dir)
    }

    /// Resolves the directories for this platform and environment.
    ///
    /// ## Errors
    /// [`StoreError::NoDataDirectory`] when there is no override and the
    /// platform reports no home directory.
    pub fn discover() -> StoreResult<Self> {
        let override_dir = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Self::resolve(override_dir, ProjectDirs::from("com", "tubeclient", "TubeClient"))
    }

    fn resolve(override_dir: Option<PathBuf>, dirs: Option<ProjectDirs>) -> StoreResult<Self> {
        if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
            debug!(path = ?dir, "Using data directory from {}", DATA_DIR_ENV);
            return Ok(Self::in_dir(dir));
        }

        let dirs = dirs.ok_or(StoreError::NoDataDirectory)?;
        Ok(Self::new(dirs.data_dir(), dirs.config_dir()))
    }

    /// `cookies.txt` in the data directory.
    pub fn cookie_file(&self) -> PathBuf {
        self.data_dir.join(COOKIE_FILE_NAME)
    }

    /// `settings.toml` in the config directory.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE_NAME)
    }
}
