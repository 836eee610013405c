//! # Store Error Types
//!
//! Error types for file-backed state.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Store Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   File I/O      │  │   Settings      │  │     Environment         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Io {path}      │  │  ConfigLoad     │  │  NoDataDirectory        │ │
//! │  │                 │  │  ConfigSave     │  │  SetupFailed            │ │
//! │  │                 │  │  InvalidConfig  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! None of these are fatal for the browser. Callers log them and carry on
//! with defaults or without persistence.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the cookie file, settings file and directory setup.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // File Errors
    // =========================================================================
    /// A file operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // =========================================================================
    // Settings Errors
    // =========================================================================
    /// The settings file exists but could not be parsed.
    #[error("Failed to load settings: {0}")]
    ConfigLoadFailed(String),

    /// The settings could not be serialized.
    #[error("Failed to save settings: {0}")]
    ConfigSaveFailed(String),

    /// A settings value is out of range.
    #[error("Invalid settings: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Environment Errors
    // =========================================================================
    /// The platform has no home/app-data directory.
    #[error("Could not determine an application data directory")]
    NoDataDirectory,

    /// A first-run step failed.
    #[error("First-run setup failed: {0}")]
    SetupFailed(String),
}

impl StoreError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns true for an I/O error caused by a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}
