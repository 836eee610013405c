//! # Update Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Update Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Network       │  │   Release       │  │     Install             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Network        │  │  InvalidRelease │  │  InvalidArchive         │ │
//! │  │  Timeout        │  │  NoAsset        │  │  UnsafeEntry            │ │
//! │  │  Status         │  │                 │  │  EmptyArchive           │ │
//! │  │                 │  │                 │  │  Io / InstallFailed     │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An update failure never stops the browser. The shell logs it and keeps
//! the installed version.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tube_core::CoreError;

/// Result type alias for update operations.
pub type UpdateResult<T> = Result<T, UpdateError>;

#[derive(Debug, Error)]
pub enum UpdateError {
    // =========================================================================
    // Network Errors
    // =========================================================================
    /// Connection, TLS or body read failure.
    #[error("Network error: {0}")]
    Network(String),

    /// No response within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    // =========================================================================
    // Release Errors
    // =========================================================================
    /// The release JSON or its tag could not be understood.
    #[error("Invalid release data: {0}")]
    InvalidRelease(String),

    /// The release has no `.zip` asset.
    #[error("Release {tag} has no installable asset")]
    NoAsset { tag: String },

    // =========================================================================
    // Install Errors
    // =========================================================================
    /// The download is not a readable zip archive.
    #[error("Invalid archive: {0}")]
    InvalidArchive(String),

    /// An archive entry would be written outside the staging directory.
    #[error("Archive entry escapes the target directory: {0}")]
    UnsafeEntry(String),

    /// The archive contains no files.
    #[error("Archive contains no files")]
    EmptyArchive,

    /// A file operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The staged version could not be moved into place.
    #[error("Install failed: {reason} (previous version restored: {rolled_back})")]
    InstallFailed { reason: String, rolled_back: bool },

    /// The blocking extraction task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Task(String),
}

impl UpdateError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        UpdateError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns true if trying again later could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            UpdateError::Network(_) | UpdateError::Timeout => true,
            UpdateError::Status { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for UpdateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpdateError::Timeout
        } else if let Some(status) = err.status() {
            UpdateError::Status {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            UpdateError::InvalidRelease(err.to_string())
        } else {
            UpdateError::Network(err.to_string())
        }
    }
}

impl From<zip::result::ZipError> for UpdateError {
    fn from(err: zip::result::ZipError) -> Self {
        UpdateError::InvalidArchive(err.to_string())
    }
}

impl From<CoreError> for UpdateError {
    fn from(err: CoreError) -> Self {
        UpdateError::InvalidRelease(err.to_string())
    }
}
