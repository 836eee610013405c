//! # tube-update: Self-Update for TubeClient
//!
//! Checks the latest GitHub release, downloads its zip asset and installs it
//! through a staging directory.
//!
//! ## Modules
//!
//! - [`client`] - `Updater`: release check, download, install
//! - [`release`] - GitHub release JSON model
//! - [`install`] - Zip extraction and directory swap with rollback
//! - [`error`] - Update error types
//!
//! Only a strictly newer tag triggers an update (`v1.3` over `1.2`). A
//! different but older tag is ignored.

pub mod client;
pub mod error;
pub mod install;
pub mod release;

pub use client::{UpdateCheck, UpdateConfig, Updater};
pub use error::{UpdateError, UpdateResult};
pub use install::{extract_to_staging, staging_dir_for, swap_into_place};
pub use release::{Asset, Release};
