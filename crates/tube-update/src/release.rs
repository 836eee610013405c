//! # GitHub Release Model
//!
//! The subset of the `releases/latest` response the updater reads.

use serde::{Deserialize, Serialize};
use tube_core::ReleaseVersion;

use crate::error::UpdateResult;

/// One published release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Version tag, e.g. `v1.3`.
    pub tag_name: String,

    /// Display name; GitHub sends `null` when unset.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub html_url: Option<String>,

    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
    /// Size in bytes; 0 when unknown.
    #[serde(default)]
    pub size: u64,
}

impl Release {
    /// Parses `tag_name`.
    pub fn version(&self) -> UpdateResult<ReleaseVersion> {
        Ok(ReleaseVersion::parse(&self.tag_name)?)
    }

    /// First `.zip` asset, the archive the updater installs.
    pub fn installable_asset(&self) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|asset| asset.name.to_ascii_lowercase().ends_with(".zip"))
    }

    /// Name for logs and the toolbar: the release name, else the tag.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.tag_name)
    }
}
