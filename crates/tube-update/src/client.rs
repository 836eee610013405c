//! # Update Client
//!
//! Talks to the GitHub REST API and drives the install.
//!
//! ## Example
//! ```rust,no_run
//! use std::path::Path;
//! use tube_core::ReleaseVersion;
//! use tube_update::{UpdateCheck, UpdateConfig, Updater};
//!
//! # async fn run() -> tube_update::UpdateResult<()> {
//! let current = ReleaseVersion::parse(env!("CARGO_PKG_VERSION"))?;
//! let updater = Updater::new(UpdateConfig::new("TUUVCOME/YouTubeClient", current))?;
//!
//! if let UpdateCheck::Available { release, .. } = updater.check().await? {
//!     updater
//!         .update(&release, Path::new("/tmp/staging"), Path::new("/opt/tubeclient"))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

use reqwest::header::ACCEPT;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};
use tube_core::{ReleaseVersion, APP_NAME};

use crate::error::{UpdateError, UpdateResult};
use crate::install::{extract_to_staging, swap_into_place};
use crate::release::Release;

/// GitHub's JSON media type.
const GITHUB_JSON: &str = "application/vnd.github+json";

// =============================================================================
// Configuration
// =============================================================================

/// Where to look for releases and what is installed now.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    /// API root, without a trailing slash.
    pub api_base: String,
    /// `owner/name`.
    pub repository: String,
    /// Applies to the whole request, body included.
    pub timeout: Duration,
    pub current_version: ReleaseVersion,
}

impl UpdateConfig {
    /// Config against api.github.com with a 10 second timeout.
    pub fn new(repository: impl Into<String>, current_version: ReleaseVersion) -> Self {
        UpdateConfig {
            api_base: "https://api.github.com".to_string(),
            repository: repository.into(),
            timeout: Duration::from_secs(10),
            current_version,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `{api_base}/repos/{repository}/releases/latest`
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/releases/latest",
            self.api_base.trim_end_matches('/'),
            self.repository.trim_matches('/')
        )
    }
}

// =============================================================================
// Check Result
// =============================================================================

/// Outcome of a release check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateCheck {
    /// The latest release is not newer than the running version.
    UpToDate { latest: ReleaseVersion },
    /// A newer release exists.
    Available {
        release: Release,
        version: ReleaseVersion,
    },
}

impl UpdateCheck {
    /// Compares a fetched release with the running version.
    pub fn evaluate(release: Release, current: &ReleaseVersion) -> UpdateResult<Self> {
        let version = release.version()?;
        if version.is_newer_than(current) {
            Ok(UpdateCheck::Available { release, version })
        } else {
            Ok(UpdateCheck::UpToDate { latest: version })
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, UpdateCheck::Available { .. })
    }
}

// =============================================================================
// Updater
// =============================================================================

/// HTTP client for release checks and downloads.
pub struct Updater {
    client: reqwest::Client,
    config: UpdateConfig,
}

impl Updater {
    /// Builds the HTTP client (User-Agent and timeout are required by, or
    /// sensible for, the GitHub API).
    pub fn new(config: UpdateConfig) -> UpdateResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("{}/{}", APP_NAME.replace(' ', ""), config.current_version))
            .timeout(config.timeout)
            .build()
            .map_err(|e| UpdateError::Network(e.to_string()))?;

        Ok(Updater { client, config })
    }

    /// Uses a caller-built HTTP client (proxy or TLS settings of its own).
    /// `config.timeout` is ignored; the client's own timeout applies.
    pub fn with_client(client: reqwest::Client, config: UpdateConfig) -> Self {
        Updater { client, config }
    }

    pub fn config(&self) -> &UpdateConfig {
        &self.config
    }

    /// Fetches the latest published release.
    pub async fn latest_release(&self) -> UpdateResult<Release> {
        let url = self.config.latest_release_url();
        debug!(url = %url, "Checking for updates");

        let release = self
            .client
            .get(&url)
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await?
            .error_for_status()?
            .json::<Release>()
            .await?;

        Ok(release)
    }

    /// Fetches the latest release and compares it with the running version.
    pub async fn check(&self) -> UpdateResult<UpdateCheck> {
        let release = self.latest_release().await?;
        let check = UpdateCheck::evaluate(release, &self.config.current_version)?;

        match &check {
            UpdateCheck::Available { version, .. } => info!(
                current = %self.config.current_version,
                latest = %version,
                "New version available"
            ),
            UpdateCheck::UpToDate { latest } => info!(
                current = %self.config.current_version,
                latest = %latest,
                "Already on the latest version"
            ),
        }
        Ok(check)
    }

    /// Downloads the release's zip asset.
    ///
    /// ## Errors
    /// [`UpdateError::NoAsset`] when the release has no `.zip` asset and
    /// [`UpdateError::InvalidArchive`] when the body length disagrees with
    /// the size GitHub reported.
    pub async fn download(&self, release: &Release) -> UpdateResult<Vec<u8>> {
        let asset = release
            .installable_asset()
            .ok_or_else(|| UpdateError::NoAsset {
                tag: release.tag_name.clone(),
            })?;

        info!(asset = %asset.name, size = asset.size, "Downloading update");
        let bytes = self
            .client
            .get(&asset.browser_download_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        if asset.size > 0 && bytes.len() as u64 != asset.size {
            return Err(UpdateError::InvalidArchive(format!(
                "expected {} bytes, got {}",
                asset.size,
                bytes.len()
            )));
        }

        Ok(bytes.to_vec())
    }

    /// Downloads, extracts and installs `release`.
    ///
    /// `staging` and `install_dir` must be on the same file system. Only the
    /// files shipped in the release are replaced; other files in
    /// `install_dir` stay. The extraction and the swap run on a blocking
    /// thread.
    pub async fn update(
        &self,
        release: &Release,
        staging: &Path,
        install_dir: &Path,
    ) -> UpdateResult<()> {
        let archive = self.download(release).await?;

        let staging = staging.to_path_buf();
        let install_dir = install_dir.to_path_buf();
        tokio::task::spawn_blocking(move || {
            extract_to_staging(&archive, &staging)?;
            swap_into_place(&staging, &install_dir)
        })
        .await
        .map_err(|e| UpdateError::Task(e.to_string()))??;

        info!(version = %release.tag_name, "Update complete, restart to use it");
        Ok(())
    }
}
