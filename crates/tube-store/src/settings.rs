//! # Application Settings
//!
//! User-editable settings and the persisted first-run flag.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TUBE_HOME_URL=https://www.youtube.com/feed/subscriptions           │
//! │     TUBE_UPDATE_ENABLED=false                                          │
//! │     TUBE_UPDATE_REPOSITORY=owner/name                                  │
//! │                                                                         │
//! │  2. TOML Settings File                                                 │
//! │     ~/.config/tubeclient/settings.toml (Linux)                         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Environment overrides are never written back to the file, and a file
//! that cannot be parsed or validated is never overwritten.
//!
//! ## Settings File Format
//! ```toml
//! first_run = false
//!
//! [browser]
//! home_url = "https://www.youtube.com"
//! cookie_sync_interval_secs = 5
//! compact_cookies_on_start = true
//!
//! [window]
//! title = "YouTube Client"
//! width = 1280.0
//! height = 720.0
//! maximized = true
//!
//! [update]
//! enabled = true
//! repository = "TUUVCOME/YouTubeClient"
//! api_base = "https://api.github.com"
//! timeout_secs = 10
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tube_core::{APP_NAME, HOME_URL};
use url::Url;

use crate::error::{StoreError, StoreResult};
use crate::fs::FileSystem;

// =============================================================================
// Environment Variables
// =============================================================================

pub const HOME_URL_ENV: &str = "TUBE_HOME_URL";
pub const UPDATE_ENABLED_ENV: &str = "TUBE_UPDATE_ENABLED";
pub const UPDATE_REPOSITORY_ENV: &str = "TUBE_UPDATE_REPOSITORY";

// =============================================================================
// Sections
// =============================================================================

/// `[browser]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Page loaded at startup and by the home button.
    pub home_url: String,

    /// Seconds between cookie jar snapshots.
    pub cookie_sync_interval_secs: u64,

    /// Rewrite `cookies.txt` to one line per cookie at startup.
    pub compact_cookies_on_start: bool,
}

fn default_sync_interval() -> u64 {
    5
}

impl Default for BrowserSettings {
    fn default() -> Self {
        BrowserSettings {
            home_url: HOME_URL.to_string(),
            cookie_sync_interval_secs: default_sync_interval(),
            compact_cookies_on_start: true,
        }
    }
}

/// `[window]` section. Sizes are logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub maximized: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        WindowSettings {
            title: APP_NAME.to_string(),
            width: 1280.0,
            height: 720.0,
            maximized: true,
        }
    }
}

/// `[update]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSettings {
    /// Check for a newer release at startup.
    pub enabled: bool,

    /// GitHub `owner/name`.
    pub repository: String,

    /// GitHub REST API root.
    pub api_base: String,

    /// HTTP timeout for the release check and download.
    pub timeout_secs: u64,
}

fn default_update_timeout() -> u64 {
    10
}

impl Default for UpdateSettings {
    fn default() -> Self {
        UpdateSettings {
            enabled: true,
            repository: "TUUVCOME/YouTubeClient".to_string(),
            api_base: "https://api.github.com".to_string(),
            timeout_secs: default_update_timeout(),
        }
    }
}

// =============================================================================
// App Settings
// =============================================================================

/// Everything in `settings.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// True until first-run setup has completed once.
    pub first_run: bool,
    pub browser: BrowserSettings,
    pub window: WindowSettings,
    pub update: UpdateSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            first_run: true,
            browser: BrowserSettings::default(),
            window: WindowSettings::default(),
            update: UpdateSettings::default(),
        }
    }
}

impl AppSettings {
    /// Validates values that the file or environment could have broken.
    pub fn validate(&self) -> StoreResult<()> {
        match Url::parse(&self.browser.home_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => {
                return Err(StoreError::InvalidConfig(format!(
                    "home_url must be http or https, got scheme {}",
                    url.scheme()
                )))
            }
            Err(e) => {
                return Err(StoreError::InvalidConfig(format!(
                    "home_url {:?} is not a URL: {}",
                    self.browser.home_url, e
                )))
            }
        }

        if self.browser.cookie_sync_interval_secs == 0 {
            return Err(StoreError::InvalidConfig(
                "cookie_sync_interval_secs must be greater than 0".into(),
            ));
        }

        if !(self.window.width > 0.0 && self.window.height > 0.0) {
            return Err(StoreError::InvalidConfig(format!(
                "window size must be positive, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        let mut parts = self.update.repository.split('/');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !well_formed {
            return Err(StoreError::InvalidConfig(format!(
                "repository must be owner/name, got {:?}",
                self.update.repository
            )));
        }

        Ok(())
    }

    /// Applies `TUBE_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(HOME_URL_ENV) {
            debug!(url = %url, "Overriding home URL from environment");
            self.browser.home_url = url;
        }

        if let Some(enabled) = lookup(UPDATE_ENABLED_ENV) {
            match enabled.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.update.enabled = true,
                "0" | "false" | "no" | "off" => self.update.enabled = false,
                _ => warn!(value = %enabled, "Unknown value for {}", UPDATE_ENABLED_ENV),
            }
        }

        if let Some(repository) = lookup(UPDATE_REPOSITORY_ENV) {
            debug!(repository = %repository, "Overriding update repository from environment");
            self.update.repository = repository;
        }
    }
}

// =============================================================================
// Settings Store
// =============================================================================

/// Settings as loaded by [`SettingsStore::open`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSettings {
    /// Values to run with: the file (or defaults) plus environment overrides.
    pub effective: AppSettings,

    /// Values read from the file, without environment overrides. This is
    /// what gets written back. `None` when an existing file could not be
    /// read or parsed; such a file is never overwritten.
    pub persisted: Option<AppSettings>,
}

/// Loads and saves `settings.toml`.
pub struct SettingsStore<F: FileSystem> {
    fs: F,
    path: PathBuf,
}

impl<F: FileSystem> SettingsStore<F> {
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        SettingsStore {
            fs,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads settings from the file, then the environment.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Settings file (missing file is not an error)
    /// 3. Environment variables
    pub fn load(&self) -> StoreResult<AppSettings> {
        let mut settings = self.load_file()?;
        settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Loads only what the file holds, without environment overrides.
    ///
    /// A missing file gives the defaults, with `first_run` set.
    pub fn load_file(&self) -> StoreResult<AppSettings> {
        let settings: AppSettings = match self.fs.read(&self.path) {
            Ok(bytes) => {
                info!(path = ?self.path, "Loading settings from file");
                let text = String::from_utf8(bytes)
                    .map_err(|e| StoreError::ConfigLoadFailed(e.to_string()))?;
                toml::from_str(&text)?
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.path, "Settings file not found, using defaults");
                AppSettings::default()
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Loads settings for startup. Never fails.
    ///
    /// ```text
    /// file ok / missing ──► persisted = file values
    ///                       effective = file values + TUBE_* overrides
    ///
    /// file unusable     ──► persisted = None   (file left as it is)
    ///                       effective = defaults, first_run = false
    /// ```
    pub fn open(&self) -> LoadedSettings {
        self.open_with(|key| std::env::var(key).ok())
    }

    /// [`SettingsStore::open`] with overrides from any key lookup.
    pub fn open_with(&self, lookup: impl Fn(&str) -> Option<String>) -> LoadedSettings {
        let persisted = match self.load_file() {
            Ok(settings) => Some(settings),
            Err(e) => {
                warn!(
                    path = ?self.path,
                    "Failed to load settings: {}. Using defaults, the file is left untouched.",
                    e
                );
                None
            }
        };

        let base = persisted.clone().unwrap_or_else(|| AppSettings {
            first_run: false,
            ..AppSettings::default()
        });

        let mut effective = base.clone();
        effective.apply_overrides(lookup);
        let effective = match effective.validate() {
            Ok(()) => effective,
            Err(e) => {
                warn!("Ignoring environment overrides: {}", e);
                base
            }
        };

        LoadedSettings {
            effective,
            persisted,
        }
    }

    /// Settings in effect, or defaults if the file cannot be used.
    ///
    /// The fallback has `first_run` cleared so an unusable file is never
    /// replaced by first-run setup.
    pub fn load_or_default(&self) -> AppSettings {
        self.open().effective
    }

    /// Writes settings atomically, creating the directory if needed.
    pub fn save(&self, settings: &AppSettings) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.fs
                .create_dir_all(parent)
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let contents = toml::to_string_pretty(settings)?;
        self.fs
            .write_atomic(&self.path, contents.as_bytes())
            .map_err(|e| StoreError::io(&self.path, e))?;

        info!(path = ?self.path, "Settings saved");
        Ok(())
    }
}
