//! # Settings State
//!
//! Settings and paths resolved at startup.
//!
//! ## Thread Safety
//! Read-only after initialization, so no lock.

use serde::Serialize;
use tube_core::APP_NAME;
use tube_store::{AppPaths, AppSettings};

/// Settings loaded before the window opens.
#[derive(Debug, Clone)]
pub struct SettingsState {
    settings: AppSettings,
    paths: AppPaths,
}

/// What the toolbar gets from `get_config`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellConfig {
    pub app_name: String,
    pub version: String,
    pub home_url: String,
    pub cookie_file: String,
    pub update_enabled: bool,
    pub update_repository: String,
}

impl SettingsState {
    pub fn new(settings: AppSettings, paths: AppPaths) -> Self {
        SettingsState { settings, paths }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    /// Snapshot for the toolbar.
    pub fn shell_config(&self) -> ShellConfig {
        ShellConfig {
            app_name: APP_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            home_url: self.settings.browser.home_url.clone(),
            cookie_file: self.paths.cookie_file().display().to_string(),
            update_enabled: self.settings.update.enabled,
            update_repository: self.settings.update.repository.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_config() {
        let state = SettingsState::new(AppSettings::default(), AppPaths::in_dir("/data"));
        let config = state.shell_config();

        assert_eq!(config.app_name, "YouTube Client");
        assert_eq!(config.home_url, "https://www.youtube.com");
        assert!(config.cookie_file.ends_with("cookies.txt"));

        let json = serde_json::to_value(&config).unwrap();
        assert!(json.get("homeUrl").is_some());
        assert!(json.get("updateEnabled").is_some());
    }
}
