//! # Config Commands
//!
//! Tauri commands for retrieving application configuration.

use tauri::State;
use tracing::debug;

use crate::state::{SettingsState, ShellConfig};

/// Gets the shell configuration (read-only).
///
/// ## When Used
/// - Toolbar startup (app name, version, home page)
#[tauri::command]
pub fn get_config(settings: State<'_, SettingsState>) -> ShellConfig {
    debug!("get_config command");
    settings.shell_config()
}
