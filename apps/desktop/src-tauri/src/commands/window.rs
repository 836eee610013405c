//! # Window Commands
//!
//! Fullscreen switching. F11 and the toolbar button toggle; the content
//! script reports the page's own fullscreen requests (the player's
//! fullscreen button) with an explicit state.

use tauri::Window;
use tracing::debug;

use crate::error::ApiError;
use crate::shell;

/// Toggles fullscreen.
///
/// ## Returns
/// The new fullscreen state.
#[tauri::command]
pub fn toggle_fullscreen(window: Window) -> Result<bool, ApiError> {
    let enabled = !window.is_fullscreen()?;
    debug!(enabled, "toggle_fullscreen command");
    shell::set_fullscreen(&window, enabled)?;
    Ok(enabled)
}

/// Enters or leaves fullscreen. No-op if already in that state.
#[tauri::command]
pub fn set_fullscreen(window: Window, enabled: bool) -> Result<(), ApiError> {
    debug!(enabled, "set_fullscreen command");
    shell::set_fullscreen(&window, enabled)?;
    Ok(())
}
