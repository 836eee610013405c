//! # Navigation Commands
//!
//! Address bar handling for the content view.
//!
//! ## Address Bar Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "youtube.com/watch?v=abc"  ──► classify ──► Direct ──┐                 │
//! │  "lofi hip hop"             ──► classify ──► Search ──┼──► navigate     │
//! │  "   "                      ──► classify ──► None ────┴──► (nothing)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tauri::{AppHandle, State, Url, Webview};
use tracing::debug;
use tube_core::classify;

use crate::error::ApiError;
use crate::shell;
use crate::state::SettingsState;

fn content(app: &AppHandle) -> Result<Webview, ApiError> {
    shell::content_webview(app).ok_or_else(|| ApiError::window("Content view is not open"))
}

/// Loads whatever the user typed into the address bar.
///
/// ## Returns
/// - `Some(url)` - the address the content view is loading
/// - `None` - the input was blank and nothing happened
#[tauri::command]
pub fn navigate(app: AppHandle, input: String) -> Result<Option<String>, ApiError> {
    let Some(destination) = classify(&input) else {
        debug!("navigate command with blank input");
        return Ok(None);
    };

    debug!(
        search = destination.is_search(),
        url = %destination.as_str(),
        "navigate command"
    );

    let url = destination.into_url();
    content(&app)?.navigate(url.clone())?;
    Ok(Some(url.to_string()))
}

/// Loads the configured home page.
#[tauri::command]
pub fn go_home(app: AppHandle, settings: State<'_, SettingsState>) -> Result<String, ApiError> {
    let home = Url::parse(&settings.settings().browser.home_url)
        .map_err(|e| ApiError::internal(format!("Invalid home URL: {}", e)))?;

    debug!(url = %home, "go_home command");
    content(&app)?.navigate(home.clone())?;
    Ok(home.to_string())
}

/// Current address of the content view, `None` before the first page.
#[tauri::command]
pub fn get_location(app: AppHandle) -> Result<Option<String>, ApiError> {
    let url = content(&app)?.url()?;
    Ok((!shell::is_blank(&url)).then(|| url.to_string()))
}

/// In-page navigation reported by the content script (history API).
#[tauri::command]
pub fn report_location(app: AppHandle, url: String) -> Result<(), ApiError> {
    let url =
        Url::parse(&url).map_err(|e| ApiError::validation(format!("Invalid location: {}", e)))?;
    shell::emit_location(&app, &url);
    Ok(())
}
