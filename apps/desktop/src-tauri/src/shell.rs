//! # Browser Shell
//!
//! One window, two webviews: the local toolbar on top and the YouTube
//! content view below it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  window "main"                                                          │
//! │  ┌───────────────────────────────────────────────────────────────────┐ │
//! │  │ toolbar (index.html)    [⌂] [ address / search ...........] [⛶] │ │
//! │  ├───────────────────────────────────────────────────────────────────┤ │
//! │  │ content (https://www.youtube.com)                                 │ │
//! │  │                                                                   │ │
//! │  │   page load started   ──► navigation:changed ──► toolbar          │ │
//! │  │   page load finished  ──► jar snapshot ──► cookies.txt            │ │
//! │  │   history API / F11 / fullscreenchange ──► content.js ──► invoke  │ │
//! │  │                                                                   │ │
//! │  └───────────────────────────────────────────────────────────────────┘ │
//! │                                                                         │
//! │  fullscreen: toolbar height 0, content fills the window                 │
//! │  close: final jar snapshot, then destroy                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup
//! The content view opens on `about:blank`. Restored cookies go into its
//! jar first, then it navigates to the home page, so the first request
//! already carries the session.
//!
//! ## Jar Access
//! Reading or writing the webview cookie jar blocks on the platform web
//! view and deadlocks on Windows when done from the event loop, so every
//! jar access runs on a blocking task.

use serde::Serialize;
use std::time::Duration;
use tauri::webview::{PageLoadEvent, PageLoadPayload, WebviewBuilder};
use tauri::window::WindowBuilder;
use tauri::{
    AppHandle, Emitter, LogicalPosition, LogicalSize, Manager, Url, Webview, WebviewUrl, Window,
    WindowEvent,
};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use tube_core::CookieRecord;
use tube_store::AppSettings;

use crate::state::{CookieState, ShellState};

pub const MAIN_WINDOW: &str = "main";
pub const TOOLBAR_WEBVIEW: &str = "toolbar";
pub const CONTENT_WEBVIEW: &str = "content";

/// Logical pixels.
pub const TOOLBAR_HEIGHT: f64 = 50.0;

/// Event carrying [`LocationPayload`] to the toolbar.
pub const NAVIGATION_EVENT: &str = "navigation:changed";

const CONTENT_SCRIPT: &str = include_str!("content.js");

const MIN_WINDOW_SIZE: (f64, f64) = (480.0, 320.0);

// =============================================================================
// Layout
// =============================================================================

/// Webview bounds inside the window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub toolbar_height: f64,
    pub content_top: f64,
    pub content_height: f64,
}

impl Layout {
    /// Stacks the toolbar over the content view. In fullscreen the toolbar
    /// collapses to zero height.
    pub fn compute(width: f64, height: f64, fullscreen: bool) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let toolbar_height = if fullscreen {
            0.0
        } else {
            TOOLBAR_HEIGHT.min(height)
        };

        Layout {
            width,
            toolbar_height,
            content_top: toolbar_height,
            content_height: height - toolbar_height,
        }
    }
}

/// Payload of [`NAVIGATION_EVENT`].
#[derive(Debug, Clone, Serialize)]
pub struct LocationPayload {
    pub url: String,
}

// =============================================================================
// Window
// =============================================================================

/// Opens the main window with both webviews.
pub fn build_main_window(
    app: &AppHandle,
    settings: &AppSettings,
) -> Result<Window, Box<dyn std::error::Error>> {
    let window_settings = &settings.window;
    let window = WindowBuilder::new(app, MAIN_WINDOW)
        .title(&window_settings.title)
        .inner_size(window_settings.width, window_settings.height)
        .min_inner_size(MIN_WINDOW_SIZE.0, MIN_WINDOW_SIZE.1)
        .maximized(window_settings.maximized)
        .build()?;

    let layout = Layout::compute(window_settings.width, window_settings.height, false);

    window.add_child(
        WebviewBuilder::new(TOOLBAR_WEBVIEW, WebviewUrl::App("index.html".into())),
        LogicalPosition::new(0.0, 0.0),
        LogicalSize::new(layout.width, layout.toolbar_height),
    )?;

    let blank: Url = "about:blank".parse()?;
    window.add_child(
        WebviewBuilder::new(CONTENT_WEBVIEW, WebviewUrl::External(blank))
            .initialization_script(CONTENT_SCRIPT)
            .on_page_load(on_content_page_load),
        LogicalPosition::new(0.0, layout.content_top),
        LogicalSize::new(layout.width, layout.content_height),
    )?;

    let handle = window.clone();
    window.on_window_event(move |event| match event {
        WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
            if let Err(e) = relayout(&handle) {
                warn!(error = %e, "Could not lay out webviews");
            }
        }
        WindowEvent::CloseRequested { api, .. } => {
            if hold_close_for_final_sync(&handle) {
                api.prevent_close();
            }
        }
        _ => {}
    });

    // The window may already be maximized.
    relayout(&window)?;

    info!(
        title = %window_settings.title,
        maximized = window_settings.maximized,
        "Main window opened"
    );
    Ok(window)
}

/// Re-applies the layout for the current window size and fullscreen state.
pub fn relayout(window: &Window) -> tauri::Result<()> {
    let fullscreen = window.is_fullscreen()?;
    apply_layout(window, fullscreen)
}

fn apply_layout(window: &Window, fullscreen: bool) -> tauri::Result<()> {
    let scale = window.scale_factor()?;
    let size = window.inner_size()?.to_logical::<f64>(scale);
    let layout = Layout::compute(size.width, size.height, fullscreen);

    let app = window.app_handle();
    if let Some(toolbar) = app.get_webview(TOOLBAR_WEBVIEW) {
        toolbar.set_position(LogicalPosition::new(0.0, 0.0))?;
        toolbar.set_size(LogicalSize::new(layout.width, layout.toolbar_height))?;
    }
    if let Some(content) = app.get_webview(CONTENT_WEBVIEW) {
        content.set_position(LogicalPosition::new(0.0, layout.content_top))?;
        content.set_size(LogicalSize::new(layout.width, layout.content_height))?;
    }
    Ok(())
}

/// Enters or leaves fullscreen and hides or shows the toolbar.
pub fn set_fullscreen(window: &Window, enabled: bool) -> tauri::Result<()> {
    if window.is_fullscreen()? != enabled {
        debug!(enabled, "Switching fullscreen");
        window.set_fullscreen(enabled)?;
    }
    apply_layout(window, enabled)
}

/// Starts the final jar sync on the first close request; the window is
/// destroyed once it finishes. Returns whether the close must be held.
fn hold_close_for_final_sync(window: &Window) -> bool {
    let app = window.app_handle().clone();
    if !app.state::<ShellState>().begin_close() {
        return false;
    }

    let window = window.clone();
    tauri::async_runtime::spawn(async move {
        info!("Window closing, saving cookies");
        sync_jar_in_background(app).await;
        if let Err(e) = window.destroy() {
            error!(error = %e, "Failed to close the main window");
        }
    });
    true
}

// =============================================================================
// Content View
// =============================================================================

/// The content webview, if the window is still open.
pub fn content_webview(app: &AppHandle) -> Option<Webview> {
    app.get_webview(CONTENT_WEBVIEW)
}

fn on_content_page_load(webview: Webview, payload: PageLoadPayload<'_>) {
    let url = payload.url();
    match payload.event() {
        PageLoadEvent::Started => emit_location(webview.app_handle(), url),
        PageLoadEvent::Finished => {
            debug!(url = %url, "Page loaded");
            if !is_blank(url) {
                tauri::async_runtime::spawn(sync_jar_in_background(webview.app_handle().clone()));
            }
        }
    }
}

/// Tells the toolbar where the content view is now.
pub fn emit_location(app: &AppHandle, url: &Url) {
    if is_blank(url) {
        return;
    }

    let payload = LocationPayload {
        url: url.to_string(),
    };
    if let Err(e) = app.emit_to(TOOLBAR_WEBVIEW, NAVIGATION_EVENT, payload) {
        error!(error = %e, "Failed to emit navigation event");
    }
}

pub fn is_blank(url: &Url) -> bool {
    url.scheme() == "about"
}

/// Fills the jar with `restored` and then loads `home`.
pub fn restore_session(app: AppHandle, restored: Vec<CookieRecord>, home: Url) {
    tauri::async_runtime::spawn(async move {
        let result =
            tauri::async_runtime::spawn_blocking(move || load_session(&app, &restored, home))
                .await;
        if let Err(e) = result {
            error!(error = %e, "Session restore task failed");
        }
    });
}

fn load_session(app: &AppHandle, restored: &[CookieRecord], home: Url) {
    let Some(content) = content_webview(app) else {
        warn!("Content view closed before the session was restored");
        return;
    };

    let mut injected = 0;
    for record in restored {
        match content.set_cookie(record.to_cookie()) {
            Ok(()) => injected += 1,
            Err(e) => warn!(cookie = %record.name, error = %e, "Could not restore cookie"),
        }
    }
    info!(injected, total = restored.len(), "Session cookies restored");

    info!(url = %home, "Loading home page");
    if let Err(e) = content.navigate(home) {
        error!(error = %e, "Failed to load the home page");
    }
}

// =============================================================================
// Cookie Jar Sync
// =============================================================================

/// Snapshots the content view's jar and persists whatever is new.
///
/// Blocking. Returns how many cookies were appended.
pub fn sync_jar(app: &AppHandle) -> usize {
    let Some(content) = content_webview(app) else {
        return 0;
    };

    let cookies = match content.cookies() {
        Ok(cookies) => cookies,
        Err(e) => {
            warn!(error = %e, "Could not read the cookie jar");
            return 0;
        }
    };

    let snapshot: Vec<CookieRecord> = cookies.iter().map(CookieRecord::from_cookie).collect();
    app.state::<CookieState>()
        .with_sync(|sync| sync.sync(snapshot))
}

/// Runs [`sync_jar`] on a blocking thread.
pub async fn sync_jar_in_background(app: AppHandle) {
    match tauri::async_runtime::spawn_blocking(move || sync_jar(&app)).await {
        Ok(0) => {}
        Ok(count) => debug!(count, "Cookies persisted"),
        Err(e) => error!(error = %e, "Cookie sync task failed"),
    }
}

/// Polls the jar every `every` until the window starts closing.
pub fn spawn_cookie_timer(app: AppHandle, every: Duration) {
    tauri::async_runtime::spawn(async move {
        let mut ticker = tokio::time::interval(every.max(Duration::from_secs(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if app.state::<ShellState>().is_closing() {
                debug!("Cookie timer stopped");
                return;
            }
            sync_jar_in_background(app.clone()).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_windowed() {
        let layout = Layout::compute(1280.0, 720.0, false);
        assert_eq!(layout.width, 1280.0);
        assert_eq!(layout.toolbar_height, TOOLBAR_HEIGHT);
        assert_eq!(layout.content_top, TOOLBAR_HEIGHT);
        assert_eq!(layout.content_height, 720.0 - TOOLBAR_HEIGHT);
    }

    #[test]
    fn test_layout_fullscreen_hides_toolbar() {
        let layout = Layout::compute(1920.0, 1080.0, true);
        assert_eq!(layout.toolbar_height, 0.0);
        assert_eq!(layout.content_top, 0.0);
        assert_eq!(layout.content_height, 1080.0);
    }

    #[test]
    fn test_layout_tiny_window() {
        let layout = Layout::compute(100.0, 20.0, false);
        assert_eq!(layout.toolbar_height, 20.0);
        assert_eq!(layout.content_height, 0.0);

        let layout = Layout::compute(-5.0, -5.0, false);
        assert_eq!(layout.width, 0.0);
        assert_eq!(layout.content_height, 0.0);
    }

    #[test]
    fn test_blank_pages_are_not_reported() {
        assert!(is_blank(&"about:blank".parse().unwrap()));
        assert!(!is_blank(&"https://www.youtube.com/".parse().unwrap()));
    }

    #[test]
    fn test_content_script_hooks() {
        assert!(CONTENT_SCRIPT.contains("'set_fullscreen'"));
        assert!(CONTENT_SCRIPT.contains("'toggle_fullscreen'"));
        assert!(CONTENT_SCRIPT.contains("'report_location'"));
    }
}
