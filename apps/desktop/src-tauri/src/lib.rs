//! # TubeClient Desktop Library
//!
//! Core library for the YouTube Client desktop shell.
//! This is the main entry point that configures and runs the Tauri app.
//!
//! ## Module Organization
//! ```text
//! tubeclient_desktop_lib/
//! ├── lib.rs          ◄─── You are here (Tauri setup & run)
//! ├── shell.rs        ◄─── Window, webviews, layout, cookie jar sync
//! ├── updates.rs      ◄─── Background self-update
//! ├── content.js      ◄─── Script injected into YouTube pages
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── settings.rs ◄─── Settings and paths (read-only)
//! │   ├── cookies.rs  ◄─── Cookie sync pipeline
//! │   ├── updates.rs  ◄─── Last update status
//! │   └── shell.rs    ◄─── Window lifecycle flags
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── navigation.rs ◄─ Address bar, home, location
//! │   ├── window.rs   ◄─── Fullscreen
//! │   ├── config.rs   ◄─── Configuration
//! │   └── update.rs   ◄─── Update status
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod shell;
pub mod state;
pub mod updates;

use std::time::Duration;
use tauri::Url;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tube_core::APP_NAME;
use tube_store::{
    run_first_time_setup, AppPaths, CookieStoreBridge, CookieSync, PrepareDirectories,
    SettingsStore, StdFileSystem,
};

use state::{CookieState, SettingsState, ShellState, UpdateState};

/// Runs the Tauri application.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter                                │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Resolve Paths & Settings ─────────────────────────────────────────► │
/// │     • TUBE_DATA_DIR or the platform data/config directories             │
/// │     • settings.toml, then TUBE_* environment variables                  │
/// │     • unusable settings.toml: defaults, file left untouched             │
/// │                                                                         │
/// │  3. First Run ────────────────────────────────────────────────────────► │
/// │     • Create directories once, clear the first_run flag                 │
/// │                                                                         │
/// │  4. Restore Cookies ──────────────────────────────────────────────────► │
/// │     • Compact cookies.txt (optional), load the latest record per key    │
/// │                                                                         │
/// │  5. Build & Run Tauri App ────────────────────────────────────────────► │
/// │     • Manage state, register commands                                   │
/// │     • Open window: toolbar + content view                               │
/// │     • Inject cookies, load home page                                    │
/// │     • Start the cookie timer and the update check                       │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// ## Errors
/// Returns an error when the data directory cannot be resolved or the
/// window cannot be created. The caller exits with a non-zero status.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!(version = env!("CARGO_PKG_VERSION"), "Starting {}", APP_NAME);

    let paths = AppPaths::discover()?;
    info!(data_dir = ?paths.data_dir, config_dir = ?paths.config_dir, "Paths resolved");

    let store = SettingsStore::new(StdFileSystem, paths.settings_file());
    let mut loaded = store.open();
    run_first_time_setup(
        &mut loaded,
        &store,
        &PrepareDirectories::new(StdFileSystem, paths.clone()),
    );
    let settings = loaded.effective;

    let home = Url::parse(&settings.browser.home_url)?;

    let mut cookie_sync = CookieSync::new(CookieStoreBridge::new(
        StdFileSystem,
        paths.cookie_file(),
    ));
    let restored = cookie_sync.restore(settings.browser.compact_cookies_on_start);

    let sync_interval = Duration::from_secs(settings.browser.cookie_sync_interval_secs);
    let update_settings = settings.update.clone();
    let window_settings = settings.clone();

    tauri::Builder::default()
        .manage(SettingsState::new(settings, paths))
        .manage(CookieState::new(cookie_sync))
        .manage(UpdateState::new())
        .manage(ShellState::new())
        // Setup hook runs before the event loop starts
        .setup(move |app| {
            let handle = app.handle().clone();

            shell::build_main_window(&handle, &window_settings)?;
            shell::restore_session(handle.clone(), restored, home);
            shell::spawn_cookie_timer(handle.clone(), sync_interval);
            updates::spawn_update_check(handle.clone(), update_settings);

            info!("Shell ready");
            Ok(())
        })
        // Register all commands
        .invoke_handler(tauri::generate_handler![
            // Navigation commands
            commands::navigation::navigate,
            commands::navigation::go_home,
            commands::navigation::get_location,
            commands::navigation::report_location,
            // Window commands
            commands::window::toggle_fullscreen,
            commands::window::set_fullscreen,
            // Config commands
            commands::config::get_config,
            // Update commands
            commands::update::get_update_status,
        ])
        .run(tauri::generate_context!())?;

    info!("{} stopped", APP_NAME);
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tube_store=trace` - Show trace for the cookie store only
/// - Default: INFO, DEBUG for the TubeClient crates
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "info,tube_core=debug,tube_store=debug,tube_update=debug,tubeclient_desktop_lib=debug",
        )
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();
}
