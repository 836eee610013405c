//! # Tauri Commands Module
//!
//! Commands exposed to the toolbar and to the script injected into the
//! content view.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports)
//! ├── navigation.rs  ◄─── Address bar, home, location reports
//! ├── window.rs      ◄─── Fullscreen
//! ├── config.rs      ◄─── Configuration retrieval
//! └── update.rs      ◄─── Self-update status
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tauri Command Flow                                   │
//! │                                                                         │
//! │  Toolbar (index.html)                                                   │
//! │  ────────────────────                                                   │
//! │  const url = await window.__TAURI__.core.invoke('navigate', {           │
//! │    input: 'lofi hip hop'                                                │
//! │  });                                                                    │
//! │         │                                                               │
//! │         │ (IPC via WebView)                                             │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  #[tauri::command]                                                      │
//! │  fn navigate(                                                           │
//! │      app: AppHandle,     ◄── Injected by Tauri                          │
//! │      input: String,      ◄── From invoke params                         │
//! │  ) -> Result<Option<String>, ApiError>                                  │
//! │         │                                                               │
//! │         │ classify ──► content.navigate(url)                            │
//! │         ▼                                                               │
//! │  Toolbar receives: "https://www.youtube.com/results?search_query=..."   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Callers
//! - Toolbar: `navigate`, `go_home`, `get_location`, `toggle_fullscreen`,
//!   `get_config`, `get_update_status`
//! - Content script: `report_location`, `set_fullscreen`, `toggle_fullscreen`

pub mod config;
pub mod navigation;
pub mod update;
pub mod window;
