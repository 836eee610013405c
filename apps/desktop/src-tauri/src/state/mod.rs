//! # State Module
//!
//! Manages application state for the Tauri desktop app.
//!
//! Each concern gets its own state type, and commands declare exactly the
//! state they read.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      Tauri Runtime                              │   │
//! │  │  builder.manage(settings_state);                                │   │
//! │  │  builder.manage(cookie_state);                                  │   │
//! │  │  builder.manage(update_state);                                  │   │
//! │  │  builder.manage(shell_state);                                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │       ┌──────────────────┬───┴──────────────┬──────────────────┐       │
//! │       ▼                  ▼                  ▼                  ▼        │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌──────────────┐   │
//! │  │SettingsState │ │ CookieState  │ │ UpdateState  │ │ ShellState   │   │
//! │  │              │ │              │ │              │ │              │   │
//! │  │ AppSettings  │ │ Mutex<       │ │ RwLock<      │ │ closing flag │   │
//! │  │ AppPaths     │ │  CookieSync  │ │  UpdateStatus│ │              │   │
//! │  │              │ │ >            │ │ >            │ │              │   │
//! │  └──────────────┘ └──────────────┘ └──────────────┘ └──────────────┘   │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SettingsState: Read-only after initialization                       │
//! │  • CookieState: Mutex, one sync at a time (timer, page load, close)    │
//! │  • UpdateState: RwLock, written by the update task only                │
//! │  • ShellState: AtomicBool                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cookies;
mod settings;
mod shell;
mod updates;

pub use cookies::CookieState;
pub use settings::{SettingsState, ShellConfig};
pub use shell::ShellState;
pub use updates::{UpdateState, UpdateStatus};
