//! # tube-core: Pure Logic for TubeClient
//!
//! This crate holds the parts of TubeClient that have an external contract:
//! the address bar dispatch rule and the cookie line format. Everything here
//! is a pure function with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        TubeClient Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Toolbar webview  │  Content webview (youtube.com)    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Tauri IPC / jar snapshots              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Tauri Commands (app)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tube-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐   ┌────────────┐   ┌────────────┐             │   │
//! │  │   │ navigation │   │   cookie   │   │  version   │             │   │
//! │  │   │ classify   │   │ CookieRec  │   │ Release    │             │   │
//! │  │   │ Destination│   │ CookieKey  │   │ Version    │             │   │
//! │  │   └────────────┘   └────────────┘   └────────────┘             │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │     tube-store (cookies.txt, settings.toml) / tube-update       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`navigation`] - URL vs search query classification
//! - [`cookie`] - Cookie records and the Set-Cookie line format
//! - [`version`] - Release version comparison for self-update
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tube_core::{classify, CookieRecord};
//!
//! let dest = classify("youtu.be/abc123").unwrap();
//! assert_eq!(dest.as_str(), "https://youtu.be/abc123");
//!
//! let record = CookieRecord::parse_line("SID=abc; Secure; Path=/").unwrap();
//! assert!(record.secure);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cookie;
pub mod error;
pub mod navigation;
pub mod version;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

// `crate::` keeps `cookie` from resolving to the external crate of the same name.
pub use crate::cookie::{latest_by_key, CookieKey, CookieRecord, SameSite};
pub use crate::error::{CoreError, CoreResult};
pub use crate::navigation::{classify, Destination, HOME_URL};
pub use crate::version::ReleaseVersion;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Application name, used for the window title and HTTP User-Agent.
pub const APP_NAME: &str = "YouTube Client";

/// Name of the cookie file inside the data directory.
pub const COOKIE_FILE_NAME: &str = "cookies.txt";

/// Name of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";
