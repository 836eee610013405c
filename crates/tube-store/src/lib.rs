//! # tube-store: File-Backed State for TubeClient
//!
//! Everything TubeClient keeps between runs: the cookie file, the settings
//! file and the directories they live in.
//!
//! ## Files
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         On-Disk State                                   │
//! │                                                                         │
//! │  data_dir/                                                             │
//! │  └── cookies.txt      append log, one Set-Cookie line per cookie       │
//! │                                                                         │
//! │  config_dir/                                                           │
//! │  └── settings.toml    window, browser and update settings, first_run   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cookies`] - Cookie bridge, jar observer and their wiring
//! - [`settings`] - `settings.toml` model and store
//! - [`first_run`] - One-time setup on a fresh installation
//! - [`paths`] - Platform directories
//! - [`fs`] - File system abstraction (disk and memory)
//! - [`error`] - Store error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tube_store::{CookieStoreBridge, CookieSync, MemoryFileSystem};
//! use tube_core::CookieRecord;
//!
//! let fs = MemoryFileSystem::new();
//! let mut sync = CookieSync::new(CookieStoreBridge::new(fs.clone(), "/data/cookies.txt"));
//!
//! let restored = sync.restore(true);
//! assert!(restored.is_empty());
//!
//! let sid = CookieRecord::new("SID", "abc").with_domain("youtube.com").with_path("/");
//! assert_eq!(sync.sync(vec![sid]), 1);
//! assert_eq!(
//!     fs.contents("/data/cookies.txt").as_deref(),
//!     Some("SID=abc; Path=/; Domain=youtube.com\n")
//! );
//! ```

pub mod cookies;
pub mod error;
pub mod first_run;
pub mod fs;
pub mod paths;
pub mod settings;

pub use cookies::{CookieListener, CookieOrigin, CookieStoreBridge, CookieSync, JarObserver};
pub use error::{StoreError, StoreResult};
pub use first_run::{run_first_time_setup, FirstRunSetup, PrepareDirectories};
pub use fs::{FileSystem, MemoryFileSystem, StdFileSystem};
pub use paths::AppPaths;
pub use settings::{
    AppSettings, BrowserSettings, LoadedSettings, SettingsStore, UpdateSettings, WindowSettings,
};
