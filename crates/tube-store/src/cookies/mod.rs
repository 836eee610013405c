//! # Cookie Persistence
//!
//! - [`bridge`] - `cookies.txt` load / append / compact
//! - [`observer`] - jar snapshot diffing
//! - [`sync`] - the two wired together for the shell

pub mod bridge;
pub mod observer;
pub mod sync;

pub use bridge::{CookieListener, CookieOrigin, CookieStoreBridge};
pub use observer::JarObserver;
pub use sync::CookieSync;
