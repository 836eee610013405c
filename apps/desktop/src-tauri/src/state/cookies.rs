//! # Cookie State
//!
//! The cookie sync pipeline, shared between the jar timer, page loads and
//! the final sync on close.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  jar timer ──────┐                                                      │
//! │  page finished ──┼──► with_sync(|s| s.sync(snapshot)) ──► cookies.txt   │
//! │  window close ───┘         (one at a time)                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Mutex, PoisonError};
use tube_store::{CookieSync, FileSystem, StdFileSystem};

/// Cookie sync state managed by Tauri.
pub struct CookieState<F: FileSystem = StdFileSystem> {
    sync: Mutex<CookieSync<F>>,
}

impl<F: FileSystem> CookieState<F> {
    pub fn new(sync: CookieSync<F>) -> Self {
        CookieState {
            sync: Mutex::new(sync),
        }
    }

    /// Executes a function with exclusive access to the sync pipeline.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let written = cookie_state.with_sync(|sync| sync.sync(snapshot));
    /// ```
    ///
    /// A poisoned lock is recovered; every append leaves the bridge and the
    /// observer consistent.
    pub fn with_sync<T, R>(&self, f: T) -> R
    where
        T: FnOnce(&mut CookieSync<F>) -> R,
    {
        let mut sync = self.sync.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut sync)
    }
}
