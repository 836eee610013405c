//! # Shell State
//!
//! Window lifecycle flags.

use std::sync::atomic::{AtomicBool, Ordering};

/// Lifecycle flags of the main window.
#[derive(Debug, Default)]
pub struct ShellState {
    closing: AtomicBool,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the window as closing.
    ///
    /// ## Returns
    /// `true` for the first call only.
    pub fn begin_close(&self) -> bool {
        !self.closing.swap(true, Ordering::SeqCst)
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }
}
