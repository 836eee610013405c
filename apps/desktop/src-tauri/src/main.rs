//! # TubeClient Desktop Entry Point
//!
//! The setup lives in `lib.rs`; this only maps its result to the exit
//! status.

// Prevents an additional console window on Windows in release
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]

fn main() {
    if let Err(e) = tubeclient_desktop_lib::run() {
        tracing::error!(error = %e, "YouTube Client failed");
        eprintln!("YouTube Client failed: {e}");
        std::process::exit(1);
    }
}
