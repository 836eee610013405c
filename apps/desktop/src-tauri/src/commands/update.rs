//! # Update Commands

use tauri::State;

use crate::state::{UpdateState, UpdateStatus};

/// Gets the last self-update status.
///
/// The toolbar calls this once on load; later changes arrive as
/// `update:status` events.
#[tauri::command]
pub fn get_update_status(updates: State<'_, UpdateState>) -> UpdateStatus {
    updates.get()
}
