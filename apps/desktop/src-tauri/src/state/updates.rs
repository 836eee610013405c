//! # Update State
//!
//! Last known self-update status. The update task writes it and emits it
//! as `update:status`; the toolbar reads it with `get_update_status` when it
//! loads after the event already fired.

use serde::Serialize;
use std::sync::RwLock;
use tube_update::UpdateError;

/// Self-update progress as the toolbar sees it.
///
/// ## Serialization
/// ```json
/// { "state": "installed", "version": "1.3" }
/// { "state": "failed", "message": "Request timed out", "retryable": true }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum UpdateStatus {
    /// No check has started yet.
    #[default]
    Idle,
    /// Self-update is switched off in the settings.
    Disabled,
    Checking,
    UpToDate { latest: String },
    /// A newer release exists but this build does not install it.
    Available { version: String },
    Installing { version: String },
    /// Installed; takes effect on the next start.
    Installed { version: String },
    Failed { message: String, retryable: bool },
}

impl UpdateStatus {
    pub fn failed(err: &UpdateError) -> Self {
        UpdateStatus::Failed {
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Update status managed by Tauri.
#[derive(Debug, Default)]
pub struct UpdateState {
    status: RwLock<UpdateStatus>,
}

impl UpdateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the current status.
    pub fn get(&self) -> UpdateStatus {
        self.status
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Replaces the current status.
    pub fn set(&self, status: UpdateStatus) {
        if let Ok(mut s) = self.status.write() {
            *s = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_json() {
        let json = serde_json::to_value(UpdateStatus::UpToDate {
            latest: "1.2".into(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"state": "upToDate", "latest": "1.2"}));

        let json = serde_json::to_value(UpdateStatus::Idle).unwrap();
        assert_eq!(json, serde_json::json!({"state": "idle"}));
    }

    #[test]
    fn test_failed_keeps_retryability() {
        let status = UpdateStatus::failed(&UpdateError::Status { status: 503 });
        assert!(matches!(status, UpdateStatus::Failed { retryable: true, .. }));

        let status = UpdateStatus::failed(&UpdateError::Status { status: 404 });
        assert!(matches!(status, UpdateStatus::Failed { retryable: false, .. }));
    }

    #[test]
    fn test_state_roundtrip() {
        let state = UpdateState::new();
        assert_eq!(state.get(), UpdateStatus::Idle);

        state.set(UpdateStatus::Installed {
            version: "1.3".into(),
        });
        assert_eq!(
            state.get(),
            UpdateStatus::Installed {
                version: "1.3".into()
            }
        );
    }
}
