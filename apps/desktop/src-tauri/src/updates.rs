//! # Background Self-Update
//!
//! Checks the GitHub releases of the configured repository once per start
//! and installs a newer one next to the running executable.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  disabled ──► Disabled                                                  │
//! │                                                                         │
//! │  Checking ──► UpToDate                                                  │
//! │     │                                                                   │
//! │     └──────► debug build ──► Available                                  │
//! │     │                                                                   │
//! │     └──────► Installing ──► Installed (used on next start)              │
//! │                   │                                                     │
//! │                   └────────► Failed (install dir rolled back)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every status is stored in [`UpdateState`] and emitted as
//! `update:status` to the toolbar. Failures never stop the browser.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tauri::{AppHandle, Emitter, Manager};
use tracing::{error, info, warn};
use tube_core::ReleaseVersion;
use tube_store::UpdateSettings;
use tube_update::{
    staging_dir_for, UpdateCheck, UpdateConfig, UpdateError, UpdateResult, Updater,
};

use crate::shell::TOOLBAR_WEBVIEW;
use crate::state::{UpdateState, UpdateStatus};

/// Event carrying [`UpdateStatus`] to the toolbar.
pub const UPDATE_EVENT: &str = "update:status";

/// Starts the update check in the background.
pub fn spawn_update_check(app: AppHandle, settings: UpdateSettings) {
    if !settings.enabled {
        info!("Self-update disabled");
        publish(&app, UpdateStatus::Disabled);
        return;
    }

    tauri::async_runtime::spawn(async move {
        let status = match check_and_install(&app, &settings).await {
            Ok(status) => status,
            Err(e) => {
                if e.is_retryable() {
                    warn!(error = %e, "Update check failed, will try again next start");
                } else {
                    error!(error = %e, "Update failed");
                }
                UpdateStatus::failed(&e)
            }
        };
        publish(&app, status);
    });
}

async fn check_and_install(app: &AppHandle, settings: &UpdateSettings) -> UpdateResult<UpdateStatus> {
    let current = ReleaseVersion::parse(env!("CARGO_PKG_VERSION"))?;
    let config = UpdateConfig::new(&settings.repository, current)
        .with_api_base(&settings.api_base)
        .with_timeout(Duration::from_secs(settings.timeout_secs));
    let updater = Updater::new(config)?;

    publish(app, UpdateStatus::Checking);
    let (release, version) = match updater.check().await? {
        UpdateCheck::UpToDate { latest } => {
            return Ok(UpdateStatus::UpToDate {
                latest: latest.to_string(),
            })
        }
        UpdateCheck::Available { release, version } => (release, version),
    };

    let version = version.to_string();
    if cfg!(debug_assertions) {
        info!(version = %version, "Debug build, not installing the update");
        return Ok(UpdateStatus::Available { version });
    }

    let install_dir = install_dir()?;
    let staging = staging_dir_for(&install_dir);
    info!(
        version = %version,
        install_dir = ?install_dir,
        "Installing {}",
        release.display_name()
    );

    publish(
        app,
        UpdateStatus::Installing {
            version: version.clone(),
        },
    );
    updater.update(&release, &staging, &install_dir).await?;
    Ok(UpdateStatus::Installed { version })
}

/// Directory of the running executable. It may be shared with other
/// programs, so the update only replaces the files the release ships.
fn install_dir() -> UpdateResult<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| UpdateError::InstallFailed {
        reason: format!("cannot locate the running executable: {}", e),
        rolled_back: false,
    })?;

    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| UpdateError::InstallFailed {
            reason: format!("{} has no parent directory", exe.display()),
            rolled_back: false,
        })
}

fn publish(app: &AppHandle, status: UpdateStatus) {
    app.state::<UpdateState>().set(status.clone());
    if let Err(e) = app.emit_to(TOOLBAR_WEBVIEW, UPDATE_EVENT, status) {
        error!(error = %e, "Failed to emit update status");
    }
}
