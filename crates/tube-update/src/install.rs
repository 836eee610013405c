//! # Staged Install
//!
//! A downloaded release is extracted next to the installation first. Only
//! the files the archive ships are then moved in, one rename each, and
//! anything else living in the install directory is left alone.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  extract_to_staging(zip, staging)                                      │
//! │     staging/ cleared, entries written, `../x` and `/x` rejected         │
//! │                                                                         │
//! │  swap_into_place(staging, install)                                     │
//! │     for each staged file f:                                             │
//! │       1. install/f  ──rename──►  install.bak/f   (if present)           │
//! │       2. staging/f  ──rename──►  install/f                              │
//! │     any step fails? placed files removed,                               │
//! │                     install.bak/* ──rename──► install/*  (rolled back)  │
//! │     3. install.bak/ and staging/ removed                                │
//! │                                                                         │
//! │  install/other-tool  ───────────  never touched                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The renames need `staging`, `install` and `install.bak` on the same file
//! system.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::{UpdateError, UpdateResult};

/// Extracts a zip archive into `staging`, replacing its previous content.
///
/// ## Returns
/// The number of files written.
///
/// ## Errors
/// - [`UpdateError::InvalidArchive`] if the bytes are not a zip archive
/// - [`UpdateError::UnsafeEntry`] if an entry would land outside `staging`
/// - [`UpdateError::EmptyArchive`] if there is nothing to install
///
/// On error the staging directory is removed.
pub fn extract_to_staging(archive: &[u8], staging: &Path) -> UpdateResult<usize> {
    if staging.exists() {
        fs::remove_dir_all(staging).map_err(|e| UpdateError::io(staging, e))?;
    }
    fs::create_dir_all(staging).map_err(|e| UpdateError::io(staging, e))?;

    let result = extract_entries(archive, staging);
    if result.is_err() {
        if let Err(e) = fs::remove_dir_all(staging) {
            warn!(path = ?staging, error = %e, "Could not clean up staging directory");
        }
    }
    result
}

fn extract_entries(archive: &[u8], staging: &Path) -> UpdateResult<usize> {
    let mut zip = ZipArchive::new(Cursor::new(archive))?;
    let mut files = 0;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| UpdateError::UnsafeEntry(entry.name().to_string()))?;
        let target = staging.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| UpdateError::io(&target, e))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| UpdateError::io(parent, e))?;
        }
        let mut out = fs::File::create(&target).map_err(|e| UpdateError::io(&target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| UpdateError::io(&target, e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode))
                .map_err(|e| UpdateError::io(&target, e))?;
        }

        files += 1;
    }

    if files == 0 {
        return Err(UpdateError::EmptyArchive);
    }

    debug!(path = ?staging, files, "Extracted update archive");
    Ok(files)
}

/// Moves every file under `staging` to the same relative path under
/// `install_dir`.
///
/// Files in `install_dir` that the staged release does not ship are kept.
/// Files it does ship are moved to `<install_dir>.bak` first, and restored
/// from there if a later file cannot be placed. If `install_dir` does not
/// exist yet, it is created.
///
/// ## Errors
/// [`UpdateError::InstallFailed`] when a staged file could not be moved.
/// `rolled_back` tells whether the previous installation is back in place.
pub fn swap_into_place(staging: &Path, install_dir: &Path) -> UpdateResult<()> {
    let staged = staged_files(staging).map_err(|e| UpdateError::InstallFailed {
        reason: format!("cannot read {}: {}", staging.display(), e),
        rolled_back: true,
    })?;

    fs::create_dir_all(install_dir).map_err(|e| UpdateError::InstallFailed {
        reason: format!("cannot create {}: {}", install_dir.display(), e),
        rolled_back: true,
    })?;

    let backup = sibling(install_dir, ".bak");
    if backup.exists() {
        fs::remove_dir_all(&backup).map_err(|e| UpdateError::io(&backup, e))?;
    }

    let mut journal = Journal::new(install_dir, &backup);
    for relative in &staged {
        if let Err(e) = journal.replace(staging, relative) {
            let rolled_back = journal.roll_back();
            warn!(
                path = ?install_dir.join(relative),
                error = %e,
                rolled_back,
                "Could not move staged update into place"
            );
            if rolled_back {
                remove_quietly(&backup);
            }
            return Err(UpdateError::InstallFailed {
                reason: format!("cannot replace {}: {}", relative.display(), e),
                rolled_back,
            });
        }
    }

    remove_quietly(&backup);
    remove_quietly(staging);

    info!(path = ?install_dir, files = staged.len(), "Update installed");
    Ok(())
}

/// Relative paths of all files below `staging`, sorted.
fn staged_files(staging: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![PathBuf::new()];

    while let Some(relative) = pending.pop() {
        for entry in fs::read_dir(staging.join(&relative))? {
            let entry = entry?;
            let path = relative.join(entry.file_name());
            if entry.file_type()?.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Every rename done by [`swap_into_place`], so it can be undone.
struct Journal<'a> {
    install_dir: &'a Path,
    backup: &'a Path,
    moved_aside: Vec<PathBuf>,
    placed: Vec<PathBuf>,
}

impl<'a> Journal<'a> {
    fn new(install_dir: &'a Path, backup: &'a Path) -> Self {
        Journal {
            install_dir,
            backup,
            moved_aside: Vec::new(),
            placed: Vec::new(),
        }
    }

    fn replace(&mut self, staging: &Path, relative: &Path) -> io::Result<()> {
        let target = self.install_dir.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        if fs::symlink_metadata(&target).is_ok() {
            let saved = self.backup.join(relative);
            if let Some(parent) = saved.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::rename(&target, &saved)?;
            self.moved_aside.push(relative.to_path_buf());
        }

        fs::rename(staging.join(relative), &target)?;
        self.placed.push(relative.to_path_buf());
        Ok(())
    }

    /// Removes placed files and puts the saved ones back. Returns `true`
    /// when every step succeeded.
    fn roll_back(&self) -> bool {
        let mut clean = true;

        for relative in self.placed.iter().rev() {
            let target = self.install_dir.join(relative);
            if let Err(e) = fs::remove_file(&target) {
                warn!(path = ?target, error = %e, "Could not remove partially installed file");
                clean = false;
            }
        }

        for relative in self.moved_aside.iter().rev() {
            let target = self.install_dir.join(relative);
            if let Err(e) = fs::rename(self.backup.join(relative), &target) {
                warn!(path = ?target, error = %e, "Could not restore previous file");
                clean = false;
            }
        }

        clean
    }
}

fn remove_quietly(dir: &Path) {
    if !dir.exists() {
        return;
    }
    if let Err(e) = fs::remove_dir_all(dir) {
        warn!(path = ?dir, error = %e, "Could not remove leftover update directory");
    }
}

/// Staging directory next to `install_dir`, so the swap stays on one file
/// system: `/opt/tubeclient` -> `/opt/tubeclient.staging`.
pub fn staging_dir_for(install_dir: &Path) -> PathBuf {
    sibling(install_dir, ".staging")
}

/// `/opt/app` + `.bak` -> `/opt/app.bak`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("install"));
    name.push(suffix);
    path.with_file_name(name)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, contents) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(contents.as_bytes()).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_sibling() {
        assert_eq!(
            sibling(Path::new("/opt/tube"), ".bak"),
            PathBuf::from("/opt/tube.bak")
        );
        assert_eq!(
            staging_dir_for(Path::new("/opt/tube")),
            PathBuf::from("/opt/tube.staging")
        );
    }

    #[test]
    fn test_extract_nested_files() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        let zip = archive(&[
            ("tubeclient", "binary"),
            ("resources/", ""),
            ("resources/icon.png", "png"),
        ]);

        assert_eq!(extract_to_staging(&zip, &staging).unwrap(), 2);
        assert_eq!(fs::read(staging.join("tubeclient")).unwrap(), b"binary");
        assert_eq!(fs::read(staging.join("resources/icon.png")).unwrap(), b"png");
    }

    #[test]
    fn test_extract_clears_old_staging() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        fs::create_dir_all(&staging).unwrap();
        fs::write(staging.join("stale"), b"old").unwrap();

        extract_to_staging(&archive(&[("new", "x")]), &staging).unwrap();
        assert!(!staging.join("stale").exists());
        assert!(staging.join("new").exists());
    }

    #[test]
    fn test_extract_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        let zip = archive(&[("ok", "1"), ("../evil", "2")]);

        let err = extract_to_staging(&zip, &staging).unwrap_err();
        assert!(matches!(err, UpdateError::UnsafeEntry(name) if name == "../evil"));
        assert!(!dir.path().join("evil").exists());
        assert!(!staging.exists());
    }

    #[test]
    fn test_extract_empty_archive() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");

        let err = extract_to_staging(&archive(&[]), &staging).unwrap_err();
        assert!(matches!(err, UpdateError::EmptyArchive));

        let err = extract_to_staging(&archive(&[("only-dir/", "")]), &staging).unwrap_err();
        assert!(matches!(err, UpdateError::EmptyArchive));
    }

    #[test]
    fn test_extract_garbage() {
        let dir = TempDir::new().unwrap();
        let err = extract_to_staging(b"not a zip", &dir.path().join("s")).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidArchive(_)));
    }

    #[test]
    fn test_swap_replaces_install() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        let install = dir.path().join("app");
        fs::create_dir_all(&staging).unwrap();
        fs::create_dir_all(&install).unwrap();
        fs::write(staging.join("version"), b"1.3").unwrap();
        fs::write(install.join("version"), b"1.2").unwrap();

        swap_into_place(&staging, &install).unwrap();

        assert_eq!(fs::read(install.join("version")).unwrap(), b"1.3");
        assert!(!staging.exists());
        assert!(!dir.path().join("app.bak").exists());
    }

    #[test]
    fn test_swap_keeps_unrelated_files() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        let install = dir.path().join("bin");
        fs::create_dir_all(&staging).unwrap();
        fs::create_dir_all(&install).unwrap();
        fs::write(install.join("tubeclient"), b"old build").unwrap();
        fs::write(install.join("other-tool"), b"not ours").unwrap();
        fs::write(staging.join("tubeclient"), b"new build").unwrap();

        swap_into_place(&staging, &install).unwrap();

        assert_eq!(fs::read(install.join("tubeclient")).unwrap(), b"new build");
        assert_eq!(fs::read(install.join("other-tool")).unwrap(), b"not ours");
        assert!(!dir.path().join("bin.bak").exists());
        assert!(!staging.exists());
    }

    #[test]
    fn test_swap_adds_nested_files() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        let install = dir.path().join("app");
        fs::create_dir_all(staging.join("resources")).unwrap();
        fs::create_dir_all(install.join("resources")).unwrap();
        fs::write(staging.join("resources/icon.png"), b"new icon").unwrap();
        fs::write(install.join("resources/user.css"), b"kept").unwrap();

        swap_into_place(&staging, &install).unwrap();

        assert_eq!(fs::read(install.join("resources/icon.png")).unwrap(), b"new icon");
        assert_eq!(fs::read(install.join("resources/user.css")).unwrap(), b"kept");
    }

    #[test]
    fn test_swap_rolls_back_replaced_files_on_later_failure() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        let install = dir.path().join("app");
        fs::create_dir_all(staging.join("sub")).unwrap();
        fs::create_dir_all(&install).unwrap();
        fs::write(staging.join("a"), b"new a").unwrap();
        fs::write(staging.join("sub/b"), b"new b").unwrap();
        fs::write(install.join("a"), b"old a").unwrap();
        // A plain file where the release expects a directory
        fs::write(install.join("sub"), b"plain file").unwrap();

        let err = swap_into_place(&staging, &install).unwrap_err();

        assert!(matches!(
            err,
            UpdateError::InstallFailed {
                rolled_back: true,
                ..
            }
        ));
        assert_eq!(fs::read(install.join("a")).unwrap(), b"old a");
        assert_eq!(fs::read(install.join("sub")).unwrap(), b"plain file");
        assert!(!dir.path().join("app.bak").exists());
    }

    #[test]
    fn test_swap_into_fresh_location() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        let install = dir.path().join("app");
        fs::create_dir_all(&staging).unwrap();

        swap_into_place(&staging, &install).unwrap();
        assert!(install.is_dir());
    }

    #[test]
    fn test_swap_rolls_back_when_staging_missing() {
        let dir = TempDir::new().unwrap();
        let install = dir.path().join("app");
        fs::create_dir_all(&install).unwrap();
        fs::write(install.join("version"), b"1.2").unwrap();

        let err = swap_into_place(&dir.path().join("missing"), &install).unwrap_err();

        assert!(matches!(
            err,
            UpdateError::InstallFailed {
                rolled_back: true,
                ..
            }
        ));
        assert_eq!(fs::read(install.join("version")).unwrap(), b"1.2");
        assert!(!dir.path().join("app.bak").exists());
    }
}
