//! # First-Run Setup
//!
//! Runs once per installation, the first time the browser starts.
//!
//! ```text
//! open settings ──► file unusable? ──yes──► done  (file left untouched)
//!                       │
//!                       no
//!                       ▼
//!                   first_run? ──no──► done
//!                       │
//!                      yes
//!                       ▼
//!                 setup.prepare()    (failure logged, not fatal)
//!                       ▼
//!                 first_run = false
//!                       ▼
//!                 save file values   (no TUBE_* overrides; failure logged,
//!                                     setup runs again next time)
//! ```

use tracing::{error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::fs::FileSystem;
use crate::paths::AppPaths;
use crate::settings::{LoadedSettings, SettingsStore};

/// One-time work done on a fresh installation.
pub trait FirstRunSetup {
    fn prepare(&self) -> StoreResult<()>;
}

/// Creates the data and config directories.
pub struct PrepareDirectories<F: FileSystem> {
    fs: F,
    paths: AppPaths,
}

impl<F: FileSystem> PrepareDirectories<F> {
    pub fn new(fs: F, paths: AppPaths) -> Self {
        PrepareDirectories { fs, paths }
    }
}

impl<F: FileSystem> FirstRunSetup for PrepareDirectories<F> {
    fn prepare(&self) -> StoreResult<()> {
        for dir in [&self.paths.data_dir, &self.paths.config_dir] {
            self.fs.create_dir_all(dir).map_err(|e| {
                StoreError::SetupFailed(format!("cannot create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }
}

/// Runs `setup` if this is the first start, then clears the flag.
///
/// Only [`LoadedSettings::persisted`] is written back. When it is `None`
/// the settings file could not be used and nothing runs.
///
/// ## Returns
/// `true` if setup ran.
pub fn run_first_time_setup<F: FileSystem>(
    settings: &mut LoadedSettings,
    store: &SettingsStore<F>,
    setup: &dyn FirstRunSetup,
) -> bool {
    let Some(persisted) = settings.persisted.as_mut() else {
        return false;
    };
    if !persisted.first_run {
        return false;
    }

    info!("First start, running setup");
    if let Err(e) = setup.prepare() {
        error!(error = %e, "First-run setup failed");
    }

    persisted.first_run = false;
    settings.effective.first_run = false;
    if let Err(e) = store.save(persisted) {
        warn!(error = %e, "Could not save first-run flag");
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;
    use crate::settings::{AppSettings, HOME_URL_ENV};
    use std::cell::Cell;
    use std::path::Path;

    const PATH: &str = "/config/settings.toml";

    struct CountingSetup {
        calls: Cell<u32>,
        fail: bool,
    }

    impl CountingSetup {
        fn new(fail: bool) -> Self {
            CountingSetup {
                calls: Cell::new(0),
                fail,
            }
        }
    }

    impl FirstRunSetup for CountingSetup {
        fn prepare(&self) -> StoreResult<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(StoreError::SetupFailed("boom".into()));
            }
            Ok(())
        }
    }

    #[test]
    fn test_setup_runs_exactly_once() {
        let fs = MemoryFileSystem::new();
        let store = SettingsStore::new(fs, PATH);
        let setup = CountingSetup::new(false);

        let mut settings = store.open_with(|_| None);
        assert!(run_first_time_setup(&mut settings, &store, &setup));
        assert!(!settings.effective.first_run);

        let mut settings = store.open_with(|_| None);
        assert!(!settings.effective.first_run);
        assert!(!run_first_time_setup(&mut settings, &store, &setup));

        assert_eq!(setup.calls.get(), 1);
    }

    #[test]
    fn test_failed_setup_still_clears_flag() {
        let store = SettingsStore::new(MemoryFileSystem::new(), PATH);
        let setup = CountingSetup::new(true);

        let mut settings = store.open_with(|_| None);
        assert!(run_first_time_setup(&mut settings, &store, &setup));
        assert!(!store.load_file().unwrap().first_run);
    }

    #[test]
    fn test_unsaved_flag_runs_again() {
        let fs = MemoryFileSystem::new();
        fs.set_fail_writes(true);
        let store = SettingsStore::new(fs, PATH);
        let setup = CountingSetup::new(false);

        let mut settings = store.open_with(|_| None);
        assert!(run_first_time_setup(&mut settings, &store, &setup));

        let mut reloaded = store.open_with(|_| None);
        assert!(reloaded.effective.first_run);
        assert!(run_first_time_setup(&mut reloaded, &store, &setup));
        assert_eq!(setup.calls.get(), 2);
    }

    #[test]
    fn test_invalid_file_is_not_replaced() {
        let fs = MemoryFileSystem::new();
        let original = concat!(
            "first_run = false\n",
            "[browser]\n",
            "home_url = \"https://www.youtube.com/feed/subscriptions\"\n",
            "[window]\n",
            "width = 0.0\n",
        );
        fs.insert(PATH, original);
        let store = SettingsStore::new(fs.clone(), PATH);
        let setup = CountingSetup::new(false);

        let mut settings = store.open_with(|_| None);
        assert!(!run_first_time_setup(&mut settings, &store, &setup));

        assert_eq!(setup.calls.get(), 0);
        assert_eq!(fs.contents(PATH).unwrap(), original);
    }

    #[test]
    fn test_malformed_file_is_not_replaced() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "first_run = maybe\n");
        let store = SettingsStore::new(fs.clone(), PATH);
        let setup = CountingSetup::new(false);

        let mut settings = store.open_with(|_| None);
        assert!(!run_first_time_setup(&mut settings, &store, &setup));
        assert_eq!(fs.contents(PATH).unwrap(), "first_run = maybe\n");
    }

    #[test]
    fn test_overrides_are_not_saved() {
        let fs = MemoryFileSystem::new();
        let store = SettingsStore::new(fs, PATH);
        let setup = CountingSetup::new(false);

        let mut settings = store.open_with(|key| {
            (key == HOME_URL_ENV).then(|| "https://www.youtube.com/feed/trending".to_string())
        });
        assert_eq!(
            settings.effective.browser.home_url,
            "https://www.youtube.com/feed/trending"
        );
        assert!(run_first_time_setup(&mut settings, &store, &setup));

        let saved = store.load_file().unwrap();
        assert!(!saved.first_run);
        assert_eq!(saved.browser.home_url, AppSettings::default().browser.home_url);
    }

    #[test]
    fn test_prepare_directories() {
        let fs = MemoryFileSystem::new();
        let setup = PrepareDirectories::new(fs.clone(), AppPaths::new("/data", "/config"));

        setup.prepare().unwrap();
        assert!(fs.exists(Path::new("/data")));
        assert!(fs.exists(Path::new("/config")));

        fs.set_fail_writes(true);
        assert!(matches!(setup.prepare(), Err(StoreError::SetupFailed(_))));
    }
}
