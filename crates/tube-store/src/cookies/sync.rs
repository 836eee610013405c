//! # Cookie Sync
//!
//! Pairs a [`JarObserver`] with a [`CookieStoreBridge`]: the shell restores
//! once at startup, then feeds every jar snapshot to [`CookieSync::sync`].
//!
//! ```text
//! restore(): cookies.txt ─► [compact] ─► load_latest ─► Restored events
//!                                             │
//!                                             └─► observer.mark_restored
//!
//! sync(snapshot): observer.observe ─► changed records ─► Network events
//!                                                         (bridge appends)
//! ```
//!
//! `CookieSync` has a single owner and no interior locking. The shell keeps
//! it behind one `Mutex`, so appends happen in observation order.

use tracing::{debug, warn};
use tube_core::CookieRecord;

use super::bridge::{CookieListener, CookieOrigin, CookieStoreBridge};
use super::observer::JarObserver;
use crate::fs::FileSystem;

/// Keeps `cookies.txt` in step with the web view's jar.
pub struct CookieSync<F: FileSystem> {
    bridge: CookieStoreBridge<F>,
    observer: JarObserver,
}

impl<F: FileSystem> CookieSync<F> {
    pub fn new(bridge: CookieStoreBridge<F>) -> Self {
        CookieSync {
            bridge,
            observer: JarObserver::new(),
        }
    }

    /// Loads the saved cookies for injection into the jar.
    ///
    /// With `compact`, the file is first rewritten to one line per key. A
    /// failed compaction is logged and the uncompacted file is loaded.
    pub fn restore(&mut self, compact: bool) -> Vec<CookieRecord> {
        if compact {
            if let Err(e) = self.bridge.compact() {
                warn!(error = %e, "Cookie file compaction failed, loading it as is");
            }
        }

        let restored = self.bridge.load_latest();
        for record in &restored {
            self.bridge.on_cookie_added(record, CookieOrigin::Restored);
        }
        self.observer.mark_restored(&restored);

        restored
    }

    /// Feeds one jar snapshot through the observer and persists what changed.
    ///
    /// Returns the number of new or changed cookies seen.
    pub fn sync(&mut self, snapshot: impl IntoIterator<Item = CookieRecord>) -> usize {
        let added = self.observer.observe(snapshot);
        for record in &added {
            self.bridge.on_cookie_added(record, CookieOrigin::Network);
        }

        if !added.is_empty() {
            debug!(count = added.len(), "Jar snapshot had new cookies");
        }
        added.len()
    }

    pub fn bridge(&self) -> &CookieStoreBridge<F> {
        &self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    const PATH: &str = "/data/cookies.txt";

    fn sync_over(fs: &MemoryFileSystem) -> CookieSync<MemoryFileSystem> {
        CookieSync::new(CookieStoreBridge::new(fs.clone(), PATH))
    }

    fn cookie(name: &str, value: &str) -> CookieRecord {
        CookieRecord::new(name, value)
            .with_domain("youtube.com")
            .with_path("/")
    }

    #[test]
    fn test_restored_jar_is_not_rewritten() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "SID=a; Path=/; Domain=youtube.com\n");
        let mut sync = sync_over(&fs);

        let restored = sync.restore(false);
        assert_eq!(restored, vec![cookie("SID", "a")]);

        // The engine reports the injected cookie back.
        assert_eq!(sync.sync(restored), 0);
        assert_eq!(fs.contents(PATH).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_new_and_changed_cookies_are_appended() {
        let fs = MemoryFileSystem::new();
        let mut sync = sync_over(&fs);
        sync.restore(true);

        assert_eq!(sync.sync(vec![cookie("SID", "a")]), 1);
        assert_eq!(sync.sync(vec![cookie("SID", "a"), cookie("PREF", "x")]), 1);
        assert_eq!(sync.sync(vec![cookie("SID", "b"), cookie("PREF", "x")]), 1);

        let contents = fs.contents(PATH).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(
            lines,
            [
                "SID=a; Path=/; Domain=youtube.com",
                "PREF=x; Path=/; Domain=youtube.com",
                "SID=b; Path=/; Domain=youtube.com",
            ]
        );
    }

    #[test]
    fn test_returning_cookie_is_not_duplicated_on_disk() {
        let fs = MemoryFileSystem::new();
        let mut sync = sync_over(&fs);

        sync.sync(vec![cookie("SID", "a")]);
        sync.sync(Vec::new());
        // Reported again by the observer, but identical to what is persisted.
        assert_eq!(sync.sync(vec![cookie("SID", "a")]), 1);

        assert_eq!(fs.contents(PATH).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_restore_with_compaction() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "A=1; Path=/\nA=2; Path=/\n");
        let mut sync = sync_over(&fs);

        let restored = sync.restore(true);
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].value, "2");
        assert_eq!(fs.contents(PATH).unwrap(), "A=2; Path=/\n");
    }

    #[test]
    fn test_failed_compaction_still_restores() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "A=1; Path=/\nA=2; Path=/\n");
        fs.set_fail_writes(true);
        let mut sync = sync_over(&fs);

        let restored = sync.restore(true);
        assert_eq!(restored.len(), 1);
        assert_eq!(sync.bridge().persisted_count(), 1);
    }
}
