//! # Cookie Store Bridge
//!
//! Connects the web view's live cookie jar to `cookies.txt`.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cookie Persistence Flow                            │
//! │                                                                         │
//! │  STARTUP                                                               │
//! │  ───────                                                               │
//! │  cookies.txt ──► load_all() ──► [CookieRecord; n] ──► jar.set_cookie() │
//! │                  (bad lines skipped,                                   │
//! │                   every record remembered as persisted)                │
//! │                                                                         │
//! │  SESSION                                                               │
//! │  ───────                                                               │
//! │  jar adds cookie ──► on_cookie_added(record, Network)                  │
//! │                        │                                               │
//! │                        ├── identical to persisted? ──► skip            │
//! │                        └── otherwise ──► append line + sync_data       │
//! │                                                                         │
//! │  The file is an append log: the same key may appear many times and     │
//! │  the LAST occurrence wins when it is read back.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bridge never expires or evicts cookies. The jar decides what is
//! alive; the file only replays what the jar saw.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tube_core::{latest_by_key, CookieKey, CookieRecord};

use crate::error::{StoreError, StoreResult};
use crate::fs::FileSystem;

// =============================================================================
// Listener
// =============================================================================

/// Where an added cookie came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieOrigin {
    /// Injected from `cookies.txt` at startup. Never written back.
    Restored,
    /// Set by a page or response during this session.
    Network,
}

/// Receives "cookie added" notifications from the jar.
pub trait CookieListener {
    fn on_cookie_added(&mut self, record: &CookieRecord, origin: CookieOrigin);
}

// =============================================================================
// Bridge
// =============================================================================

/// Reads and appends `cookies.txt`.
pub struct CookieStoreBridge<F: FileSystem> {
    fs: F,
    path: PathBuf,
    /// Last record written to (or read from) the file, per key.
    persisted: HashMap<CookieKey, CookieRecord>,
}

impl<F: FileSystem> CookieStoreBridge<F> {
    /// Creates a bridge for the cookie file at `path`.
    ///
    /// Nothing is read until [`load_all`](Self::load_all) is called.
    pub fn new(fs: F, path: impl Into<PathBuf>) -> Self {
        CookieStoreBridge {
            fs,
            path: path.into(),
            persisted: HashMap::new(),
        }
    }

    /// Path of the cookie file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct cookies known to be in the file.
    pub fn persisted_count(&self) -> usize {
        self.persisted.len()
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Reads every cookie from the file, in file order.
    ///
    /// Never fails: a missing file yields an empty list, an unreadable file
    /// is logged and yields an empty list, malformed lines are skipped.
    /// Calling it twice on an unchanged file returns the same sequence.
    pub fn load_all(&mut self) -> Vec<CookieRecord> {
        let records = match self.read_records() {
            Ok(Some(parsed)) => parsed.records,
            Ok(None) => {
                debug!(path = ?self.path, "No cookie file yet, starting with an empty jar");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to read cookie file, starting without saved cookies");
                return Vec::new();
            }
        };

        for record in &records {
            self.persisted.insert(record.key(), record.clone());
        }

        info!(path = ?self.path, count = records.len(), "Loaded cookies");
        records
    }

    /// Like [`load_all`](Self::load_all), with one record per key.
    pub fn load_latest(&mut self) -> Vec<CookieRecord> {
        latest_by_key(self.load_all())
    }

    // =========================================================================
    // Appending
    // =========================================================================

    /// Appends one record to the file and flushes it.
    ///
    /// On success the record becomes the persisted state for its key.
    pub fn try_append(&mut self, record: &CookieRecord) -> StoreResult<()> {
        let mut line = record.to_line();
        line.push('\n');

        self.fs
            .append(&self.path, line.as_bytes())
            .map_err(|e| StoreError::io(&self.path, e))?;

        self.persisted.insert(record.key(), record.clone());
        Ok(())
    }

    // =========================================================================
    // Compaction
    // =========================================================================

    /// Rewrites the file as one line per key (last occurrence wins) and
    /// drops malformed lines. Expired cookies are kept.
    ///
    /// ## Returns
    /// The number of records in the file afterwards. A missing file is left
    /// missing and yields `0`. A file that is already compact is not
    /// rewritten.
    pub fn compact(&mut self) -> StoreResult<usize> {
        let Some(parsed) = self.read_records()? else {
            return Ok(0);
        };

        let latest = latest_by_key(parsed.records);
        if latest.len() == parsed.line_count {
            debug!(path = ?self.path, count = latest.len(), "Cookie file already compact");
            return Ok(latest.len());
        }

        let mut contents = String::new();
        for record in &latest {
            contents.push_str(&record.to_line());
            contents.push('\n');
        }

        self.fs
            .write_atomic(&self.path, contents.as_bytes())
            .map_err(|e| StoreError::io(&self.path, e))?;

        self.persisted = latest
            .iter()
            .map(|record| (record.key(), record.clone()))
            .collect();

        info!(
            path = ?self.path,
            before = parsed.line_count,
            after = latest.len(),
            "Compacted cookie file"
        );
        Ok(latest.len())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// `Ok(None)` when the file does not exist.
    fn read_records(&self) -> StoreResult<Option<ParsedFile>> {
        let bytes = match self.fs.read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        // Invalid UTF-8 only spoils the lines it appears on.
        let text = String::from_utf8_lossy(&bytes);

        let mut parsed = ParsedFile::default();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            parsed.line_count += 1;

            match CookieRecord::parse_line(line) {
                Ok(record) => parsed.records.push(record),
                Err(e) => warn!(
                    path = ?self.path,
                    line = index + 1,
                    error = %e,
                    "Skipping malformed cookie line"
                ),
            }
        }

        Ok(Some(parsed))
    }
}

#[derive(Debug, Default)]
struct ParsedFile {
    records: Vec<CookieRecord>,
    /// Non-empty lines, including the malformed ones.
    line_count: usize,
}

impl<F: FileSystem> CookieListener for CookieStoreBridge<F> {
    fn on_cookie_added(&mut self, record: &CookieRecord, origin: CookieOrigin) {
        let key = record.key();

        match origin {
            CookieOrigin::Restored => {
                self.persisted.insert(key, record.clone());
            }
            CookieOrigin::Network => {
                if self.persisted.get(&key) == Some(record) {
                    debug!(name = %record.name, "Cookie unchanged, not appending");
                    return;
                }

                match self.try_append(record) {
                    Ok(()) => debug!(
                        name = %record.name,
                        domain = %key.domain,
                        "Persisted cookie"
                    ),
                    Err(e) => error!(
                        name = %record.name,
                        error = %e,
                        "Failed to persist cookie; it stays in the jar for this session"
                    ),
                }
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFileSystem;

    const PATH: &str = "/data/cookies.txt";

    fn bridge(fs: &MemoryFileSystem) -> CookieStoreBridge<MemoryFileSystem> {
        CookieStoreBridge::new(fs.clone(), PATH)
    }

    fn sid(value: &str) -> CookieRecord {
        CookieRecord::new("SID", value)
            .with_domain("youtube.com")
            .with_path("/")
            .with_secure(true)
            .with_http_only(true)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let fs = MemoryFileSystem::new();
        assert!(bridge(&fs).load_all().is_empty());
        assert!(!fs.exists(Path::new(PATH)));
    }

    #[test]
    fn test_unreadable_file_loads_empty() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "SID=abc; Path=/\n");
        fs.set_fail_reads(true);
        assert!(bridge(&fs).load_all().is_empty());
    }

    #[test]
    fn test_load_skips_garbage_and_keeps_order() {
        let fs = MemoryFileSystem::new();
        fs.insert(
            PATH,
            "SID=abc; Secure; Path=/\n\n\x01garbage\nPREF=f6; Path=/\n=novalue\n",
        );

        let names: Vec<_> = bridge(&fs).load_all().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["SID", "PREF"]);
    }

    #[test]
    fn test_load_is_repeatable() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "A=1; Path=/\nB=2; Path=/\nA=3; Path=/\n");
        let mut b = bridge(&fs);
        assert_eq!(b.load_all(), b.load_all());
    }

    #[test]
    fn test_max_age_lines_load_the_same_every_time() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "A=1; Path=/; Max-Age=3600\nA=1; Path=/; Max-Age=3600\n");
        let mut b = bridge(&fs);

        let first = b.load_all();
        assert_eq!(first, b.load_all());
        assert_eq!(first[0].max_age, Some(3600));

        assert_eq!(b.compact().unwrap(), 1);
        assert_eq!(fs.contents(PATH).unwrap(), "A=1; Path=/; Max-Age=3600\n");
    }

    #[test]
    fn test_load_latest_last_occurrence_wins() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "A=1; Path=/\nB=2; Path=/\nA=3; Path=/\n");

        let latest = bridge(&fs).load_latest();
        let pairs: Vec<_> = latest.iter().map(|r| (r.name.as_str(), r.value.as_str())).collect();
        assert_eq!(pairs, [("B", "2"), ("A", "3")]);
    }

    #[test]
    fn test_network_cookie_is_appended() {
        let fs = MemoryFileSystem::new();
        let mut b = bridge(&fs);

        b.on_cookie_added(&sid("abc"), CookieOrigin::Network);

        let contents = fs.contents(PATH).unwrap();
        assert_eq!(contents, format!("{}\n", sid("abc").to_line()));
    }

    #[test]
    fn test_restored_cookie_is_not_appended() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, format!("{}\n", sid("abc").to_line()));
        let mut b = bridge(&fs);

        for record in b.load_all() {
            b.on_cookie_added(&record, CookieOrigin::Restored);
            b.on_cookie_added(&record, CookieOrigin::Network);
        }

        assert_eq!(fs.contents(PATH).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_identical_network_cookie_appended_once() {
        let fs = MemoryFileSystem::new();
        let mut b = bridge(&fs);

        b.on_cookie_added(&sid("abc"), CookieOrigin::Network);
        b.on_cookie_added(&sid("abc"), CookieOrigin::Network);
        b.on_cookie_added(&sid("def"), CookieOrigin::Network);

        let contents = fs.contents(PATH).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert_eq!(b.load_latest(), vec![sid("def")]);
    }

    #[test]
    fn test_append_failure_is_retried_later() {
        let fs = MemoryFileSystem::new();
        let mut b = bridge(&fs);

        fs.set_fail_writes(true);
        b.on_cookie_added(&sid("abc"), CookieOrigin::Network);
        assert!(fs.contents(PATH).is_none());
        assert!(b.try_append(&sid("abc")).is_err());

        fs.set_fail_writes(false);
        b.on_cookie_added(&sid("abc"), CookieOrigin::Network);
        assert_eq!(fs.contents(PATH).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_compact_rewrites_one_line_per_key() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "A=1; Path=/\nB=2; Path=/\ngarbage\nA=3; Path=/\n");
        let mut b = bridge(&fs);

        assert_eq!(b.compact().unwrap(), 2);
        assert_eq!(fs.contents(PATH).unwrap(), "B=2; Path=/\nA=3; Path=/\n");
        assert_eq!(b.persisted_count(), 2);
    }

    #[test]
    fn test_compact_missing_file_creates_nothing() {
        let fs = MemoryFileSystem::new();
        assert_eq!(bridge(&fs).compact().unwrap(), 0);
        assert!(!fs.exists(Path::new(PATH)));
    }

    #[test]
    fn test_compact_failure_keeps_file() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "A=1; Path=/\nA=2; Path=/\n");
        fs.set_fail_writes(true);

        assert!(bridge(&fs).compact().is_err());
        assert_eq!(fs.contents(PATH).unwrap(), "A=1; Path=/\nA=2; Path=/\n");
    }

    #[test]
    fn test_compact_unreadable_file_is_error() {
        let fs = MemoryFileSystem::new();
        fs.insert(PATH, "A=1; Path=/\n");
        fs.set_fail_reads(true);
        assert!(bridge(&fs).compact().is_err());
    }
}
