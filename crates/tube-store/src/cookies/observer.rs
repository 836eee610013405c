//! # Jar Observer
//!
//! The web view can list its cookies but does not announce additions.
//! `JarObserver` turns successive snapshots of the jar into the additions
//! the bridge needs.
//!
//! ```text
//! snapshot 1: { SID=a, PREF=x }          observe → [SID=a, PREF=x]
//! snapshot 2: { SID=a, PREF=y }          observe → [PREF=y]
//! snapshot 3: { SID=a }                  observe → []        (PREF forgotten)
//! snapshot 4: { SID=a, PREF=y }          observe → [PREF=y]
//! ```

use std::collections::HashMap;
use tube_core::{CookieKey, CookieRecord};

/// Remembers the last snapshot of the jar.
#[derive(Debug, Default)]
pub struct JarObserver {
    known: HashMap<CookieKey, CookieRecord>,
}

impl JarObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks cookies injected at startup as already seen.
    pub fn mark_restored<'a>(&mut self, records: impl IntoIterator<Item = &'a CookieRecord>) {
        for record in records {
            self.known.insert(record.key(), record.clone());
        }
    }

    /// Compares `snapshot` with the previous one.
    ///
    /// Returns the records whose key is new or whose content changed, in
    /// snapshot order. Keys missing from `snapshot` are forgotten.
    pub fn observe(&mut self, snapshot: impl IntoIterator<Item = CookieRecord>) -> Vec<CookieRecord> {
        let mut next = HashMap::with_capacity(self.known.len());
        let mut added = Vec::new();

        for record in snapshot {
            let key = record.key();
            if self.known.get(&key) != Some(&record) {
                added.push(record.clone());
            }
            next.insert(key, record);
        }

        self.known = next;
        added
    }

    /// Number of cookies in the last snapshot.
    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}
