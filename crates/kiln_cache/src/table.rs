//! In-memory timestamp table with a committed and a pending layer.
//!
//! The committed layer is what was trusted at the end of the last fully
//! drained build. Timestamps observed during the current run go to the
//! pending layer and only move across in [`StampTable::commit_pending`], so a
//! run that dies half way never poisons previously trusted data.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use kiln_common::FileStamp;

/// Mapping from absolute input path to its last-seen modification stamp.
pub type StampMap = HashMap<PathBuf, FileStamp>;

/// Committed and pending input timestamps.
#[derive(Debug, Clone, Default)]
pub struct StampTable {
    /// Stamps trusted from the last successful full drain.
    committed: StampMap,

    /// Stamps observed this run, awaiting a full drain.
    pending: StampMap,
}

impl StampTable {
    /// Creates an empty table (cold start).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table whose committed layer is `committed`.
    pub fn from_committed(committed: StampMap) -> Self {
        Self {
            committed,
            pending: StampMap::new(),
        }
    }

    /// Returns the committed stamp for `path`, if any.
    pub fn committed(&self, path: &Path) -> Option<FileStamp> {
        self.committed.get(path).copied()
    }

    /// Returns the pending stamp for `path`, if any.
    pub fn pending(&self, path: &Path) -> Option<FileStamp> {
        self.pending.get(path).copied()
    }

    /// Records a newly observed stamp for `path` in the pending layer.
    pub fn record_pending(&mut self, path: &Path, stamp: FileStamp) {
        self.pending.insert(path.to_path_buf(), stamp);
    }

    /// Removes `path` from both layers, so its next check reports
    /// [`BuildStatus::InputAdded`](kiln_common::BuildStatus::InputAdded).
    ///
    /// Returns `true` if a committed entry was removed, meaning the persisted
    /// table no longer matches memory.
    pub fn forget(&mut self, path: &Path) -> bool {
        self.pending.remove(path);
        self.committed.remove(path).is_some()
    }

    /// Returns `true` if at least one stamp is waiting to be committed.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Merges the pending layer into the committed layer and clears it.
    ///
    /// Returns the number of entries merged.
    pub fn commit_pending(&mut self) -> usize {
        let count = self.pending.len();
        self.committed.extend(self.pending.drain());
        count
    }

    /// Forgets every committed and pending stamp.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.pending.clear();
    }

    /// Returns the committed layer.
    pub fn committed_entries(&self) -> &StampMap {
        &self.committed
    }

    /// Returns the pending layer.
    pub fn pending_entries(&self) -> &StampMap {
        &self.pending
    }
}
