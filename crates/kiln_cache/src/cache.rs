//! High-level stamp cache orchestrator.
//!
//! The `BuildCache` type ties together the stamp table, the staleness checker,
//! and a cache file format into a single interface for the resource builder.
//! It handles loading or cold-starting the cache, classifying inputs,
//! committing pending stamps, and atomic persistence.

use std::io::Write;
use std::path::{Path, PathBuf};

use kiln_common::BuildStatus;
use tracing::{debug, info, warn};

use crate::error::CacheError;
use crate::format::{CacheFormat, TextFormat};
use crate::staleness::StalenessChecker;
use crate::table::{StampMap, StampTable};

/// Persistent modification-time cache for incremental resource builds.
///
/// Loading is fail-safe: a missing or unreadable cache file yields an empty
/// table, so every input is classified as added and rebuilt.
pub struct BuildCache {
    /// Location of the cache file.
    path: PathBuf,

    /// Committed and pending stamps.
    table: StampTable,

    /// Encoding used for the cache file.
    format: Box<dyn CacheFormat>,

    /// Set when committed stamps were removed, so the shrunken table reaches
    /// disk even if nothing is pending.
    dirty: bool,
}

impl BuildCache {
    /// Loads the cache at `path` in the text format, or starts cold.
    pub fn load_or_create(path: &Path) -> Self {
        Self::load_or_create_with(path, Box::new(TextFormat))
    }

    /// Loads the cache at `path` with the given format, or starts cold.
    pub fn load_or_create_with(path: &Path, format: Box<dyn CacheFormat>) -> Self {
        let committed = if path.exists() {
            match Self::read(path, format.as_ref()) {
                Ok(entries) => {
                    info!(
                        "read {} cached timestamps from {}",
                        entries.len(),
                        path.display()
                    );
                    entries
                }
                Err(e) => {
                    warn!("{e}; every input will be rebuilt");
                    StampMap::new()
                }
            }
        } else {
            info!("modify time cache {} does not exist", path.display());
            warn!("every input will be built from scratch");
            StampMap::new()
        };

        Self {
            path: path.to_path_buf(),
            table: StampTable::from_committed(committed),
            format,
            dirty: false,
        }
    }

    fn read(path: &Path, format: &dyn CacheFormat) -> Result<StampMap, CacheError> {
        let bytes = std::fs::read(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        format.decode(path, &bytes)
    }

    /// Returns the cache file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the in-memory stamp table.
    pub fn table(&self) -> &StampTable {
        &self.table
    }

    /// Classifies `input` → `output`, recording changed inputs as pending.
    ///
    /// See [`StalenessChecker::check`] for the evaluation order.
    pub fn check_status(&mut self, input: &Path, output: &Path) -> BuildStatus {
        StalenessChecker::check(&mut self.table, input, output)
    }

    /// Forgets every stamp for `input`, so the next check classifies it as
    /// [`BuildStatus::InputAdded`] and it is rebuilt.
    ///
    /// Used when a tool failed and the output on disk cannot be trusted.
    /// Dropping a committed stamp marks the cache dirty so the removal is
    /// persisted by the next save.
    pub fn invalidate(&mut self, input: &Path) {
        if self.table.forget(input) {
            debug!("invalidated cached timestamp of {}", input.display());
            self.dirty = true;
        }
    }

    /// Returns `true` if committed stamps were removed since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns `true` if there are stamps waiting to be committed.
    pub fn has_pending(&self) -> bool {
        self.table.has_pending()
    }

    /// Merges pending stamps into the committed table and writes the file.
    ///
    /// Does nothing (and returns `Ok(0)`) when nothing is pending and no
    /// committed stamp was removed, so an unchanged cache is never rewritten. The
    /// in-memory merge happens even if the write fails.
    pub fn commit_and_save(&mut self) -> Result<usize, CacheError> {
        if !self.table.has_pending() && !self.dirty {
            return Ok(0);
        }
        let merged = self.table.commit_pending();
        self.save()?;
        Ok(merged)
    }

    /// Writes the committed table to disk, replacing the previous file.
    ///
    /// The bytes go to a temporary file in the same directory which is then
    /// renamed over the cache, so a crash mid-write leaves the old file intact.
    pub fn save(&mut self) -> Result<(), CacheError> {
        let bytes = self.format.encode(self.table.committed_entries())?;
        info!("writing modify time cache to {}", self.path.display());
        write_atomic(&self.path, &bytes)?;
        self.dirty = false;
        Ok(())
    }

    /// Forgets every committed and pending stamp.
    ///
    /// The next [`BuildCache::commit_and_save`] rewrites the file even if no
    /// new stamps were observed.
    pub fn clear(&mut self) {
        debug!("clearing modify time cache");
        self.table.clear();
        self.dirty = true;
    }

    /// Deletes the cache file. Returns `false` if it did not exist.
    pub fn delete_file(&self) -> Result<bool, CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!("deleted modify time cache {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("cannot delete {}: file does not exist", self.path.display());
                Ok(false)
            }
            Err(e) => Err(CacheError::Io {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// Writes `bytes` to `path` through a temporary sibling file and a rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_err = |source: std::io::Error| CacheError::Io {
        path: path.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(|e| CacheError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
