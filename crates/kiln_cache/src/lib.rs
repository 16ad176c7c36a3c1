//! Persistent modification-time cache for incremental resource builds.
//!
//! This crate records the last-seen modification stamp of every source asset,
//! classifies (input, output) pairs as stale or stable, and persists the
//! committed stamps atomically between runs.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod format;
pub mod location;
pub mod staleness;
pub mod table;

pub use cache::BuildCache;
pub use error::CacheError;
pub use format::{BinaryFormat, CacheFormat, TextFormat};
pub use location::{cache_path_in, default_cache_path, CACHE_FILE_NAME};
pub use staleness::StalenessChecker;
pub use table::{StampMap, StampTable};
