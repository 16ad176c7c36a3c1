//! Error types for task execution.

use std::path::PathBuf;

use kiln_cache::CacheError;

use crate::runner::TaskOutcome;

/// Errors surfaced by [`ResourceBuilder::drain`](crate::ResourceBuilder::drain)
/// and the administrative cache operations.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The external tool could not be started at all.
    #[error("failed to spawn {executable}: {source}")]
    Spawn {
        /// The executable that failed to start.
        executable: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A tool finished unsuccessfully and the build is configured to stop.
    #[error("{executable} failed to build {input}: {outcome}")]
    ToolFailed {
        /// The executable that failed.
        executable: PathBuf,
        /// The source asset it was building.
        input: PathBuf,
        /// How the process ended.
        outcome: TaskOutcome,
    },

    /// The stamp cache could not be modified on disk.
    #[error(transparent)]
    Cache(#[from] CacheError),
}
