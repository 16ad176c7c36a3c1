//! Error types for cache operations.

use std::path::PathBuf;

/// Errors that can occur during cache operations.
///
/// Cache reads are fail-safe at the [`BuildCache`](crate::BuildCache) level:
/// a load error degrades to an empty cache and every asset is rebuilt. This
/// enum carries the details for logging and for callers that persist
/// explicitly.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing the cache file.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A record in a text cache file could not be parsed.
    #[error("malformed cache record at {path}:{line}: {reason}")]
    Parse {
        /// The cache file path.
        path: PathBuf,
        /// One-based line number of the bad record.
        line: usize,
        /// Description of the parse failure.
        reason: String,
    },

    /// A binary cache file has an invalid or missing header.
    #[error("invalid cache header in {path}: {reason}")]
    InvalidHeader {
        /// The cache file path.
        path: PathBuf,
        /// Description of the header problem.
        reason: String,
    },

    /// The stored checksum does not match the computed checksum of the records.
    #[error("checksum mismatch in {path}: expected {expected:016x}, got {actual:016x}")]
    ChecksumMismatch {
        /// The cache file path.
        path: PathBuf,
        /// The checksum recorded in the header.
        expected: u64,
        /// The checksum computed from the payload.
        actual: u64,
    },

    /// The binary cache format version does not match the current version.
    #[error("version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The cache file path.
        path: PathBuf,
        /// The expected format version.
        expected: u32,
        /// The format version found in the file.
        actual: u32,
    },

    /// A serialization or deserialization error occurred.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The platform has no per-user application data directory.
    #[error("cannot locate the application data directory")]
    NoDataDir,
}
