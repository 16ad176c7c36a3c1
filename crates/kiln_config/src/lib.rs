//! Parsing and validation of `kiln.toml` project configuration files.
//!
//! This crate reads the project configuration and produces a strongly-typed
//! [`KilnConfig`] describing tool locations, output directories, the stamp
//! cache, the skip policy, and the asset manifest built by `kiln build`.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_path, resolve_paths, ResolvedPaths};
pub use types::*;
