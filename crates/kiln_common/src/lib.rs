//! Shared foundational types used across the Kiln resource pipeline.
//!
//! This crate provides file modification stamps, build status classification,
//! the skip policy, and the asset role enums that select external tool flags.

#![warn(missing_docs)]

pub mod asset;
pub mod stamp;
pub mod status;

pub use asset::{ShaderStage, TextureRole};
pub use stamp::{FileStamp, ParseStampError};
pub use status::{BuildStatus, SkipPolicy};
