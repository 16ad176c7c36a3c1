//! Incremental build orchestration for engine resources.
//!
//! Translates shader, texture, and cubemap build requests into external tool
//! invocations, skips inputs the stamp cache shows as unchanged, runs the
//! queued tools in submission order, and commits the observed stamps once the
//! queue has drained.

#![warn(missing_docs)]

pub mod builder;
pub mod cubemap;
pub mod error;
pub mod paths;
pub mod plan;
pub mod queue;
pub mod runner;
pub mod shader;
pub mod task;
pub mod texture;
pub mod tools;

pub use builder::{open_cache, BuilderOptions, DrainReport, FailedTask, ResourceBuilder};
pub use error::BuildError;
pub use paths::{shader_output_path, texture_output_path};
pub use plan::{AssetRequest, BuildPlan};
pub use queue::TaskQueue;
pub use runner::{ProcessRunner, RecordingRunner, SystemRunner, TaskOutcome};
pub use task::BuildTask;
pub use tools::ToolPaths;
