//! Resolved locations of the external compiler tools.

use std::path::{Path, PathBuf};

use kiln_config::ToolsConfig;

/// Full paths of the three tools the pipeline drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Shader compiler (`shaderc`).
    pub shader_compiler: PathBuf,
    /// Texture compressor (`texturec`).
    pub texture_compiler: PathBuf,
    /// Cubemap radiance filter (`cmft`).
    pub cubemap_filter: PathBuf,
}

impl ToolPaths {
    /// Resolves the configured tool names inside `dir`.
    pub fn in_dir(dir: &Path, tools: &ToolsConfig) -> Self {
        Self {
            shader_compiler: executable(dir, &tools.shader_compiler),
            texture_compiler: executable(dir, &tools.texture_compiler),
            cubemap_filter: executable(dir, &tools.cubemap_filter),
        }
    }
}

/// Returns `<dir>/<name>` with the platform executable suffix appended.
fn executable(dir: &Path, name: &str) -> PathBuf {
    let suffix = std::env::consts::EXE_SUFFIX;
    if suffix.is_empty() || name.ends_with(suffix) {
        dir.join(name)
    } else {
        dir.join(format!("{name}{suffix}"))
    }
}
