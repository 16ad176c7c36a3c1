//! Texture compressor command construction.

use std::path::Path;

use kiln_common::TextureRole;

use crate::task::{path_arg, BuildTask};

/// Block compression format requested for every texture.
pub const TEXTURE_FORMAT: &str = "BC3";

/// Largest edge length the compressor may emit.
pub const MAX_DIMENSION: u32 = 1024;

/// Builds the compressor invocation for a texture in the given role.
///
/// Normal maps get `--normalmap`; every other role except base color gets
/// `--linear`. A texture never receives both.
pub fn texture_task(compiler: &Path, role: TextureRole, input: &Path, output: &Path) -> BuildTask {
    let mut args = vec![
        "-f".to_string(),
        path_arg(input),
        "-o".to_string(),
        path_arg(output),
        "-t".to_string(),
        TEXTURE_FORMAT.to_string(),
        "--mips".to_string(),
        "-q".to_string(),
        "fastest".to_string(),
        "--max".to_string(),
        MAX_DIMENSION.to_string(),
    ];
    if role == TextureRole::Normal {
        args.push("--normalmap".to_string());
    } else if !role.is_display_encoded() {
        args.push("--linear".to_string());
    }
    BuildTask::new(compiler, args, input, output)
}
