//! Cubemap filter command construction.

use std::path::Path;

use crate::task::{path_arg, BuildTask};

/// Number of radiance mip levels generated.
pub const MIP_COUNT: u32 = 7;

/// Builds the filter invocation for an environment map.
///
/// Every cubemap uses the same single output slot, mip count, gloss
/// scale/bias, and `warp` edge fixup.
pub fn cubemap_task(filter: &Path, input: &Path, output: &Path) -> BuildTask {
    let args = vec![
        "--input".to_string(),
        path_arg(input),
        "--outputNum".to_string(),
        "1".to_string(),
        "--output0".to_string(),
        path_arg(output),
        "--excludeBase".to_string(),
        "true".to_string(),
        "--mipCount".to_string(),
        MIP_COUNT.to_string(),
        "--glossScale".to_string(),
        "10".to_string(),
        "--glossBias".to_string(),
        "2".to_string(),
        "--edgeFixup".to_string(),
        "warp".to_string(),
    ];
    BuildTask::new(filter, args, input, output)
}
