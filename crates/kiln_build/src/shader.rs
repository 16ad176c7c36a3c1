//! Shader compiler command construction.

use std::path::{Path, PathBuf};

use kiln_common::ShaderStage;

use crate::task::{path_arg, BuildTask};

/// Varying definition file expected next to every shader source.
pub const VARYING_DEF_FILE: &str = "varying.def.sc";

/// Returns the `--type` and `-p` tokens for a stage.
pub fn stage_flags(stage: ShaderStage) -> (&'static str, &'static str) {
    match stage {
        ShaderStage::Vertex => ("v", "vs_5_0"),
        ShaderStage::Fragment => ("f", "ps_5_0"),
        ShaderStage::Compute => ("c", "cs_5_0"),
    }
}

/// Returns the varying definition file in the same directory as `input`.
pub fn varying_def_path(input: &Path) -> PathBuf {
    input
        .parent()
        .map_or_else(|| PathBuf::from(VARYING_DEF_FILE), |dir| dir.join(VARYING_DEF_FILE))
}

/// Builds the compiler invocation for one shader permutation.
///
/// `--define <variant>` is only passed for a non-empty variant. The task is
/// synchronous: callers load the binary right after draining.
pub fn shader_task(
    compiler: &Path,
    platform: &str,
    stage: ShaderStage,
    input: &Path,
    output: &Path,
    variant: Option<&str>,
) -> BuildTask {
    let (kind, profile) = stage_flags(stage);
    let mut args = vec![
        "-f".to_string(),
        path_arg(input),
        "--varyingdef".to_string(),
        path_arg(&varying_def_path(input)),
        "-o".to_string(),
        path_arg(output),
        "--platform".to_string(),
        platform.to_string(),
        "-O".to_string(),
        "3".to_string(),
        "--type".to_string(),
        kind.to_string(),
        "-p".to_string(),
        profile.to_string(),
    ];
    if let Some(variant) = variant.filter(|v| !v.is_empty()) {
        args.push("--define".to_string());
        args.push(variant.to_string());
    }
    BuildTask::new(compiler, args, input, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_command_line() {
        let task = shader_task(
            Path::new("/tools/shaderc"),
            "windows",
            ShaderStage::Vertex,
            Path::new("/assets/shaders/vs_pbr.sc"),
            Path::new("/build/shaders/vs_pbr.bin"),
            None,
        );
        assert_eq!(task.executable(), Path::new("/tools/shaderc"));
        assert_eq!(
            task.args(),
            [
                "-f",
                "/assets/shaders/vs_pbr.sc",
                "--varyingdef",
                "/assets/shaders/varying.def.sc",
                "-o",
                "/build/shaders/vs_pbr.bin",
                "--platform",
                "windows",
                "-O",
                "3",
                "--type",
                "v",
                "-p",
                "vs_5_0",
            ]
        );
        assert_eq!(task.input(), Path::new("/assets/shaders/vs_pbr.sc"));
    }

    #[test]
    fn stage_tokens() {
        assert_eq!(stage_flags(ShaderStage::Vertex), ("v", "vs_5_0"));
        assert_eq!(stage_flags(ShaderStage::Fragment), ("f", "ps_5_0"));
        assert_eq!(stage_flags(ShaderStage::Compute), ("c", "cs_5_0"));
    }

    #[test]
    fn variant_appends_define() {
        let task = shader_task(
            Path::new("/tools/shaderc"),
            "linux",
            ShaderStage::Fragment,
            Path::new("/s/fs_pbr.sc"),
            Path::new("/o/fs_pbr_ALBEDO.bin"),
            Some("ALBEDO;NORMAL_MAP"),
        );
        let args = task.args();
        assert_eq!(&args[args.len() - 2..], ["--define", "ALBEDO;NORMAL_MAP"]);
        assert!(args.contains(&"ps_5_0".to_string()));
    }

    #[test]
    fn empty_variant_adds_nothing() {
        let task = shader_task(
            Path::new("/tools/shaderc"),
            "linux",
            ShaderStage::Compute,
            Path::new("/s/cs_cull.sc"),
            Path::new("/o/cs_cull.bin"),
            Some(""),
        );
        assert!(!task.args().iter().any(|a| a == "--define"));
        assert_eq!(task.args().last().map(String::as_str), Some("cs_5_0"));
    }

    #[test]
    fn varying_def_is_sibling() {
        assert_eq!(
            varying_def_path(Path::new("/a/b/vs_x.sc")),
            PathBuf::from("/a/b/varying.def.sc")
        );
    }
}
