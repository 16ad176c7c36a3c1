//! `kiln shader`, `kiln texture`, `kiln cubemap`: one-off build requests.
//!
//! Each command resolves the project for its tools and output directories,
//! requests a single asset, and drains the queue.

use std::path::Path;

use kiln_build::{shader_output_path, texture_output_path, ResourceBuilder};
use kiln_common::ShaderStage;

use crate::build::print_report;
use crate::pipeline::load_project;
use crate::{CubemapArgs, GlobalArgs, ReportFormat, ShaderArgs, TextureArgs};

/// Runs the `kiln shader` command.
pub fn run_shader(args: &ShaderArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let input = std::path::absolute(&args.input)?;
    let stage = match args.stage {
        Some(stage) => stage.into(),
        None => infer_stage(&input).ok_or_else(|| {
            format!(
                "cannot infer the stage of {}; pass --stage",
                input.display()
            )
        })?,
    };
    let variant = args.variant.as_deref();
    let output = match &args.output {
        Some(output) => std::path::absolute(output)?,
        None => shader_output_path(&project.paths.shader_output_dir, &input, variant),
    };

    let mut builder = project.builder(args.force)?;
    let queued = builder.request_shader_build(stage, &input, &output, variant);
    finish(&mut builder, queued, &input, global)
}

/// Runs the `kiln texture` command.
pub fn run_texture(
    args: &TextureArgs,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let input = std::path::absolute(&args.input)?;
    let output = match &args.output {
        Some(output) => std::path::absolute(output)?,
        None => texture_output_path(&project.paths.texture_output_dir, &input),
    };

    let mut builder = project.builder(args.force)?;
    let queued = builder.request_texture_build(args.role.into(), &input, &output);
    finish(&mut builder, queued, &input, global)
}

/// Runs the `kiln cubemap` command.
pub fn run_cubemap(
    args: &CubemapArgs,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let input = std::path::absolute(&args.input)?;
    let output = std::path::absolute(&args.output)?;

    let mut builder = project.builder(args.force)?;
    let queued = builder.request_cubemap_build(&input, &output);
    finish(&mut builder, queued, &input, global)
}

fn finish(
    builder: &mut ResourceBuilder,
    queued: bool,
    input: &Path,
    global: &GlobalArgs,
) -> Result<i32, Box<dyn std::error::Error>> {
    if !queued {
        if !input.exists() {
            return Err(format!("{} does not exist", input.display()).into());
        }
        if !global.quiet {
            eprintln!("   Up to date {}", input.display());
        }
        return Ok(0);
    }
    let report = builder.drain()?;
    print_report(&report, ReportFormat::Text, global);
    Ok(if report.is_success() { 0 } else { 1 })
}

/// Infers a shader stage from the `vs_`, `fs_` or `cs_` file name prefix.
pub fn infer_stage(input: &Path) -> Option<ShaderStage> {
    let name = input.file_name()?.to_str()?;
    if name.starts_with("vs_") {
        Some(ShaderStage::Vertex)
    } else if name.starts_with("fs_") {
        Some(ShaderStage::Fragment)
    } else if name.starts_with("cs_") {
        Some(ShaderStage::Compute)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_from_prefix() {
        assert_eq!(
            infer_stage(Path::new("/s/vs_pbr.sc")),
            Some(ShaderStage::Vertex)
        );
        assert_eq!(
            infer_stage(Path::new("fs_terrain.sc")),
            Some(ShaderStage::Fragment)
        );
        assert_eq!(
            infer_stage(Path::new("/s/cs_cull.sc")),
            Some(ShaderStage::Compute)
        );
        assert_eq!(infer_stage(Path::new("/s/common.sh")), None);
    }
}
