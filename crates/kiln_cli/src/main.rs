//! Kiln CLI: the command-line front end of the incremental resource builder.
//!
//! Provides `kiln build` for building every asset listed in `kiln.toml`,
//! `kiln shader`, `kiln texture` and `kiln cubemap` for one-off requests,
//! `kiln status` for classifying assets without building them, and
//! `kiln cache` for inspecting and resetting the stamp cache.

#![warn(missing_docs)]

mod asset;
mod build;
mod cache;
mod pipeline;
mod status;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use kiln_common::{ShaderStage, TextureRole};
use tracing::Level;

/// Kiln: incremental shader, texture, and cubemap builds.
#[derive(Parser, Debug)]
#[command(name = "kiln", version, about = "Kiln Resource Builder")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `kiln.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build every stale asset listed in `kiln.toml`.
    Build(BuildArgs),
    /// Compile one shader.
    Shader(ShaderArgs),
    /// Compress one texture.
    Texture(TextureArgs),
    /// Filter one environment map.
    Cubemap(CubemapArgs),
    /// Show which manifest assets would be rebuilt.
    Status(StatusArgs),
    /// Inspect or reset the modification-time cache.
    Cache {
        /// The cache operation.
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Arguments for the `kiln build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Rebuild every asset whose input exists, even if it is up to date.
    #[arg(long)]
    pub force: bool,

    /// Output format for the build report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `kiln shader` subcommand.
#[derive(Parser, Debug)]
pub struct ShaderArgs {
    /// Shader source file.
    pub input: String,

    /// Pipeline stage (inferred from a `vs_`, `fs_` or `cs_` prefix if omitted).
    #[arg(short, long, value_enum)]
    pub stage: Option<StageArg>,

    /// Uber option define selecting a permutation.
    #[arg(long)]
    pub variant: Option<String>,

    /// Output binary (default: `<shader.output_dir>/<stem>[_<variant>].bin`).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Rebuild even if the input is up to date.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `kiln texture` subcommand.
#[derive(Parser, Debug)]
pub struct TextureArgs {
    /// Source image.
    pub input: String,

    /// Material slot the texture fills.
    #[arg(short, long, value_enum, default_value_t = RoleArg::BaseColor)]
    pub role: RoleArg,

    /// Output texture (default: `<texture.output_dir>/<stem>.dds`).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Rebuild even if the input is up to date.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `kiln cubemap` subcommand.
#[derive(Parser, Debug)]
pub struct CubemapArgs {
    /// Source environment map.
    pub input: String,

    /// Filtered radiance cubemap.
    #[arg(short, long)]
    pub output: String,

    /// Rebuild even if the input is up to date.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `kiln status` subcommand.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Operations on the modification-time cache.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAction {
    /// Print the cache file location.
    Path,
    /// Forget every cached timestamp (rewrites the file empty).
    Clear,
    /// Delete the cache file.
    Delete,
}

/// Shader stage selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StageArg {
    /// Vertex shader.
    Vertex,
    /// Fragment shader.
    Fragment,
    /// Compute shader.
    Compute,
}

impl From<StageArg> for ShaderStage {
    fn from(stage: StageArg) -> Self {
        match stage {
            StageArg::Vertex => ShaderStage::Vertex,
            StageArg::Fragment => ShaderStage::Fragment,
            StageArg::Compute => ShaderStage::Compute,
        }
    }
}

/// Texture role selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    /// Albedo; the only display-encoded role.
    #[value(name = "base_color")]
    BaseColor,
    /// Tangent-space normal map.
    Normal,
    /// Ambient occlusion.
    Occlusion,
    /// Roughness.
    Roughness,
    /// Metalness.
    Metallic,
    /// Emissive color.
    Emissive,
    /// Height / elevation.
    Elevation,
}

impl From<RoleArg> for TextureRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::BaseColor => TextureRole::BaseColor,
            RoleArg::Normal => TextureRole::Normal,
            RoleArg::Occlusion => TextureRole::Occlusion,
            RoleArg::Roughness => TextureRole::Roughness,
            RoleArg::Metallic => TextureRole::Metallic,
            RoleArg::Emissive => TextureRole::Emissive,
            RoleArg::Elevation => TextureRole::Elevation,
        }
    }
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// The most detailed log level to emit.
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(global.log_level())
        .with_ansi(global.color)
        .with_target(false)
        .without_time()
        .init();

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Shader(ref args) => asset::run_shader(args, &global),
        Command::Texture(ref args) => asset::run_texture(args, &global),
        Command::Cubemap(ref args) => asset::run_cubemap(args, &global),
        Command::Status(ref args) => status::run(args, &global),
        Command::Cache { action } => cache::run(action, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
