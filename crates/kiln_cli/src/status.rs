//! `kiln status`: classify every manifest asset without building.
//!
//! The stamp cache is opened read-only in effect: observations are never
//! committed, so running `status` does not change what `build` will do.

use std::path::PathBuf;

use kiln_build::{AssetRequest, BuildPlan};
use kiln_cache::BuildCache;
use kiln_common::{BuildStatus, SkipPolicy};
use serde::Serialize;

use crate::pipeline::load_project;
use crate::{GlobalArgs, ReportFormat, StatusArgs};

/// One row of the status report.
#[derive(Debug, Serialize)]
pub struct StatusEntry {
    /// Asset kind (`shader`, `texture`, `cubemap`).
    pub kind: &'static str,
    /// Source asset.
    pub input: PathBuf,
    /// Artifact.
    pub output: PathBuf,
    /// Uber option, for shaders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Staleness classification.
    pub status: BuildStatus,
    /// Whether `kiln build` would run a tool for this asset.
    pub would_build: bool,
}

/// Runs the `kiln status` command.
///
/// Returns exit code 1 if any listed input is missing, 0 otherwise.
pub fn run(args: &StatusArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let plan = BuildPlan::from_config(&project.config, &project.paths);
    let mut cache = project.open_cache()?;
    let entries = classify(&mut cache, &plan, &project.config.build.skip);

    match args.format {
        ReportFormat::Text => {
            for entry in &entries {
                let marker = if entry.would_build { "*" } else { " " };
                println!(
                    "{marker} {:<14} {:<8} {}",
                    entry.status.name(),
                    entry.kind,
                    entry.input.display()
                );
            }
            if !global.quiet {
                let stale = entries.iter().filter(|e| e.would_build).count();
                eprintln!("   {stale} of {} assets would be built", entries.len());
            }
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    let missing = entries
        .iter()
        .any(|e| e.status == BuildStatus::InputMissing);
    Ok(if missing { 1 } else { 0 })
}

/// Classifies every request against `cache` under `skip`.
pub fn classify(cache: &mut BuildCache, plan: &BuildPlan, skip: &SkipPolicy) -> Vec<StatusEntry> {
    plan.requests()
        .iter()
        .map(|request| {
            let status = cache.check_status(request.input(), request.output());
            let variant = match request {
                AssetRequest::Shader { variant, .. } => variant.clone(),
                _ => None,
            };
            StatusEntry {
                kind: request.kind(),
                input: request.input().to_path_buf(),
                output: request.output().to_path_buf(),
                variant,
                status,
                would_build: !skip.skips(status),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_config::{load_config_from_str, resolve_paths};

    #[test]
    fn classify_reports_each_request() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vs_a.sc"), "src").unwrap();
        let toml = r#"
[cache]
path = "stamps.txt"

[[shaders]]
input = "vs_a.sc"
stage = "vertex"
variants = ["", "SKINNED"]

[[cubemaps]]
input = "sky.dds"
output = "sky_r.dds"
"#;
        let config = load_config_from_str(toml).unwrap();
        let paths = resolve_paths(&config, dir.path());
        let plan = BuildPlan::from_config(&config, &paths);
        let mut cache = kiln_build::open_cache(&config, &paths).unwrap();

        let entries = classify(&mut cache, &plan, &config.build.skip);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].status, BuildStatus::InputAdded);
        assert_eq!(entries[1].status, BuildStatus::InputAdded);
        assert_eq!(entries[1].variant.as_deref(), Some("SKINNED"));
        assert!(entries[0].would_build);
        assert_eq!(entries[2].status, BuildStatus::InputMissing);
        assert!(!entries[2].would_build);

        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(json[0]["status"], "input_added");
        assert!(json[0].get("variant").is_none());
        assert!(!dir.path().join("stamps.txt").exists());
    }
}
