//! `kiln build`: build every stale asset in the project manifest.
//!
//! 1. Find project root (walk up looking for `kiln.toml`)
//! 2. Load config and expand the manifest into requests
//! 3. Request each asset (stale ones are queued)
//! 4. Drain the queue and report

use kiln_build::{BuildPlan, DrainReport, ResourceBuilder};

use crate::pipeline::load_project;
use crate::{BuildArgs, GlobalArgs, ReportFormat};

/// Runs the `kiln build` command.
///
/// Returns exit code 0 if every tool succeeded, 1 if any failed.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let plan = BuildPlan::from_config(&project.config, &project.paths);

    if plan.is_empty() {
        if !global.quiet {
            eprintln!("warning: kiln.toml lists no shaders, textures, or cubemaps");
        }
        return Ok(0);
    }

    let mut builder = project.builder(args.force)?;
    let queued = request_all(&mut builder, &plan);
    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Building {queued} of {} assets for {}",
            plan.len(),
            project.config.engine.name
        );
    }

    let report = builder.drain()?;
    print_report(&report, args.format, global);
    Ok(if report.is_success() { 0 } else { 1 })
}

/// Requests every asset in `plan`, returning how many were queued.
pub fn request_all<R: kiln_build::ProcessRunner>(
    builder: &mut ResourceBuilder<R>,
    plan: &BuildPlan,
) -> usize {
    plan.requests()
        .iter()
        .filter(|request| builder.request(request))
        .count()
}

/// Prints a drain report in the requested format.
pub fn print_report(report: &DrainReport, format: ReportFormat, global: &GlobalArgs) {
    match format {
        ReportFormat::Text => {
            if global.quiet {
                return;
            }
            for failed in &report.failed {
                let outcome = failed
                    .exit_code
                    .map_or_else(|| "terminated".to_string(), |c| format!("exit code {c}"));
                eprintln!("   Failed {} ({outcome})", failed.input.display());
            }
            eprintln!(
                "   Result: {} built, {} failed, {} timestamp(s) cached",
                report.executed - report.failed.len(),
                report.failed.len(),
                report.committed
            );
        }
        ReportFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("error: cannot serialize report: {e}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_build::{BuilderOptions, RecordingRunner};
    use kiln_config::{load_config_from_str, resolve_paths};

    #[test]
    fn only_stale_assets_are_queued() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("shaders")).unwrap();
        std::fs::write(dir.path().join("shaders/vs_pbr.sc"), "src").unwrap();
        let toml = r#"
[cache]
path = "stamps.txt"

[[shaders]]
input = "shaders/vs_pbr.sc"
stage = "vertex"

[[textures]]
input = "textures/missing.png"
role = "normal"
"#;
        let config = load_config_from_str(toml).unwrap();
        let paths = resolve_paths(&config, dir.path());
        let plan = BuildPlan::from_config(&config, &paths);
        let cache = kiln_build::open_cache(&config, &paths).unwrap();
        let mut builder = ResourceBuilder::with_runner(
            cache,
            BuilderOptions::from_config(&config, &paths),
            RecordingRunner::new(),
        );

        assert_eq!(request_all(&mut builder, &plan), 1);
        let task = builder.pending_tasks().iter().next().unwrap();
        assert_eq!(
            task.input(),
            dir.path().join("shaders/vs_pbr.sc").as_path()
        );
        assert_eq!(
            task.output(),
            dir.path().join("build/shaders/vs_pbr.bin").as_path()
        );
    }
}
