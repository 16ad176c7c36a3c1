//! Process execution behind a swappable interface.
//!
//! [`SystemRunner`] spawns real tools. [`RecordingRunner`] records every task
//! instead and answers with scripted outcomes, which is what the tests and
//! dry runs use.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::task::BuildTask;

/// How a task's process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The process exited with this code.
    Exited(i32),
    /// The process was killed before producing an exit code.
    Terminated,
}

impl TaskOutcome {
    /// Returns `true` for exit code zero.
    pub fn succeeded(self) -> bool {
        self == TaskOutcome::Exited(0)
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskOutcome::Exited(code) => write!(f, "exit code {code}"),
            TaskOutcome::Terminated => f.write_str("terminated by signal"),
        }
    }
}

/// Runs one build task to completion.
pub trait ProcessRunner {
    /// Executes `task` and waits for it to exit. An `Err` means the process
    /// could not be started.
    fn run(&mut self, task: &BuildTask) -> std::io::Result<TaskOutcome>;
}

/// Spawns tasks as operating-system processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&mut self, task: &BuildTask) -> std::io::Result<TaskOutcome> {
        let status = Command::new(task.executable())
            .args(task.args())
            .spawn()?
            .wait()?;
        Ok(status
            .code()
            .map_or(TaskOutcome::Terminated, TaskOutcome::Exited))
    }
}

/// Test double that records tasks instead of spawning them.
///
/// Every task succeeds unless scripted otherwise with
/// [`RecordingRunner::fail_input`] or [`RecordingRunner::refuse_spawn`].
#[derive(Debug, Default)]
pub struct RecordingRunner {
    executed: Vec<BuildTask>,
    exit_codes: HashMap<PathBuf, i32>,
    unspawnable: Vec<PathBuf>,
    produce_outputs: bool,
}

impl RecordingRunner {
    /// Creates a runner where every task succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes successful tasks write an empty file at their output path,
    /// the way a real tool leaves its artifact behind.
    pub fn producing_outputs(mut self) -> Self {
        self.produce_outputs = true;
        self
    }

    /// Makes every task building `input` exit with `code`.
    pub fn fail_input(&mut self, input: &Path, code: i32) {
        self.exit_codes.insert(input.to_path_buf(), code);
    }

    /// Makes every task building `input` fail to start.
    pub fn refuse_spawn(&mut self, input: &Path) {
        self.unspawnable.push(input.to_path_buf());
    }

    /// The tasks handed to this runner, in execution order.
    pub fn executed(&self) -> &[BuildTask] {
        &self.executed
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&mut self, task: &BuildTask) -> std::io::Result<TaskOutcome> {
        if self.unspawnable.iter().any(|p| p == task.input()) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", task.executable().display()),
            ));
        }
        self.executed.push(task.clone());

        let code = self.exit_codes.get(task.input()).copied().unwrap_or(0);
        if code == 0 && self.produce_outputs {
            if let Some(parent) = task.output().parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(task.output(), b"")?;
        }
        Ok(TaskOutcome::Exited(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_success() {
        assert!(TaskOutcome::Exited(0).succeeded());
        assert!(!TaskOutcome::Exited(1).succeeded());
        assert!(!TaskOutcome::Terminated.succeeded());
    }

    #[test]
    fn recording_runner_records_and_scripts() {
        let mut runner = RecordingRunner::new();
        runner.fail_input(Path::new("/a.sc"), 2);
        let ok = BuildTask::new("/tools/shaderc", vec![], "/b.sc", "/b.bin");
        let bad = BuildTask::new("/tools/shaderc", vec![], "/a.sc", "/a.bin");

        assert_eq!(runner.run(&ok).unwrap(), TaskOutcome::Exited(0));
        assert_eq!(runner.run(&bad).unwrap(), TaskOutcome::Exited(2));
        assert_eq!(runner.executed().len(), 2);
    }

    #[test]
    fn recording_runner_refuses_spawn() {
        let mut runner = RecordingRunner::new();
        runner.refuse_spawn(Path::new("/a.sc"));
        let task = BuildTask::new("/tools/shaderc", vec![], "/a.sc", "/a.bin");
        assert!(runner.run(&task).is_err());
        assert!(runner.executed().is_empty());
    }

    #[test]
    fn recording_runner_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("nested").join("a.bin");
        let mut runner = RecordingRunner::new().producing_outputs();
        let task = BuildTask::new("/tools/shaderc", vec![], "/a.sc", &output);
        runner.run(&task).unwrap();
        assert!(output.exists());
    }

    #[test]
    fn system_runner_reports_spawn_failure() {
        let task = BuildTask::new(
            "/definitely/not/a/real/kiln/tool",
            vec![],
            "/a.sc",
            "/a.bin",
        );
        assert!(SystemRunner.run(&task).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_exit_code() {
        let ok = BuildTask::new("true", vec![], "/a.sc", "/a.bin");
        assert_eq!(SystemRunner.run(&ok).unwrap(), TaskOutcome::Exited(0));

        let bad = BuildTask::new(
            "sh",
            vec!["-c".to_string(), "exit 7".to_string()],
            "/a.sc",
            "/a.bin",
        );
        assert_eq!(SystemRunner.run(&bad).unwrap(), TaskOutcome::Exited(7));
    }
}
