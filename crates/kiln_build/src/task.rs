//! External tool invocations.

use std::fmt;
use std::path::{Path, PathBuf};

/// One external tool invocation, built by a task builder and owned by the
/// queue once submitted.
///
/// Besides the command line, a task remembers the source asset it builds and
/// the artifact it writes, so a failing tool can keep exactly that input out
/// of the cache.
///
/// Every task is synchronous: the runner blocks until the tool exits before
/// starting the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTask {
    executable: PathBuf,
    args: Vec<String>,
    input: PathBuf,
    output: PathBuf,
}

impl BuildTask {
    /// Creates a task running `executable` with `args` to turn `input`
    /// into `output`.
    pub fn new(
        executable: impl Into<PathBuf>,
        args: Vec<String>,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            executable: executable.into(),
            args,
            input: input.into(),
            output: output.into(),
        }
    }

    /// The tool to run.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Arguments, in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The source asset this task builds.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// The artifact this task writes.
    pub fn output(&self) -> &Path {
        &self.output
    }
}

impl fmt::Display for BuildTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Converts a path into a command-line argument.
pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
