//! Build status classification and the skip policy that filters it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Why an (input, output) pair does or does not need rebuilding.
///
/// Exactly one status is produced per staleness check. Variants are listed
/// in the priority order the checker evaluates them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    /// The source asset does not exist. Terminal: nothing is ever built.
    InputMissing,
    /// The source asset has never been recorded in the committed cache.
    InputAdded,
    /// The source asset's timestamp differs from the committed one.
    InputModified,
    /// The source is unchanged but the output artifact is absent.
    OutputMissing,
    /// The source is unchanged and the output exists.
    Stable,
}

impl BuildStatus {
    /// Returns the `snake_case` name used in `kiln.toml` and JSON reports.
    pub fn name(self) -> &'static str {
        match self {
            BuildStatus::InputMissing => "input_missing",
            BuildStatus::InputAdded => "input_added",
            BuildStatus::InputModified => "input_modified",
            BuildStatus::OutputMissing => "output_missing",
            BuildStatus::Stable => "stable",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of statuses that suppress task creation.
///
/// The default policy skips only [`BuildStatus::Stable`]. An
/// [`BuildStatus::InputMissing`] result never produces a task, whether or not
/// the set names it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkipPolicy(BTreeSet<BuildStatus>);

impl SkipPolicy {
    /// Creates a policy that skips exactly the given statuses.
    pub fn new(statuses: impl IntoIterator<Item = BuildStatus>) -> Self {
        Self(statuses.into_iter().collect())
    }

    /// A policy that skips nothing: every existing input is rebuilt.
    pub fn rebuild_all() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns `true` if the set explicitly names `status`.
    pub fn contains(&self, status: BuildStatus) -> bool {
        self.0.contains(&status)
    }

    /// Returns `true` if a check yielding `status` must not create a task.
    pub fn skips(&self, status: BuildStatus) -> bool {
        status == BuildStatus::InputMissing || self.0.contains(&status)
    }

    /// Adds a status to the set.
    pub fn insert(&mut self, status: BuildStatus) {
        self.0.insert(status);
    }

    /// Removes a status from the set.
    pub fn remove(&mut self, status: BuildStatus) {
        self.0.remove(&status);
    }

    /// Iterates the named statuses in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = BuildStatus> + '_ {
        self.0.iter().copied()
    }
}

impl Default for SkipPolicy {
    fn default() -> Self {
        Self::new([BuildStatus::Stable])
    }
}
