//! Staleness classification of (input, output) pairs.
//!
//! The checker compares an input's current modification stamp against the
//! committed table and falls back to output existence only once the input is
//! known to be unchanged. A content change always wins over an output that
//! happens to be present.

use std::path::Path;

use kiln_common::{BuildStatus, FileStamp};
use tracing::{error, info, trace};

use crate::table::StampTable;

/// Classifies whether a build is required for an (input, output) pair.
pub struct StalenessChecker;

impl StalenessChecker {
    /// Returns the build status of `input` → `output`.
    ///
    /// Evaluation order:
    /// 1. input absent → [`BuildStatus::InputMissing`]
    /// 2. input not in the committed table → [`BuildStatus::InputAdded`]
    /// 3. stamp differs from the committed one → [`BuildStatus::InputModified`]
    /// 4. output absent → [`BuildStatus::OutputMissing`]
    /// 5. otherwise → [`BuildStatus::Stable`]
    ///
    /// Steps 2 and 3 record the current stamp as pending. Classification only
    /// reads the committed layer, so repeating a check before the next drain
    /// yields the same status.
    pub fn check(table: &mut StampTable, input: &Path, output: &Path) -> BuildStatus {
        if !input.exists() {
            error!("input file {} does not exist", input.display());
            return BuildStatus::InputMissing;
        }

        let current = match FileStamp::of(input) {
            Ok(stamp) => stamp,
            Err(e) => {
                error!("cannot read modification time of {}: {e}", input.display());
                return BuildStatus::InputMissing;
            }
        };

        match table.committed(input) {
            None => {
                info!("new input file {} detected", input.display());
                table.record_pending(input, current);
                BuildStatus::InputAdded
            }
            Some(seen) if seen != current => {
                info!("input file {} has been modified", input.display());
                table.record_pending(input, current);
                BuildStatus::InputModified
            }
            Some(_) if !output.exists() => {
                info!("output file {} does not exist", output.display());
                BuildStatus::OutputMissing
            }
            Some(_) => {
                trace!("output file {} is up to date", output.display());
                BuildStatus::Stable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::StampMap;
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};

    fn write_with_mtime(path: &Path, millis: u64) {
        std::fs::write(path, "content").unwrap();
        std::fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(UNIX_EPOCH + Duration::from_millis(millis))
            .unwrap();
    }

    fn committed(path: &Path, millis: i64) -> StampTable {
        let mut map = StampMap::new();
        map.insert(path.to_path_buf(), FileStamp::from_millis(millis));
        StampTable::from_committed(map)
    }

    #[test]
    fn missing_input_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = StampTable::new();
        let status = StalenessChecker::check(
            &mut table,
            &dir.path().join("absent.sc"),
            &dir.path().join("absent.bin"),
        );
        assert_eq!(status, BuildStatus::InputMissing);
        assert!(!table.has_pending());
    }

    #[test]
    fn unknown_input_is_added_even_with_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.sc");
        let output = dir.path().join("a.bin");
        write_with_mtime(&input, 1_000);
        std::fs::write(&output, "binary").unwrap();

        let mut table = StampTable::new();
        let status = StalenessChecker::check(&mut table, &input, &output);
        assert_eq!(status, BuildStatus::InputAdded);
        assert_eq!(table.pending(&input), Some(FileStamp::from_millis(1_000)));
    }

    #[test]
    fn changed_stamp_is_modified() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.sc");
        let output = dir.path().join("a.bin");
        write_with_mtime(&input, 2_000);
        std::fs::write(&output, "binary").unwrap();

        let mut table = committed(&input, 1_000);
        let status = StalenessChecker::check(&mut table, &input, &output);
        assert_eq!(status, BuildStatus::InputModified);
        assert_eq!(table.pending(&input), Some(FileStamp::from_millis(2_000)));
    }

    #[test]
    fn older_stamp_also_counts_as_modified() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.sc");
        write_with_mtime(&input, 500);

        let mut table = committed(&input, 1_000);
        let status = StalenessChecker::check(&mut table, &input, &dir.path().join("a.bin"));
        assert_eq!(status, BuildStatus::InputModified);
    }

    #[test]
    fn modified_wins_over_missing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.sc");
        write_with_mtime(&input, 2_000);

        let mut table = committed(&input, 1_000);
        let status = StalenessChecker::check(&mut table, &input, &dir.path().join("a.bin"));
        assert_eq!(status, BuildStatus::InputModified);
    }

    #[test]
    fn unchanged_input_missing_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.sc");
        write_with_mtime(&input, 1_000);

        let mut table = committed(&input, 1_000);
        let status = StalenessChecker::check(&mut table, &input, &dir.path().join("a.bin"));
        assert_eq!(status, BuildStatus::OutputMissing);
        assert!(!table.has_pending());
    }

    #[test]
    fn unchanged_input_with_output_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.sc");
        let output = dir.path().join("a.bin");
        write_with_mtime(&input, 1_000);
        std::fs::write(&output, "binary").unwrap();

        let mut table = committed(&input, 1_000);
        assert_eq!(
            StalenessChecker::check(&mut table, &input, &output),
            BuildStatus::Stable
        );
    }

    #[test]
    fn repeated_check_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.sc");
        let output = dir.path().join("a.bin");
        write_with_mtime(&input, 1_000);

        let mut table = StampTable::new();
        let first = StalenessChecker::check(&mut table, &input, &output);
        let second = StalenessChecker::check(&mut table, &input, &output);
        assert_eq!(first, BuildStatus::InputAdded);
        assert_eq!(first, second);

        let mut table = committed(&input, 3);
        let first = StalenessChecker::check(&mut table, &input, &output);
        let second = StalenessChecker::check(&mut table, &input, &output);
        assert_eq!(first, BuildStatus::InputModified);
        assert_eq!(first, second);
    }

    #[test]
    fn cold_start_classifies_everything_as_added() {
        let dir = tempfile::tempdir().unwrap();
        let inputs: Vec<PathBuf> = (0..3).map(|i| dir.path().join(format!("t{i}.png"))).collect();
        for (i, input) in inputs.iter().enumerate() {
            write_with_mtime(input, 100 + i as u64);
        }

        let mut table = StampTable::new();
        for input in &inputs {
            let status = StalenessChecker::check(&mut table, input, &input.with_extension("dds"));
            assert_eq!(status, BuildStatus::InputAdded);
        }
        assert_eq!(table.pending_entries().len(), 3);
    }
}
