use std::io::{self, Write};
use std::path::PathBuf;

use crate::models::link::Outcome;

pub const SUCCESS_LOG: &str = "success_links.txt";
pub const FAILED_LOG: &str = "failed_links.txt";

/// Batch-scoped success/failure record set: two append-only in-memory
/// sequences mirrored to two transient log files. The pipeline writes,
/// the reporter reads and clears. Nothing outlives the batch.
pub struct OutcomeLog {
    dir: PathBuf,
    successes: Vec<String>,
    failures: Vec<String>,
}

impl OutcomeLog {
    /// Start a fresh batch log. Leftover files from an interrupted
    /// earlier run are discarded so they cannot leak into this batch's
    /// report.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        for name in [SUCCESS_LOG, FAILED_LOG] {
            let _ = std::fs::remove_file(dir.join(name));
        }
        Self {
            dir,
            successes: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Append one `name:url` entry to the matching sequence and its
    /// log file, preserving input order.
    pub fn record(&mut self, outcome: Outcome, entry: &str) -> io::Result<()> {
        let (list, path) = match outcome {
            Outcome::Success => (&mut self.successes, self.dir.join(SUCCESS_LOG)),
            Outcome::Failure => (&mut self.failures, self.dir.join(FAILED_LOG)),
        };
        list.push(entry.to_string());

        std::fs::create_dir_all(&self.dir)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn success_path(&self) -> PathBuf {
        self.dir.join(SUCCESS_LOG)
    }

    pub fn failure_path(&self) -> PathBuf {
        self.dir.join(FAILED_LOG)
    }

    pub fn is_empty(&self) -> bool {
        self.successes.is_empty() && self.failures.is_empty()
    }

    /// Drop both sequences and remove the log files so the next batch
    /// starts clean.
    pub fn clear(&mut self) -> io::Result<()> {
        self.successes.clear();
        self.failures.clear();
        for path in [self.success_path(), self.failure_path()] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn records_preserve_input_order() {
        let dir = TempDir::new().unwrap();
        let mut log = OutcomeLog::open(dir.path());
        log.record(Outcome::Success, "a:https://x/a").unwrap();
        log.record(Outcome::Failure, "b:https://x/b").unwrap();
        log.record(Outcome::Success, "c:https://x/c").unwrap();

        assert_eq!(log.successes(), ["a:https://x/a", "c:https://x/c"]);
        assert_eq!(log.failures(), ["b:https://x/b"]);
    }

    #[test]
    fn entries_mirror_to_files() {
        let dir = TempDir::new().unwrap();
        let mut log = OutcomeLog::open(dir.path());
        log.record(Outcome::Success, "a:https://x/a").unwrap();
        log.record(Outcome::Success, "b:https://x/b").unwrap();

        let contents = std::fs::read_to_string(log.success_path()).unwrap();
        assert_eq!(contents, "a:https://x/a\nb:https://x/b\n");
        assert!(!log.failure_path().exists());
    }

    #[test]
    fn clear_removes_files_and_state() {
        let dir = TempDir::new().unwrap();
        let mut log = OutcomeLog::open(dir.path());
        log.record(Outcome::Success, "a:https://x/a").unwrap();
        log.record(Outcome::Failure, "b:https://x/b").unwrap();
        log.clear().unwrap();

        assert!(log.is_empty());
        assert!(!log.success_path().exists());
        assert!(!log.failure_path().exists());
    }

    #[test]
    fn rerun_after_clear_is_independent() {
        let dir = TempDir::new().unwrap();
        let mut log = OutcomeLog::open(dir.path());
        log.record(Outcome::Failure, "a:https://x/a").unwrap();
        log.clear().unwrap();

        log.record(Outcome::Success, "b:https://x/b").unwrap();
        assert_eq!(log.successes(), ["b:https://x/b"]);
        assert!(log.failures().is_empty());
        let contents = std::fs::read_to_string(log.success_path()).unwrap();
        assert_eq!(contents, "b:https://x/b\n");
    }

    #[test]
    fn clear_on_empty_log_is_fine() {
        let dir = TempDir::new().unwrap();
        let mut log = OutcomeLog::open(dir.path());
        log.clear().unwrap();
    }

    #[test]
    fn stale_files_from_a_previous_run_are_discarded() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SUCCESS_LOG), "old:https://x/old\n").unwrap();

        let mut log = OutcomeLog::open(dir.path());
        log.record(Outcome::Success, "new:https://x/new").unwrap();

        let contents = std::fs::read_to_string(log.success_path()).unwrap();
        assert_eq!(contents, "new:https://x/new\n");
    }
}
