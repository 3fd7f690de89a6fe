// Diagnostic dump sink for swallowed reporting failures.
//
// A reporting defect must never break the caller's completion flow, so
// mid-write failures end up here instead of propagating: an entry in a
// dump file next to the reports plus a log record. This function itself
// never fails.

// External crates
use chrono::Utc;
use log::{error, warn};

// Standard library imports
use std::error::Error;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const DUMP_FILE_NAME: &str = "flaky-report.dump";

/// Records `error` with `message` in the dump file inside
/// `reports_directory` and mirrors it to the log.
pub fn dump_error(error: &dyn Error, message: &str, reports_directory: &Path) {
    error!("{}: {}", message, error);

    let mut entry = format!(
        "# Created at {}\n{}\n{}\n",
        Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
        message,
        error
    );
    let mut source = error.source();
    while let Some(cause) = source {
        entry.push_str(&format!("Caused by: {}\n", cause));
        source = cause.source();
    }
    entry.push('\n');

    let dump_path = reports_directory.join(DUMP_FILE_NAME);
    let written = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&dump_path)
        .and_then(|mut file| file.write_all(entry.as_bytes()));

    if let Err(e) = written {
        warn!(
            "Failed to write diagnostic dump '{}': {}",
            dump_path.display(),
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use tempdir::TempDir;

    #[test]
    fn test_dump_error_appends_entries() {
        let temp_dir = TempDir::new("flaky_dump_test").expect("Failed to create temp dir");
        let dir_path = temp_dir.path();

        let first = io::Error::other("disk full");
        dump_error(&first, "when writing xml report", dir_path);
        let second = io::Error::other("broken pipe");
        dump_error(&second, "when writing xml report", dir_path);

        let dump = fs::read_to_string(dir_path.join(DUMP_FILE_NAME)).unwrap();
        assert!(dump.contains("when writing xml report"));
        assert!(dump.contains("disk full"));
        assert!(dump.contains("broken pipe"));
        assert_eq!(dump.matches("# Created at").count(), 2);
    }

    /// An unwritable directory must not panic or error.
    #[test]
    fn test_dump_error_never_fails() {
        let err = io::Error::other("boom");
        dump_error(&err, "msg", Path::new("/nonexistent/flaky-report-dir"));
    }
}
