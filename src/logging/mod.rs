//! File logging for the preview and headless runs.
//!
//! The terminal preview owns the screen, so logs go to a file. Follow them
//! with `tail -f` from another terminal.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filter directive used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Why the file subscriber could not be installed.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The log directory could not be created.
    #[error("Cannot create log directory {}: {source}", .path.display())]
    DirectoryCreation {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The path has no usable file name.
    #[error("Log path {} names no file", .0.display())]
    InvalidPath(PathBuf),

    /// The path has no parent directory.
    #[error("Log path {} has no parent directory", .0.display())]
    NoParentDirectory(PathBuf),

    /// Another global subscriber is installed.
    #[error("A tracing subscriber is already installed")]
    SubscriberAlreadySet,
}

/// Split a log path into the directory and file name the appender needs.
fn appender_target(log_path: &Path) -> Result<(&Path, &str), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?;

    let directory = log_path
        .parent()
        .ok_or_else(|| LoggingError::NoParentDirectory(log_path.to_path_buf()))?;

    // `Path::new("masonry.log").parent()` is `Some("")`.
    let directory = if directory.as_os_str().is_empty() {
        Path::new(".")
    } else {
        directory
    };

    Ok((directory, file_name))
}

/// Install a global fmt subscriber appending to `log_path`.
///
/// The filter comes from `RUST_LOG`, else [`DEFAULT_FILTER`]. Missing parent
/// directories are created first.
pub fn init(log_path: &Path) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let (directory, file_name) = appender_target(log_path)?;

    std::fs::create_dir_all(directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(tracing_appender::rolling::never(directory, file_name))
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn appender_target_splits_directory_and_file() {
        let path = Path::new("/var/log/masonry/masonry.log");
        let (dir, file) = appender_target(path).expect("valid path");
        assert_eq!(dir, Path::new("/var/log/masonry"));
        assert_eq!(file, "masonry.log");
    }

    #[test]
    fn appender_target_uses_current_dir_for_bare_file_names() {
        let (dir, file) = appender_target(Path::new("masonry.log")).expect("valid path");
        assert_eq!(dir, Path::new("."));
        assert_eq!(file, "masonry.log");
    }

    #[test]
    fn appender_target_rejects_paths_without_file_name() {
        let result = appender_target(Path::new("/"));
        assert!(matches!(result, Err(LoggingError::InvalidPath(_))));
    }

    #[test]
    #[serial(tracing_init)]
    fn init_creates_missing_parent_directory() {
        let dir = std::env::temp_dir().join("masonry_test_logs_create");
        let _ = fs::remove_dir_all(&dir);

        // May fail with SubscriberAlreadySet; the directory is created first.
        let _ = init(&dir.join("preview.log"));
        assert!(dir.is_dir(), "missing {}", dir.display());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    #[serial(tracing_init)]
    fn second_init_reports_subscriber_already_set() {
        let test_dir = std::env::temp_dir().join("masonry_test_logs_twice");
        let log_file = test_dir.join("twice.log");

        let _ = init(&log_file);
        let second = init(&log_file);
        assert!(matches!(second, Err(LoggingError::SubscriberAlreadySet)));

        let _ = fs::remove_dir_all(&test_dir);
    }
}
