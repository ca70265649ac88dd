// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loading reports from disk.

use camino::{Utf8Path, Utf8PathBuf};
use junit_report::{DeserializeError, Report};
use thiserror::Error;

/// Turns a path into a parsed [`Report`].
///
/// The app is generic over this so that tests can supply reports without going through the file
/// system.
pub trait ReportLoader {
    /// Loads the report at `path`.
    fn load(&self, path: &Utf8Path) -> Result<Report, LoadReportError>;
}

/// An error that occurred while loading a report.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum LoadReportError {
    /// The file could not be read, or was not valid UTF-8.
    #[error("failed to read report at `{path}`")]
    Read {
        path: Utf8PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The file contents were not a JUnit report.
    #[error("failed to parse report at `{path}`")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        error: DeserializeError,
    },
}

impl LoadReportError {
    /// Returns the path of the report that failed to load.
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

/// Loads JUnit XML reports from disk.
#[derive(Copy, Clone, Debug, Default)]
pub struct JunitFileLoader;

impl ReportLoader for JunitFileLoader {
    fn load(&self, path: &Utf8Path) -> Result<Report, LoadReportError> {
        tracing::debug!("reading report from `{path}`");

        // Read up front so that a missing or unreadable file is reported before parsing begins.
        let contents = std::fs::read_to_string(path).map_err(|error| LoadReportError::Read {
            path: path.to_owned(),
            error,
        })?;

        let report =
            Report::deserialize_str(&contents).map_err(|error| LoadReportError::Parse {
                path: path.to_owned(),
                error,
            })?;

        tracing::debug!(
            "parsed {} testsuites with {} testcases from `{path}`",
            report.testsuites.len(),
            report.testcases().count(),
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;

    #[test]
    fn load_missing_file() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = dir.path().join("missing.xml");

        let err = JunitFileLoader
            .load(&path)
            .expect_err("missing file should fail");
        assert!(matches!(err, LoadReportError::Read { .. }), "{err:?}");
        assert_eq!(err.path(), path.as_path());
    }

    #[test]
    fn load_non_utf8_file() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = dir.path().join("latin1.xml");
        std::fs::write(&path, b"<testsuite name=\"Pr\xfcfung\"/>").expect("wrote file");

        let err = JunitFileLoader
            .load(&path)
            .expect_err("non-UTF-8 file should fail");
        assert!(matches!(err, LoadReportError::Read { .. }), "{err:?}");
    }

    #[test]
    fn load_malformed_file() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = dir.path().join("report.xml");
        std::fs::write(&path, "<testsuite><testcase name=\"a\"></testsuite>").expect("wrote file");

        let err = JunitFileLoader
            .load(&path)
            .expect_err("malformed file should fail");
        assert!(matches!(err, LoadReportError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn load_report() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let path = dir.path().join("report.xml");
        std::fs::write(
            &path,
            r#"<testsuite name="s" tests="1"><testcase name="a"/></testsuite>"#,
        )
        .expect("wrote file");

        let report = JunitFileLoader.load(&path).expect("report loads");
        assert_eq!(report.tests, 1);
        assert_eq!(report.testcases().count(), 1);
    }
}
