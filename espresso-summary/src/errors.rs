// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    exit_codes::SummaryExitCode, loader::LoadReportError, output::StderrStyles,
    summary::SummaryError,
};
use camino::Utf8PathBuf;
use junit_report::DeserializeError;
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected failure: a bad input or an unwritable output, not a bug in espresso-summary.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("failed to read report")]
    ReportReadFailed {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to parse report")]
    ReportParseFailed {
        path: Utf8PathBuf,
        #[source]
        err: DeserializeError,
    },
    #[error("report counts are inconsistent")]
    InconsistentReport {
        path: Utf8PathBuf,
        #[source]
        err: SummaryError,
    },
    #[error("writing summary to output failed")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },
}

impl From<LoadReportError> for ExpectedError {
    fn from(err: LoadReportError) -> Self {
        match err {
            LoadReportError::Read { path, error } => Self::ReportReadFailed { path, err: error },
            LoadReportError::Parse { path, error } => Self::ReportParseFailed { path, err: error },
        }
    }
}

impl ExpectedError {
    pub(crate) fn inconsistent_report(path: Utf8PathBuf, err: SummaryError) -> Self {
        Self::InconsistentReport { path, err }
    }

    pub(crate) fn write_output_error(err: std::io::Error) -> Self {
        Self::WriteOutputError { err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ReportReadFailed { .. } => SummaryExitCode::REPORT_READ_FAILED,
            Self::ReportParseFailed { .. } => SummaryExitCode::REPORT_PARSE_FAILED,
            Self::InconsistentReport { .. } => SummaryExitCode::INCONSISTENT_REPORT,
            Self::WriteOutputError { .. } => SummaryExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::ReportReadFailed { path, err } => {
                tracing::error!("failed to read report `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::ReportParseFailed { path, err } => {
                tracing::error!(
                    "`{}` is not a valid JUnit report",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::InconsistentReport { path, err } => {
                tracing::error!(
                    "report `{}` has inconsistent test counts",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::WriteOutputError { err } => {
                tracing::error!("failed to write summary to output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: "espresso_summary::no_heading", "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
