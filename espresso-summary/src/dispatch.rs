// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, Result},
    exit_codes::SummaryExitCode,
    loader::{JunitFileLoader, ReportLoader},
    output::OutputWriter,
    summary::RunSummary,
};
use camino::Utf8PathBuf;
use std::io::Write;

/// Summarize a JUnit XML report from an Espresso test run.
///
/// Prints a headline with the success rate and the number of tests that were run, followed by one
/// line per test case.
#[derive(Debug, clap::Parser)]
#[command(
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub struct EspressoSummaryApp {
    /// Path to the JUnit XML report
    #[arg(value_name = "REPORT")]
    report: Utf8PathBuf,
}

impl EspressoSummaryApp {
    /// Executes the app, reading the report from disk.
    ///
    /// Returns the exit code.
    pub fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        self.exec_with(&JunitFileLoader, output_writer)
    }

    /// Executes the app with the given report loader.
    pub fn exec_with(
        self,
        loader: &impl ReportLoader,
        output_writer: &mut OutputWriter,
    ) -> Result<i32> {
        let report = loader.load(&self.report)?;
        let summary = RunSummary::new(&report)
            .map_err(|err| ExpectedError::inconsistent_report(self.report.clone(), err))?;

        // Render everything before writing, so a failure never leaves a partial summary behind.
        let rendered = summary.render();

        let mut writer = output_writer.stdout_writer();
        writer
            .write_all(rendered.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(ExpectedError::write_output_error)?;

        Ok(SummaryExitCode::OK)
    }
}
