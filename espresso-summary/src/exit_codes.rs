// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exit codes returned by `espresso-summary`.

/// Documented exit codes for `espresso-summary` failures.
///
/// Command-line usage errors are reported by clap with exit code 2. Unknown/unexpected failures
/// will always result in exit code 1.
pub enum SummaryExitCode {}

impl SummaryExitCode {
    /// The summary was printed.
    pub const OK: i32 = 0;

    /// The report file could not be read.
    pub const REPORT_READ_FAILED: i32 = 102;

    /// The report file was not a well-formed JUnit report.
    pub const REPORT_PARSE_FAILED: i32 = 103;

    /// The counts in the report contradict each other, e.g. more skipped tests than tests.
    pub const INCONSISTENT_REPORT: i32 = 104;

    /// Writing the summary to stdout produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
