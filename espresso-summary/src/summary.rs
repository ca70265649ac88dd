// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The summary printed at the end of an Espresso CI run.
//!
//! A [`RunSummary`] is computed from a [`Report`] in full before anything is written, so callers
//! either print the whole summary or nothing at all.

use junit_report::Report;
use std::fmt;
use swrite::{swrite, SWrite};
use thiserror::Error;

static HEADLINE: &str = "Espresso Test Run";

/// A symbol summarizing how well a run went, picked by thresholding the success rate.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Indicator {
    /// More than 95% of tests passed.
    Celebratory,
    /// More than 50% of tests passed.
    Uneasy,
    /// More than 25% of tests passed.
    Concerned,
    /// Everything else.
    Sad,
}

/// Exclusive lower bounds for each indicator, checked top-down. The first match wins.
static INDICATOR_THRESHOLDS: &[(f64, Indicator)] = &[
    (95.0, Indicator::Celebratory),
    (50.0, Indicator::Uneasy),
    (25.0, Indicator::Concerned),
];

impl Indicator {
    /// Picks the indicator for a success rate in percent.
    pub fn for_success_rate(success_rate: f64) -> Self {
        INDICATOR_THRESHOLDS
            .iter()
            .find(|(lower_bound, _)| success_rate > *lower_bound)
            .map_or(Indicator::Sad, |&(_, indicator)| indicator)
    }

    /// Returns the symbol printed for this indicator.
    pub fn symbol(self) -> &'static str {
        match self {
            Indicator::Celebratory => "🎉",
            Indicator::Uneasy => "😬",
            Indicator::Concerned => "😟",
            Indicator::Sad => "😢",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Whether a single testcase passed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CaseOutcome {
    /// The testcase succeeded.
    Passed,
    /// The testcase failed, errored or was skipped.
    Failed,
}

impl CaseOutcome {
    /// Returns the symbol printed for this outcome.
    pub fn symbol(self) -> &'static str {
        match self {
            CaseOutcome::Passed => "✅",
            CaseOutcome::Failed => "❌",
        }
    }
}

impl fmt::Display for CaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// The counts in a report contradict each other.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum SummaryError {
    #[error("report lists {skipped} skipped tests but only {tests} tests in total")]
    SkippedExceedsTests { tests: usize, skipped: usize },

    #[error("report lists {error_count} errors and failures but only {total} tests were run")]
    ErrorsExceedTotal { error_count: usize, total: usize },

    #[error("report lists {errors} errors and {failures} failures, more than can be counted")]
    CountOverflow { errors: usize, failures: usize },
}

/// Aggregate results for a report, ready to print.
#[derive(Clone, Debug)]
pub struct RunSummary<'a> {
    total: usize,
    error_count: usize,
    success_rate: f64,
    indicator: Indicator,
    testcases: Vec<(&'a str, CaseOutcome)>,
}

impl<'a> RunSummary<'a> {
    /// Computes the summary for a report.
    pub fn new(report: &'a Report) -> Result<Self, SummaryError> {
        let total =
            report
                .tests
                .checked_sub(report.skipped)
                .ok_or(SummaryError::SkippedExceedsTests {
                    tests: report.tests,
                    skipped: report.skipped,
                })?;
        let error_count =
            report
                .errors
                .checked_add(report.failures)
                .ok_or(SummaryError::CountOverflow {
                    errors: report.errors,
                    failures: report.failures,
                })?;
        if error_count > total {
            return Err(SummaryError::ErrorsExceedTotal { error_count, total });
        }

        if total == 0 {
            tracing::warn!("report contains no tests that were run, reporting a success rate of 0%");
        }
        let success_rate = success_rate(total, error_count);

        let testcases = report
            .testcases()
            .map(|testcase| {
                let outcome = if testcase.is_passed() {
                    CaseOutcome::Passed
                } else {
                    CaseOutcome::Failed
                };
                (testcase.name.as_str(), outcome)
            })
            .collect();

        Ok(Self {
            total,
            error_count,
            success_rate,
            indicator: Indicator::for_success_rate(success_rate),
            testcases,
        })
    }

    /// The number of tests that were run, i.e. not skipped.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The number of tests that errored or failed.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// The success rate in percent.
    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }

    /// The success rate in percent, truncated toward zero.
    pub fn success_percent(&self) -> u64 {
        // success_rate is always within [0, 100].
        self.success_rate as u64
    }

    /// The indicator for the success rate.
    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    /// Testcase names and outcomes, in report order.
    pub fn testcases(&self) -> &[(&'a str, CaseOutcome)] {
        &self.testcases
    }

    /// Renders the headline, a blank line, and one line per testcase.
    pub fn render(&self) -> String {
        let mut out = String::new();
        swrite!(
            out,
            "{HEADLINE} {} Success {}% - Total {}\n\n",
            self.indicator,
            self.success_percent(),
            self.total,
        );
        for (name, outcome) in &self.testcases {
            swrite!(out, "Test: {outcome} {name}\n");
        }
        out
    }
}

/// Computes `(total - error_count) / total * 100`.
///
/// A run where every test was skipped has a success rate of 0%.
pub fn success_rate(total: usize, error_count: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (total - error_count) as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use junit_report::{NonSuccessKind, Testcase, TestcaseStatus, Testsuite};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    /// Builds a report with the given counts and no testcases.
    fn counts_report(tests: usize, skipped: usize, errors: usize, failures: usize) -> Report {
        Report {
            tests,
            skipped,
            errors,
            failures,
            ..Report::default()
        }
    }

    #[test_case(100.0, Indicator::Celebratory ; "perfect run")]
    #[test_case(95.01, Indicator::Celebratory ; "just above 95")]
    #[test_case(95.0, Indicator::Uneasy ; "exactly 95 is not celebratory")]
    #[test_case(87.5, Indicator::Uneasy ; "87.5")]
    #[test_case(50.0, Indicator::Concerned ; "exactly 50 is not uneasy")]
    #[test_case(25.01, Indicator::Concerned ; "just above 25")]
    #[test_case(25.0, Indicator::Sad ; "exactly 25 is not concerned")]
    #[test_case(0.0, Indicator::Sad ; "nothing passed")]
    fn indicator_thresholds(success_rate: f64, expected: Indicator) {
        assert_eq!(Indicator::for_success_rate(success_rate), expected);
    }

    #[test]
    fn indicator_thresholds_are_descending() {
        for window in INDICATOR_THRESHOLDS.windows(2) {
            assert!(
                window[0].0 > window[1].0,
                "thresholds must be checked from highest to lowest: {window:?}"
            );
        }
    }

    #[test_case(10, 0, 0, 0, 10, 100, Indicator::Celebratory ; "all passed")]
    #[test_case(10, 2, 1, 0, 8, 87, Indicator::Uneasy ; "one error among eight run")]
    #[test_case(4, 0, 3, 0, 4, 25, Indicator::Sad ; "three errors among four")]
    #[test_case(4, 0, 1, 1, 4, 50, Indicator::Concerned ; "errors and failures both count")]
    #[test_case(3, 0, 0, 1, 3, 66, Indicator::Uneasy ; "percentage is truncated not rounded")]
    #[test_case(0, 0, 0, 0, 0, 0, Indicator::Sad ; "empty report")]
    #[test_case(5, 5, 0, 0, 0, 0, Indicator::Sad ; "everything skipped")]
    fn summary_counts(
        tests: usize,
        skipped: usize,
        errors: usize,
        failures: usize,
        expected_total: usize,
        expected_percent: u64,
        expected_indicator: Indicator,
    ) {
        let report = counts_report(tests, skipped, errors, failures);
        let summary = RunSummary::new(&report).expect("counts are consistent");

        assert_eq!(summary.total(), expected_total);
        assert_eq!(summary.error_count(), errors + failures);
        assert_eq!(summary.success_percent(), expected_percent);
        assert_eq!(summary.success_rate() as u64, expected_percent);
        assert_eq!(summary.indicator(), expected_indicator);
    }

    #[test]
    fn success_rate_is_exact() {
        assert_eq!(success_rate(8, 1), 87.5);
        assert_eq!(success_rate(4, 3), 25.0);
        assert_eq!(success_rate(10, 0), 100.0);
        assert_eq!(success_rate(0, 0), 0.0);
    }

    #[test_case(
        counts_report(2, 3, 0, 0),
        SummaryError::SkippedExceedsTests { tests: 2, skipped: 3 }
        ; "more skipped than tests"
    )]
    #[test_case(
        counts_report(5, 2, 2, 2),
        SummaryError::ErrorsExceedTotal { error_count: 4, total: 3 }
        ; "more errors than tests run"
    )]
    #[test_case(
        counts_report(4, 0, usize::MAX, 1),
        SummaryError::CountOverflow { errors: usize::MAX, failures: 1 }
        ; "errors plus failures overflow"
    )]
    fn inconsistent_counts(report: Report, expected: SummaryError) {
        let err = RunSummary::new(&report).expect_err("counts are inconsistent");
        assert_eq!(err, expected);
    }

    #[test]
    fn render_lists_testcases_in_order() {
        let mut testsuite = Testsuite::new("de.gematik.ti.erp.app.test.LoginTest");
        testsuite.add_testcases([
            Testcase::new("loginWithHealthCard", TestcaseStatus::success()),
            Testcase::new(
                "loginWithWrongPin",
                TestcaseStatus::non_success(NonSuccessKind::Failure),
            ),
            Testcase::new("loginWithBiometrics", TestcaseStatus::skipped()),
            Testcase::new(
                "loginOffline",
                TestcaseStatus::non_success(NonSuccessKind::Error),
            ),
            Testcase::new("logout", TestcaseStatus::success()),
        ]);
        let mut report = Report::new();
        report.add_testsuite(testsuite);

        let summary = RunSummary::new(&report).expect("counts are consistent");
        // 5 tests, 1 skipped, 2 not passing: (4 - 2) / 4 = 50%.
        assert_eq!(
            summary.render(),
            indoc! {"
                Espresso Test Run 😟 Success 50% - Total 4

                Test: ✅ loginWithHealthCard
                Test: ❌ loginWithWrongPin
                Test: ❌ loginWithBiometrics
                Test: ❌ loginOffline
                Test: ✅ logout
            "}
        );
    }

    #[test]
    fn render_empty_report() {
        let report = Report::new();
        let summary = RunSummary::new(&report).expect("empty report is consistent");
        assert_eq!(summary.render(), "Espresso Test Run 😢 Success 0% - Total 0\n\n");
    }

    #[test]
    fn render_is_deterministic() {
        let mut testsuite = Testsuite::new("suite");
        testsuite.add_testcases((0..20).map(|i| {
            let status = if i % 3 == 0 {
                TestcaseStatus::non_success(NonSuccessKind::Failure)
            } else {
                TestcaseStatus::success()
            };
            Testcase::new(format!("test_{i}"), status)
        }));
        let mut report = Report::new();
        report.add_testsuite(testsuite);

        let first = RunSummary::new(&report).expect("consistent").render();
        let second = RunSummary::new(&report).expect("consistent").render();
        assert_eq!(first, second);
        assert_eq!(first.lines().count(), 2 + 20);
    }
}
