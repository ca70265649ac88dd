// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{deserialize::deserialize_report, DeserializeError};
use std::{io::Read, time::Duration};

/// The root of a JUnit report.
///
/// A report may be read from either a `<testsuites>` or a bare `<testsuite>` root element. In the
/// latter case the report holds exactly one testsuite, and its counts are that testsuite's counts.
#[derive(Clone, Debug, Default)]
pub struct Report {
    /// The name of this report, if the root element carried one.
    pub name: Option<String>,

    /// The overall time taken by the run.
    pub time: Option<Duration>,

    /// The total number of tests from all testsuites.
    pub tests: usize,

    /// The total number of skipped tests from all testsuites.
    pub skipped: usize,

    /// The total number of errors from all testsuites.
    pub errors: usize,

    /// The total number of failures from all testsuites.
    pub failures: usize,

    /// The test suites contained in this report.
    pub testsuites: Vec<Testsuite>,
}

impl Report {
    /// Creates a new, empty `Report`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the report.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the time taken for overall execution.
    pub fn set_time(&mut self, time: Duration) -> &mut Self {
        self.time = Some(time);
        self
    }

    /// Adds a new testsuite and updates the `tests`, `skipped`, `failures` and `errors` counts.
    ///
    /// Counts saturate at `usize::MAX` rather than wrapping.
    ///
    /// When building a report by hand, use of this method is recommended over adding to
    /// `self.testsuites` directly.
    pub fn add_testsuite(&mut self, testsuite: Testsuite) -> &mut Self {
        self.tests = self.tests.saturating_add(testsuite.tests);
        self.skipped = self.skipped.saturating_add(testsuite.skipped);
        self.failures = self.failures.saturating_add(testsuite.failures);
        self.errors = self.errors.saturating_add(testsuite.errors);
        self.testsuites.push(testsuite);
        self
    }

    /// Adds several testsuites and updates the counts.
    pub fn add_testsuites(&mut self, testsuites: impl IntoIterator<Item = Testsuite>) -> &mut Self {
        for testsuite in testsuites {
            self.add_testsuite(testsuite);
        }
        self
    }

    /// Returns the testcases across all testsuites, in document order.
    pub fn testcases(&self) -> impl Iterator<Item = &Testcase> + '_ {
        self.testsuites
            .iter()
            .flat_map(|testsuite| testsuite.testcases.iter())
    }

    /// Reads a report from JUnit XML.
    pub fn deserialize(mut reader: impl Read) -> Result<Self, DeserializeError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::deserialize_str(&input)
    }

    /// Reads a report from a string containing JUnit XML.
    pub fn deserialize_str(input: &str) -> Result<Self, DeserializeError> {
        deserialize_report(input)
    }
}

/// Represents a single testsuite.
///
/// A `Testsuite` groups together several `Testcase` instances.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Testsuite {
    /// The name of this testsuite.
    pub name: String,

    /// The total number of tests in this testsuite.
    pub tests: usize,

    /// The number of tests in this testsuite that were not run.
    pub skipped: usize,

    /// The total number of tests in this suite that errored.
    ///
    /// An "error" is usually some sort of *unexpected* issue in a test.
    pub errors: usize,

    /// The total number of tests in this suite that failed.
    ///
    /// A "failure" is usually some sort of *expected* issue in a test.
    pub failures: usize,

    /// The overall time taken by the testsuite.
    pub time: Option<Duration>,

    /// The testcases that form this testsuite.
    pub testcases: Vec<Testcase>,
}

impl Testsuite {
    /// Creates a new `Testsuite`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: 0,
            skipped: 0,
            errors: 0,
            failures: 0,
            time: None,
            testcases: vec![],
        }
    }

    /// Sets the time taken for the testsuite.
    pub fn set_time(&mut self, time: Duration) -> &mut Self {
        self.time = Some(time);
        self
    }

    /// Adds a testcase to this testsuite and updates the counts.
    ///
    /// When building a report by hand, use of this method is recommended over adding to
    /// `self.testcases` directly.
    pub fn add_testcase(&mut self, testcase: Testcase) -> &mut Self {
        self.tests += 1;
        match &testcase.status {
            TestcaseStatus::Success => {}
            TestcaseStatus::NonSuccess { kind, .. } => match kind {
                NonSuccessKind::Failure => self.failures += 1,
                NonSuccessKind::Error => self.errors += 1,
            },
            TestcaseStatus::Skipped { .. } => self.skipped += 1,
        }
        self.testcases.push(testcase);
        self
    }

    /// Adds several testcases to this testsuite and updates the counts.
    pub fn add_testcases(&mut self, testcases: impl IntoIterator<Item = Testcase>) -> &mut Self {
        for testcase in testcases {
            self.add_testcase(testcase);
        }
        self
    }
}

/// Represents a single testcase.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Testcase {
    /// The name of the testcase.
    pub name: String,

    /// The "classname" of the testcase.
    ///
    /// For instrumentation runs this is usually the fully qualified name of the test class.
    pub classname: Option<String>,

    /// The time it took to execute this testcase.
    pub time: Option<Duration>,

    /// The status of this test.
    pub status: TestcaseStatus,
}

impl Testcase {
    /// Creates a new testcase.
    pub fn new(name: impl Into<String>, status: TestcaseStatus) -> Self {
        Self {
            name: name.into(),
            classname: None,
            time: None,
            status,
        }
    }

    /// Sets the classname of the test.
    pub fn set_classname(&mut self, classname: impl Into<String>) -> &mut Self {
        self.classname = Some(classname.into());
        self
    }

    /// Sets the time taken for the testcase.
    pub fn set_time(&mut self, time: Duration) -> &mut Self {
        self.time = Some(time);
        self
    }

    /// Returns true if this testcase passed.
    ///
    /// Skipped testcases did not pass.
    pub fn is_passed(&self) -> bool {
        matches!(self.status, TestcaseStatus::Success)
    }
}

/// Represents the success or failure of a testcase.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TestcaseStatus {
    /// This testcase passed.
    Success,

    /// This testcase did not pass.
    NonSuccess {
        /// Whether this testcase failed in an expected way (failure) or an unexpected way (error).
        kind: NonSuccessKind,

        /// The failure message.
        message: Option<String>,

        /// The "type" of failure that occurred.
        ty: Option<String>,

        /// The description of the failure.
        ///
        /// This is read from the text node of the element.
        description: Option<String>,
    },

    /// This testcase was not run.
    Skipped {
        /// The skip message.
        message: Option<String>,

        /// The "type" of skip that occurred.
        ty: Option<String>,

        /// The description of the skip.
        description: Option<String>,
    },
}

impl TestcaseStatus {
    /// Creates a new `TestcaseStatus` that represents a successful test.
    pub fn success() -> Self {
        TestcaseStatus::Success
    }

    /// Creates a new `TestcaseStatus` that represents an unsuccessful test.
    pub fn non_success(kind: NonSuccessKind) -> Self {
        TestcaseStatus::NonSuccess {
            kind,
            message: None,
            ty: None,
            description: None,
        }
    }

    /// Creates a new `TestcaseStatus` that represents a skipped test.
    pub fn skipped() -> Self {
        TestcaseStatus::Skipped {
            message: None,
            ty: None,
            description: None,
        }
    }

    /// Sets the message. No-op if this is a success case.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        let message_mut = match self {
            TestcaseStatus::Success => return self,
            TestcaseStatus::NonSuccess { message, .. } => message,
            TestcaseStatus::Skipped { message, .. } => message,
        };
        *message_mut = Some(message.into());
        self
    }

    /// Sets the type. No-op if this is a success case.
    pub fn set_type(&mut self, ty: impl Into<String>) -> &mut Self {
        let ty_mut = match self {
            TestcaseStatus::Success => return self,
            TestcaseStatus::NonSuccess { ty, .. } => ty,
            TestcaseStatus::Skipped { ty, .. } => ty,
        };
        *ty_mut = Some(ty.into());
        self
    }

    /// Sets the description (text node). No-op if this is a success case.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        let description_mut = match self {
            TestcaseStatus::Success => return self,
            TestcaseStatus::NonSuccess { description, .. } => description,
            TestcaseStatus::Skipped { description, .. } => description,
        };
        *description_mut = Some(description.into());
        self
    }
}

/// The kind of unsuccessful testcase.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NonSuccessKind {
    /// This is an expected failure. Read from `failure`.
    Failure,

    /// This is an unexpected error. Read from `error`.
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn testsuite_with_counts(tests: usize, errors: usize) -> Testsuite {
        let mut testsuite = Testsuite::new("suite");
        testsuite.tests = tests;
        testsuite.errors = errors;
        testsuite
    }

    #[test]
    fn add_testsuites_sums_counts() {
        let mut first = Testsuite::new("first");
        first
            .add_testcase(Testcase::new("a", TestcaseStatus::success()))
            .add_testcase(Testcase::new("b", TestcaseStatus::skipped()));
        let mut second = Testsuite::new("second");
        second.add_testcases([
            Testcase::new("c", TestcaseStatus::non_success(NonSuccessKind::Failure)),
            Testcase::new("d", TestcaseStatus::non_success(NonSuccessKind::Error)),
        ]);

        let mut report = Report::new();
        report.add_testsuites([first, second]);

        assert_eq!(report.tests, 4);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures, 1);
        assert_eq!(report.errors, 1);
        let names: Vec<_> = report.testcases().map(|testcase| testcase.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
    }

    #[test]
    fn add_testsuites_saturates_counts() {
        let mut report = Report::new();
        report.add_testsuites([
            testsuite_with_counts(usize::MAX, usize::MAX),
            testsuite_with_counts(2, 1),
        ]);

        assert_eq!(report.tests, usize::MAX);
        assert_eq!(report.errors, usize::MAX);
    }
}
