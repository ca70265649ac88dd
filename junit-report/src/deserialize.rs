// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read a `Report` from JUnit XML.

use crate::{DeserializeError, NonSuccessKind, Report, Testcase, TestcaseStatus, Testsuite};
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::time::Duration;

static TESTSUITES_TAG: &str = "testsuites";
static TESTSUITE_TAG: &str = "testsuite";
static TESTCASE_TAG: &str = "testcase";
static FAILURE_TAG: &str = "failure";
static ERROR_TAG: &str = "error";
static SKIPPED_TAG: &str = "skipped";

type Result<T, E = DeserializeError> = std::result::Result<T, E>;

pub(crate) fn deserialize_report(input: &str) -> Result<Report> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(true);

    loop {
        match reader.read_event()? {
            Event::Start(start) => return deserialize_root(&mut reader, &start, false),
            Event::Empty(start) => return deserialize_root(&mut reader, &start, true),
            Event::Eof => return Err(DeserializeError::EmptyDocument),
            // The XML declaration, comments, doctypes and processing instructions.
            _ => {}
        }
    }
}

fn deserialize_root(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    empty: bool,
) -> Result<Report> {
    if is_tag(start, TESTSUITES_TAG) {
        deserialize_testsuites(reader, start, empty)
    } else if is_tag(start, TESTSUITE_TAG) {
        let testsuite = deserialize_testsuite(reader, start, empty)?;
        let mut report = Report::new();
        if let Some(time) = testsuite.time {
            report.set_time(time);
        }
        report.add_testsuite(testsuite);
        Ok(report)
    } else {
        Err(DeserializeError::UnexpectedRoot {
            found: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        })
    }
}

fn deserialize_testsuites(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    empty: bool,
) -> Result<Report> {
    let attributes = Attributes::new(TESTSUITES_TAG, start)?;

    let mut report = Report::new();
    if let Some(name) = attributes.get("name") {
        report.set_name(name);
    }
    if let Some(time) = attributes.time() {
        report.set_time(time);
    }

    if !empty {
        loop {
            match reader.read_event()? {
                Event::Start(start) if is_tag(&start, TESTSUITE_TAG) => {
                    report.add_testsuite(deserialize_testsuite(reader, &start, false)?);
                }
                Event::Empty(start) if is_tag(&start, TESTSUITE_TAG) => {
                    report.add_testsuite(deserialize_testsuite(reader, &start, true)?);
                }
                Event::Start(start) => skip_element(reader, &start)?,
                Event::End(_) => break,
                Event::Eof => {
                    return Err(DeserializeError::UnexpectedEof {
                        element: TESTSUITES_TAG,
                    })
                }
                _ => {}
            }
        }
    }

    // Counts on the root element win over the sums of the testsuites.
    let Counts {
        tests,
        skipped,
        errors,
        failures,
    } = Counts::from_attributes(&attributes)?;
    report.tests = tests.unwrap_or(report.tests);
    report.skipped = skipped.unwrap_or(report.skipped);
    report.errors = errors.unwrap_or(report.errors);
    report.failures = failures.unwrap_or(report.failures);

    Ok(report)
}

fn deserialize_testsuite(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    empty: bool,
) -> Result<Testsuite> {
    let attributes = Attributes::new(TESTSUITE_TAG, start)?;

    let mut testsuite = Testsuite::new(attributes.get("name").unwrap_or_default());
    if let Some(time) = attributes.time() {
        testsuite.set_time(time);
    }

    if !empty {
        loop {
            match reader.read_event()? {
                Event::Start(start) if is_tag(&start, TESTCASE_TAG) => {
                    testsuite.add_testcase(deserialize_testcase(reader, &start, false)?);
                }
                Event::Empty(start) if is_tag(&start, TESTCASE_TAG) => {
                    testsuite.add_testcase(deserialize_testcase(reader, &start, true)?);
                }
                // properties, system-out, system-err and anything else tools add.
                Event::Start(start) => skip_element(reader, &start)?,
                Event::End(_) => break,
                Event::Eof => {
                    return Err(DeserializeError::UnexpectedEof {
                        element: TESTSUITE_TAG,
                    })
                }
                _ => {}
            }
        }
    }

    let Counts {
        tests,
        skipped,
        errors,
        failures,
    } = Counts::from_attributes(&attributes)?;
    testsuite.tests = tests.unwrap_or(testsuite.tests);
    testsuite.skipped = skipped.unwrap_or(testsuite.skipped);
    testsuite.errors = errors.unwrap_or(testsuite.errors);
    testsuite.failures = failures.unwrap_or(testsuite.failures);

    Ok(testsuite)
}

fn deserialize_testcase(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    empty: bool,
) -> Result<Testcase> {
    let attributes = Attributes::new(TESTCASE_TAG, start)?;

    let mut testcase = Testcase::new(attributes.required("name")?, TestcaseStatus::success());
    if let Some(classname) = attributes.get("classname") {
        testcase.set_classname(classname);
    }
    if let Some(time) = attributes.time() {
        testcase.set_time(time);
    }

    if !empty {
        loop {
            let status = match reader.read_event()? {
                Event::Start(start) => deserialize_status(reader, &start, false)?,
                Event::Empty(start) => deserialize_status(reader, &start, true)?,
                Event::End(_) => break,
                Event::Eof => {
                    return Err(DeserializeError::UnexpectedEof {
                        element: TESTCASE_TAG,
                    })
                }
                _ => None,
            };

            if let Some(status) = status {
                if supersedes(&status, &testcase.status) {
                    testcase.status = status;
                }
            }
        }
    }

    Ok(testcase)
}

/// Reads a child of `testcase`. Returns `None` (after skipping the element) if the child doesn't
/// describe a status, e.g. `system-out` or `flakyFailure`.
fn deserialize_status(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    empty: bool,
) -> Result<Option<TestcaseStatus>> {
    let (tag, mut status) = if is_tag(start, FAILURE_TAG) {
        (
            FAILURE_TAG,
            TestcaseStatus::non_success(NonSuccessKind::Failure),
        )
    } else if is_tag(start, ERROR_TAG) {
        (ERROR_TAG, TestcaseStatus::non_success(NonSuccessKind::Error))
    } else if is_tag(start, SKIPPED_TAG) {
        (SKIPPED_TAG, TestcaseStatus::skipped())
    } else {
        if !empty {
            skip_element(reader, start)?;
        }
        return Ok(None);
    };

    let attributes = Attributes::new(tag, start)?;
    if let Some(message) = attributes.get("message") {
        status.set_message(message);
    }
    if let Some(ty) = attributes.get("type") {
        status.set_type(ty);
    }
    if !empty {
        if let Some(description) = read_description(reader, tag)? {
            status.set_description(description);
        }
    }

    Ok(Some(status))
}

/// The first failure or error on a testcase determines its status. A skip only applies if nothing
/// worse was recorded.
fn supersedes(new: &TestcaseStatus, current: &TestcaseStatus) -> bool {
    match (current, new) {
        (TestcaseStatus::Success, _) => true,
        (TestcaseStatus::Skipped { .. }, TestcaseStatus::NonSuccess { .. }) => true,
        _ => false,
    }
}

/// Reads the text content of an element up to and including its end tag.
fn read_description(reader: &mut Reader<&[u8]>, element: &'static str) -> Result<Option<String>> {
    let mut description = String::new();
    let mut depth = 0_usize;

    loop {
        match reader.read_event()? {
            Event::Text(text) => description.push_str(&text.unescape()?),
            Event::CData(cdata) => {
                description.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
            }
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(DeserializeError::UnexpectedEof { element }),
            _ => {}
        }
    }

    Ok((!description.is_empty()).then_some(description))
}

fn skip_element(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<()> {
    reader.read_to_end(start.name())?;
    Ok(())
}

fn is_tag(start: &BytesStart<'_>, tag: &str) -> bool {
    start.local_name().as_ref() == tag.as_bytes()
}

/// The unescaped attributes of a single element.
struct Attributes {
    element: &'static str,
    values: Vec<(String, String)>,
}

impl Attributes {
    fn new(element: &'static str, start: &BytesStart<'_>) -> Result<Self> {
        let mut values = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            values.push((key, value));
        }
        Ok(Self { element, values })
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn required(&self, attribute: &'static str) -> Result<&str> {
        self.get(attribute)
            .ok_or(DeserializeError::MissingAttribute {
                element: self.element,
                attribute,
            })
    }

    fn count(&self, attribute: &'static str) -> Result<Option<usize>> {
        self.get(attribute)
            .map(|value| {
                value
                    .trim()
                    .parse()
                    .map_err(|error| DeserializeError::InvalidCount {
                        element: self.element,
                        attribute,
                        value: value.to_owned(),
                        error,
                    })
            })
            .transpose()
    }

    // Times are in seconds, possibly fractional. A value that isn't a non-negative number, such as a
    // locale-formatted `1,234.5`, is dropped.
    fn time(&self) -> Option<Duration> {
        let value = self.get("time")?;
        let time = value
            .trim()
            .parse::<f64>()
            .map_err(|error| error.to_string())
            .and_then(|secs| Duration::try_from_secs_f64(secs).map_err(|error| error.to_string()));
        match time {
            Ok(time) => Some(time),
            Err(error) => {
                tracing::debug!("ignoring `{}` time `{value}`: {error}", self.element);
                None
            }
        }
    }
}

/// Counts declared as attributes. A missing attribute means the count is derived from children.
struct Counts {
    tests: Option<usize>,
    skipped: Option<usize>,
    errors: Option<usize>,
    failures: Option<usize>,
}

impl Counts {
    fn from_attributes(attributes: &Attributes) -> Result<Self> {
        Ok(Self {
            tests: attributes.count("tests")?,
            skipped: attributes.count("skipped")?,
            errors: attributes.count("errors")?,
            failures: attributes.count("failures")?,
        })
    }
}
