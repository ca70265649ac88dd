// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::num::ParseIntError;
use thiserror::Error;

/// An error that occurs while reading a [`Report`](crate::Report) from JUnit XML.
///
/// Returned by [`Report::deserialize`](crate::Report::deserialize) and
/// [`Report::deserialize_str`](crate::Report::deserialize_str).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeserializeError {
    /// The input could not be read, or was not valid UTF-8.
    #[error("error reading JUnit report")]
    Read(#[from] std::io::Error),

    /// The input was not well-formed XML.
    #[error("malformed XML in JUnit report")]
    Xml(#[from] quick_xml::Error),

    /// The document contained no root element.
    #[error("JUnit report is empty")]
    EmptyDocument,

    /// The root element was neither `testsuites` nor `testsuite`.
    #[error("expected root element `testsuites` or `testsuite`, found `{found}`")]
    UnexpectedRoot {
        /// The name of the element that was found.
        found: String,
    },

    /// The document ended while an element was still open.
    #[error("unexpected end of document inside `{element}`")]
    UnexpectedEof {
        /// The element that was not closed.
        element: &'static str,
    },

    /// A required attribute was missing.
    #[error("`{element}` is missing required attribute `{attribute}`")]
    MissingAttribute {
        /// The element the attribute was expected on.
        element: &'static str,

        /// The name of the missing attribute.
        attribute: &'static str,
    },

    /// A count attribute (`tests`, `skipped`, `errors` or `failures`) was not a non-negative
    /// integer.
    #[error("`{element}` attribute `{attribute}` has invalid count `{value}`")]
    InvalidCount {
        /// The element the attribute was found on.
        element: &'static str,

        /// The name of the attribute.
        attribute: &'static str,

        /// The value that failed to parse.
        value: String,

        /// The underlying error.
        #[source]
        error: ParseIntError,
    },
}
