// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read JUnit reports in Rust.
//!
//! This crate models the subset of JUnit/XUnit XML that CI tooling needs to summarize a run:
//! aggregate counts, testsuites and the status of each testcase.

#![warn(missing_docs)]

mod deserialize;
mod errors;
mod report;

pub use errors::*;
pub use report::*;
