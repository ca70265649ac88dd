// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summarize JUnit XML reports from Espresso test runs.
//!
//! `espresso-summary <REPORT>` prints a headline with the success rate of the run, followed by one
//! line per test case, for quick scanning in CI logs.

#![warn(missing_docs)]

mod dispatch;
mod errors;
pub mod exit_codes;
pub mod loader;
mod output;
pub mod summary;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
pub use output::{OutputContext, OutputWriter, StderrStyles, COLOR_ENV, LOG_ENV};
