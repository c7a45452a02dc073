// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Combines JSON report files written by several jobs into a single report.
//!
//! The exit code is [`CombineExitCode::TEST_RUN_FAILED`](jobreport_metadata::CombineExitCode)
//! if any test in the combined report has status `fail` or `timeout`. Tests with status
//! `silentfail` don't fail the run.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{OutputContext, OutputWriter, StderrStyles};
