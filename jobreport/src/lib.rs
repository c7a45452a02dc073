// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for jobreport: a passive, thread-safe accumulator of test outcomes.
//!
//! A scheduler running tests in parallel owns one [`TestReport`](report::TestReport) per job and
//! calls its lifecycle methods as tests start, finish and stop. At the end of the run, the reports
//! for every job are [combined](report::TestReport::combine) into a single report, which is then
//! written out as a [`ReportFile`](jobreport_metadata::ReportFile).

pub mod config;
pub mod errors;
pub mod logging;
pub mod record;
pub mod report;
pub mod report_file;
pub mod summary;
pub mod test_case;
#[cfg(test)]
mod test_helpers;
pub mod time;
