// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-job test reports.
//!
//! A [`TestReport`] records the status and timing of every test run by one job. Many threads may
//! call into the same report concurrently: a single lock guards the records and the cached
//! counters derived from them.
//!
//! At the end of a run, [`TestReport::combine`] merges the reports for every job into one, and
//! [`TestReport::to_report_file`] produces the persisted form.

mod combine;
mod imp;
mod serialize;

pub use imp::*;
pub use serialize::*;
