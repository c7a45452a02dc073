// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable summaries of a run.

use crate::report::TestReport;
use std::{fmt, time::Duration};

/// Summary statistics of one execution of a suite.
///
/// Interrupted tests are counted as failed: they had started, so they weren't skipped, and they
/// never finished, so they can't have succeeded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReportSummary {
    /// The number of tests that ran.
    pub num_run: usize,

    /// The wall-clock time the execution took.
    pub time_taken: Duration,

    /// The number of tests that passed.
    pub num_succeeded: usize,

    /// The number of scheduled tests that never started.
    pub num_skipped: usize,

    /// The number of tests that failed or were interrupted.
    pub num_failed: usize,

    /// The number of tests that errored.
    pub num_errored: usize,

    /// Failed and interrupted tests, with their exit codes.
    pub failed_tests: Vec<(String, Option<i32>)>,

    /// Tests that errored.
    pub errored_tests: Vec<String>,
}

impl ReportSummary {
    /// Summarizes `report`, for an execution that scheduled `num_tests` tests and took
    /// `time_taken`.
    ///
    /// Dynamic tests are not scheduled ahead of time, so they are added to `num_tests` when
    /// computing the number of skipped tests.
    pub fn from_report(report: &TestReport, num_tests: usize, time_taken: Duration) -> Self {
        let counts = report.counts();
        let num_failed = counts.failed + counts.interrupted;
        let num_run = counts.succeeded + counts.errored + num_failed;
        let num_skipped = (num_tests + counts.dynamic).saturating_sub(num_run);

        let failed_tests = report
            .get_failed()
            .into_iter()
            .chain(report.get_interrupted())
            .map(|record| (record.test_id, record.return_code))
            .collect();
        let errored_tests = report
            .get_errored()
            .into_iter()
            .map(|record| record.test_id)
            .collect();

        Self {
            num_run,
            time_taken,
            num_succeeded: counts.succeeded,
            num_skipped,
            num_failed,
            num_errored: counts.errored,
            failed_tests,
            errored_tests,
        }
    }

    /// Returns true if every scheduled test ran and passed.
    pub fn all_passed(&self) -> bool {
        self.num_succeeded == self.num_run && self.num_skipped == 0
    }

    /// Adds the statistics of two summaries, such as those of repeated executions.
    pub fn combine(&self, other: &Self) -> Self {
        Self {
            num_run: self.num_run + other.num_run,
            time_taken: self.time_taken + other.time_taken,
            num_succeeded: self.num_succeeded + other.num_succeeded,
            num_skipped: self.num_skipped + other.num_skipped,
            num_failed: self.num_failed + other.num_failed,
            num_errored: self.num_errored + other.num_errored,
            failed_tests: [&self.failed_tests[..], &other.failed_tests[..]].concat(),
            errored_tests: [&self.errored_tests[..], &other.errored_tests[..]].concat(),
        }
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.time_taken.as_secs_f64();
        if self.all_passed() {
            return write!(f, "All {} test(s) passed in {secs:0.2} seconds.", self.num_run);
        }

        write!(
            f,
            "{} test(s) ran in {secs:0.2} seconds ({} succeeded, {} were skipped, {} failed, {} errored)",
            self.num_run, self.num_succeeded, self.num_skipped, self.num_failed, self.num_errored,
        )?;

        if self.num_failed > 0 {
            write!(f, "\nThe following tests failed (with exit code):")?;
            for (test_id, return_code) in &self.failed_tests {
                match return_code {
                    Some(return_code) => write!(f, "\n    {test_id} ({return_code})")?,
                    None => write!(f, "\n    {test_id}")?,
                }
            }
        }

        if self.num_errored > 0 {
            write!(f, "\nThe following tests had errors:")?;
            for test_id in &self.errored_tests {
                write!(f, "\n    {test_id}")?;
            }
        }

        Ok(())
    }
}
