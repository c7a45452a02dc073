// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status and timing information for a single test.

use crate::time::Timestamp;
use jobreport_metadata::TestStatus;

/// The status and timing information of one run of a test.
///
/// Records are owned by exactly one [`TestReport`](crate::report::TestReport) and are only mutated
/// under that report's lock. Combined reports own copies.
#[derive(Clone, Debug, PartialEq)]
pub struct TestRecord {
    /// The identity of the test.
    pub test_id: String,

    /// True if the test was generated at run time rather than enumerated before the run.
    pub is_dynamic: bool,

    /// The time `start` was called.
    pub start_time: Timestamp,

    /// The time `stop` was called, if it has been.
    pub end_time: Option<Timestamp>,

    /// The outcome of the test, if one has been recorded.
    pub status: Option<TestStatus>,

    /// The exit code of the test process, recorded along with the outcome.
    pub return_code: Option<i32>,

    /// The location of the test's logs, as returned by the logging subsystem.
    pub url_endpoint: Option<String>,
}

impl TestRecord {
    /// The return code given to tests that were interrupted before an outcome was recorded.
    pub const INTERRUPTED_RETURN_CODE: i32 = -2;

    /// Creates a record for a test started at `start_time`.
    pub fn new(test_id: impl Into<String>, is_dynamic: bool, start_time: Timestamp) -> Self {
        Self {
            test_id: test_id.into(),
            is_dynamic,
            start_time,
            end_time: None,
            status: None,
            return_code: None,
            url_endpoint: None,
        }
    }

    /// Returns true if an outcome has been recorded for this test.
    ///
    /// A record that was only started is incomplete: the run may have been interrupted while the
    /// test was running.
    pub fn has_outcome(&self) -> bool {
        self.status.is_some() && self.return_code.is_some()
    }

    /// Returns the number of seconds the test took, if it has stopped.
    pub fn elapsed(&self) -> Option<f64> {
        self.end_time.map(|end_time| end_time.seconds_since(self.start_time))
    }

    /// Marks this record as interrupted if no outcome was recorded, and backfills its end time.
    ///
    /// Returns true if the record was changed.
    pub(crate) fn repair(&mut self, combining_time: Timestamp) -> bool {
        let mut repaired = false;
        if !self.has_outcome() {
            // The test might have passed had the run completed, but there is no way to know.
            self.status = Some(TestStatus::Timeout);
            self.return_code = Some(Self::INTERRUPTED_RETURN_CODE);
            repaired = true;
        }
        if self.end_time.is_none() {
            self.end_time = Some(combining_time);
            repaired = true;
        }
        repaired
    }
}
