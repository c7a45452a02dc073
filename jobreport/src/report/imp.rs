// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::ReportError,
    logging::{FlushHandle, JobLogger, NullJobLogger, SharedTestLogger},
    record::TestRecord,
    test_case::TestCase,
    time::Timestamp,
};
use jobreport_metadata::TestStatus;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::info;

/// Records test status and timing information for one job.
///
/// All methods take `&self`: share a report between the threads of a job with an [`Arc`].
#[derive(Debug)]
pub struct TestReport {
    job_logger: Arc<dyn JobLogger>,
    flusher: FlushHandle,
    inner: Mutex<ReportInner>,
    // Loggers replaced by `start`, keyed by test identity, to be restored by `stop`. This is not
    // part of combine or serialization. Lock order: `inner`, then `original_loggers`.
    original_loggers: Mutex<HashMap<String, SharedTestLogger>>,
}

impl TestReport {
    /// The command logged when a dynamic test is started.
    pub const DYNAMIC_COMMAND: &'static str = "(dynamic test case)";

    /// The return code recorded by [`set_error`](Self::set_error).
    pub const SET_ERROR_RETURN_CODE: i32 = 2;

    /// The return code recorded by [`set_failure`](Self::set_failure).
    pub const SET_FAILURE_RETURN_CODE: i32 = 1;

    /// Creates an empty report for a job.
    ///
    /// Test loggers are allocated through `job_logger`, and closed through `flusher` once their
    /// test stops.
    pub fn new(job_logger: Arc<dyn JobLogger>, flusher: FlushHandle) -> Self {
        Self {
            job_logger,
            flusher,
            inner: Mutex::new(ReportInner::default()),
            original_loggers: Mutex::new(HashMap::new()),
        }
    }

    /// Creates an empty report that is not attached to a job.
    ///
    /// Combined and loaded reports are detached: they never see lifecycle calls.
    pub fn detached() -> Self {
        Self::new(Arc::new(NullJobLogger), FlushHandle::immediate())
    }

    /// Creates a detached report owning `records`, recomputing the cached counters.
    pub(crate) fn from_records(records: Vec<TestRecord>, dynamic: usize) -> Self {
        let report = Self::detached();
        {
            let mut inner = report.lock_inner();
            inner.records = records;
            inner.counts.dynamic = dynamic;
            inner.recount();
        }
        report
    }

    /// Called immediately before `test` is run.
    ///
    /// Appends a new record for the test and installs a dedicated logger on it. The logger the
    /// test had before is restored by [`stop`](Self::stop).
    pub fn start<T: TestCase + ?Sized>(&self, test: &mut T, is_dynamic: bool) {
        let start_time = Timestamp::now();
        let command = if is_dynamic {
            Self::DYNAMIC_COMMAND.to_owned()
        } else {
            test.as_command()
        };
        info!(job = self.job_logger.name(), "Running {}...\n{}", test.basename(), command);

        let test_logger = self.job_logger.new_test_logger(
            test.short_name(),
            test.basename(),
            &command,
            &test.logger(),
        );

        let mut record = TestRecord::new(test.id(), is_dynamic, start_time);
        record.url_endpoint = test_logger.url_endpoint().map(str::to_owned);
        {
            let mut inner = self.lock_inner();
            inner.records.push(record);
            if is_dynamic {
                inner.counts.dynamic += 1;
            }
        }

        let original_logger = test.replace_logger(test_logger);
        self.lock_original_loggers()
            .insert(test.id().to_owned(), original_logger);
    }

    /// Called immediately after `test` has run and its process has exited.
    ///
    /// Records the end time, schedules the test's log handlers to be closed and restores the
    /// logger the test had before [`start`](Self::start).
    pub fn stop<T: TestCase + ?Sized>(&self, test: &mut T) -> Result<(), ReportError> {
        let (time_taken, original_logger) = {
            let mut inner = self.lock_inner();
            let record = inner.find_mut(test)?;
            let original_logger = self
                .lock_original_loggers()
                .remove(test.id())
                .ok_or_else(|| ReportError::LoggerNotInstalled {
                    test_id: test.id().to_owned(),
                })?;
            let end_time = Timestamp::now();
            record.end_time = Some(end_time);
            (end_time.seconds_since(record.start_time), original_logger)
        };
        info!(
            job = self.job_logger.name(),
            "{} ran in {:0.2} seconds.",
            test.basename(),
            time_taken
        );

        for handler in test.logger().handlers() {
            self.flusher.close_later(handler);
        }
        test.replace_logger(original_logger);
        Ok(())
    }

    /// Called when `test` raised an unexpected error during its execution.
    pub fn add_error<T: TestCase + ?Sized>(&self, test: &T) -> Result<(), ReportError> {
        self.add_outcome(test, TestStatus::Error)
    }

    /// Called when `test` failed during its execution.
    pub fn add_failure<T: TestCase + ?Sized>(&self, test: &T) -> Result<(), ReportError> {
        self.add_outcome(test, TestStatus::Fail)
    }

    /// Called when `test` executed successfully.
    pub fn add_success<T: TestCase + ?Sized>(&self, test: &T) -> Result<(), ReportError> {
        self.add_outcome(test, TestStatus::Pass)
    }

    /// Changes the outcome of a stopped test to an error.
    ///
    /// Returns [`ReportError::NotStopped`] if [`stop`](Self::stop) was not called on the test.
    pub fn set_error<T: TestCase + ?Sized>(&self, test: &T) -> Result<(), ReportError> {
        self.override_outcome(test, TestStatus::Error, Self::SET_ERROR_RETURN_CODE)
    }

    /// Changes the outcome of a stopped test to a failure, with return code
    /// [`SET_FAILURE_RETURN_CODE`](Self::SET_FAILURE_RETURN_CODE).
    ///
    /// Returns [`ReportError::NotStopped`] if [`stop`](Self::stop) was not called on the test.
    pub fn set_failure<T: TestCase + ?Sized>(&self, test: &T) -> Result<(), ReportError> {
        self.set_failure_with_return_code(test, Self::SET_FAILURE_RETURN_CODE)
    }

    /// Changes the outcome of a stopped test to a failure with the given return code.
    pub fn set_failure_with_return_code<T: TestCase + ?Sized>(
        &self,
        test: &T,
        return_code: i32,
    ) -> Result<(), ReportError> {
        self.override_outcome(test, TestStatus::Fail, return_code)
    }

    /// Returns true if no test failed, errored or was interrupted.
    pub fn was_successful(&self) -> bool {
        self.lock_inner().counts.is_successful()
    }

    /// Returns the cached counters.
    pub fn counts(&self) -> ReportCounts {
        self.lock_inner().counts
    }

    /// Returns the number of records in this report.
    pub fn len(&self) -> usize {
        self.lock_inner().records.len()
    }

    /// Returns true if this report has no records.
    pub fn is_empty(&self) -> bool {
        self.lock_inner().records.is_empty()
    }

    /// Returns a snapshot of every record, in start order.
    pub fn records(&self) -> Vec<TestRecord> {
        self.lock_inner().records.clone()
    }

    /// Returns the records of tests that executed successfully.
    pub fn get_successful(&self) -> Vec<TestRecord> {
        self.filter_records(|status| status == Some(TestStatus::Pass))
    }

    /// Returns the records of tests that failed, including silent failures.
    pub fn get_failed(&self) -> Vec<TestRecord> {
        self.filter_records(|status| status.is_some_and(TestStatus::is_failure))
    }

    /// Returns the records of tests that errored.
    pub fn get_errored(&self) -> Vec<TestRecord> {
        self.filter_records(|status| status == Some(TestStatus::Error))
    }

    /// Returns the records of tests whose execution was interrupted.
    pub fn get_interrupted(&self) -> Vec<TestRecord> {
        self.filter_records(|status| status == Some(TestStatus::Timeout))
    }

    /// Resets the report back to its initial, empty state.
    pub fn reset(&self) {
        *self.lock_inner() = ReportInner::default();
        self.lock_original_loggers().clear();
    }

    // ---
    // Helper methods
    // ---

    fn add_outcome<T: TestCase + ?Sized>(
        &self,
        test: &T,
        status: TestStatus,
    ) -> Result<(), ReportError> {
        let mut inner = self.lock_inner();
        let record = inner.find_mut(test)?;
        record.status = Some(status);
        record.return_code = test.return_code();
        inner.counts.add(status);
        Ok(())
    }

    fn override_outcome<T: TestCase + ?Sized>(
        &self,
        test: &T,
        status: TestStatus,
        return_code: i32,
    ) -> Result<(), ReportError> {
        let mut inner = self.lock_inner();
        let record = inner.find_mut(test)?;
        if record.end_time.is_none() {
            return Err(ReportError::NotStopped {
                test_id: test.id().to_owned(),
                basename: test.basename().to_owned(),
            });
        }
        record.status = Some(status);
        record.return_code = Some(return_code);

        // An override can move a record between any two counters.
        inner.recount();
        Ok(())
    }

    fn filter_records(&self, mut f: impl FnMut(Option<TestStatus>) -> bool) -> Vec<TestRecord> {
        self.lock_inner()
            .records
            .iter()
            .filter(|record| f(record.status))
            .cloned()
            .collect()
    }

    // Every critical section leaves the records and counters consistent, so a panic on another
    // thread doesn't invalidate them.
    pub(super) fn lock_inner(&self) -> MutexGuard<'_, ReportInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_original_loggers(&self) -> MutexGuard<'_, HashMap<String, SharedTestLogger>> {
        self.original_loggers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// The state guarded by a report's lock.
#[derive(Clone, Debug, Default)]
pub(super) struct ReportInner {
    pub(super) records: Vec<TestRecord>,
    pub(super) counts: ReportCounts,
}

impl ReportInner {
    fn find_mut<T: TestCase + ?Sized>(&mut self, test: &T) -> Result<&mut TestRecord, ReportError> {
        let test_id = test.id();
        // The most recently started record for an identity is the one still running.
        self.records
            .iter_mut()
            .rev()
            .find(|record| record.test_id == test_id)
            .ok_or_else(|| ReportError::TestNotFound {
                test_id: test_id.to_owned(),
                basename: test.basename().to_owned(),
            })
    }

    fn recount(&mut self) {
        self.counts = ReportCounts::from_records(&self.records, self.counts.dynamic);
    }
}

/// Counters cached by a [`TestReport`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportCounts {
    /// The number of dynamic tests started.
    pub dynamic: usize,

    /// The number of tests that passed.
    pub succeeded: usize,

    /// The number of tests that failed or silently failed.
    pub failed: usize,

    /// The number of tests that errored.
    pub errored: usize,

    /// The number of tests that were interrupted.
    pub interrupted: usize,
}

impl ReportCounts {
    /// Computes the outcome counters from a set of records.
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a TestRecord>,
        dynamic: usize,
    ) -> Self {
        let mut counts = Self {
            dynamic,
            ..Self::default()
        };
        for status in records.into_iter().filter_map(|record| record.status) {
            counts.add(status);
        }
        counts
    }

    /// The number of tests that failed, errored or were interrupted.
    pub fn failures(&self) -> usize {
        self.failed + self.errored + self.interrupted
    }

    /// Returns true if no test failed, errored or was interrupted.
    pub fn is_successful(&self) -> bool {
        self.failures() == 0
    }

    fn add(&mut self, status: TestStatus) {
        match status {
            TestStatus::Pass => self.succeeded += 1,
            TestStatus::Fail | TestStatus::SilentFail => self.failed += 1,
            TestStatus::Error => self.errored += 1,
            TestStatus::Timeout => self.interrupted += 1,
        }
    }
}
