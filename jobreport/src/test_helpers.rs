// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles for the scheduler and logging subsystem.

use crate::{
    logging::{
        FlushHandle, JobLogger, LogHandler, NullTestLogger, SharedLogHandler, SharedTestLogger,
        TestLogger,
    },
    report::TestReport,
    test_case::TestCase,
};
use std::{
    io,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

/// A test case whose return code and logger can be set directly.
#[derive(Clone, Debug)]
pub(crate) struct FakeTestCase {
    id: String,
    return_code: Option<i32>,
    logger: SharedTestLogger,
}

impl FakeTestCase {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            return_code: None,
            logger: Arc::new(NullTestLogger),
        }
    }

    pub(crate) fn set_return_code(&mut self, return_code: i32) -> &mut Self {
        self.return_code = Some(return_code);
        self
    }
}

impl TestCase for FakeTestCase {
    fn id(&self) -> &str {
        &self.id
    }

    fn basename(&self) -> &str {
        &self.id
    }

    fn short_name(&self) -> &str {
        self.id.rsplit('/').next().unwrap_or(&self.id)
    }

    fn as_command(&self) -> String {
        format!("mongo --nodb {}", self.id)
    }

    fn return_code(&self) -> Option<i32> {
        self.return_code
    }

    fn logger(&self) -> SharedTestLogger {
        self.logger.clone()
    }

    fn replace_logger(&mut self, logger: SharedTestLogger) -> SharedTestLogger {
        std::mem::replace(&mut self.logger, logger)
    }
}

/// A job logger that hands out loggers with a URL and a single counting handler.
#[derive(Debug, Default)]
pub(crate) struct RecordingJobLogger {
    created: Mutex<Vec<Arc<RecordingTestLogger>>>,
}

impl RecordingJobLogger {
    pub(crate) fn created(&self) -> Vec<Arc<RecordingTestLogger>> {
        self.created.lock().unwrap().clone()
    }
}

impl JobLogger for RecordingJobLogger {
    fn name(&self) -> &str {
        "job0"
    }

    fn new_test_logger(
        &self,
        short_name: &str,
        _basename: &str,
        command: &str,
        _parent: &SharedTestLogger,
    ) -> SharedTestLogger {
        let mut created = self.created.lock().unwrap();
        let logger = Arc::new(RecordingTestLogger {
            url: format!("http://logs.example/build/job0/test/{}", created.len()),
            short_name: short_name.to_owned(),
            command: command.to_owned(),
            handler: Arc::new(CountingHandler::default()),
        });
        created.push(logger.clone());
        logger
    }
}

#[derive(Debug)]
pub(crate) struct RecordingTestLogger {
    pub(crate) url: String,
    pub(crate) short_name: String,
    pub(crate) command: String,
    pub(crate) handler: Arc<CountingHandler>,
}

impl TestLogger for RecordingTestLogger {
    fn url_endpoint(&self) -> Option<&str> {
        Some(&self.url)
    }

    fn handlers(&self) -> Vec<SharedLogHandler> {
        vec![self.handler.clone()]
    }
}

/// A log handler that counts how many times it was closed.
#[derive(Debug, Default)]
pub(crate) struct CountingHandler {
    closes: AtomicUsize,
    fail: bool,
}

impl CountingHandler {
    pub(crate) fn failing() -> Self {
        Self {
            closes: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub(crate) fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl LogHandler for CountingHandler {
    fn close(&self) -> io::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(io::Error::other("log server unavailable"))
        } else {
            Ok(())
        }
    }
}

/// Returns a report backed by a [`RecordingJobLogger`] that closes handlers immediately.
pub(crate) fn recording_report() -> (TestReport, Arc<RecordingJobLogger>) {
    let job_logger = Arc::new(RecordingJobLogger::default());
    let report = TestReport::new(job_logger.clone(), FlushHandle::immediate());
    (report, job_logger)
}
