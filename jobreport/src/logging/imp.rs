// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fmt, io, sync::Arc};

/// A shared, per-test logger.
pub type SharedTestLogger = Arc<dyn TestLogger>;

/// A shared log handler.
pub type SharedLogHandler = Arc<dyn LogHandler>;

/// The logger for a single job, which allocates loggers for the tests that run on it.
pub trait JobLogger: Send + Sync + fmt::Debug {
    /// The name of the job, used as a field in log lines emitted for it.
    fn name(&self) -> &str;

    /// Creates the logger for a single test.
    ///
    /// `parent` is the logger the test had before it was started. It is restored once the test
    /// stops.
    fn new_test_logger(
        &self,
        short_name: &str,
        basename: &str,
        command: &str,
        parent: &SharedTestLogger,
    ) -> SharedTestLogger;
}

/// A logger that captures the output of a single test.
pub trait TestLogger: Send + Sync + fmt::Debug {
    /// Returns the addressable location of this logger's output, if there is one.
    fn url_endpoint(&self) -> Option<&str>;

    /// Returns the handlers to close once the test has stopped.
    fn handlers(&self) -> Vec<SharedLogHandler>;
}

/// A destination for log output that must be flushed and closed when it is no longer in use.
pub trait LogHandler: Send + Sync + fmt::Debug {
    /// Flushes and closes this handler.
    ///
    /// This may block, for example on network I/O: it is only ever called from the
    /// [`LogFlusher`](super::LogFlusher) thread or with no report lock held.
    fn close(&self) -> io::Result<()>;
}

/// A job logger for reports that never run tests, such as combined or loaded reports.
#[derive(Clone, Debug, Default)]
pub struct NullJobLogger;

impl NullJobLogger {
    /// The name reported by [`JobLogger::name`].
    pub const NAME: &'static str = "executor";
}

impl JobLogger for NullJobLogger {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn new_test_logger(
        &self,
        _short_name: &str,
        _basename: &str,
        _command: &str,
        _parent: &SharedTestLogger,
    ) -> SharedTestLogger {
        Arc::new(NullTestLogger)
    }
}

/// A test logger with no endpoint and nothing to close.
#[derive(Clone, Debug, Default)]
pub struct NullTestLogger;

impl TestLogger for NullTestLogger {
    fn url_endpoint(&self) -> Option<&str> {
        None
    }

    fn handlers(&self) -> Vec<SharedLogHandler> {
        Vec::new()
    }
}
