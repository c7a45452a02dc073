// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use jobreport::{
    errors::ReportError,
    logging::{
        JobLogger, LogHandler, NullTestLogger, SharedLogHandler, SharedTestLogger, TestLogger,
    },
    report::TestReport,
    test_case::TestCase,
};
use std::{
    io,
    sync::{
        Arc, Once,
        atomic::{AtomicUsize, Ordering},
    },
};
use tracing::Level;

pub(crate) fn test_init() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        // Another test binary may already have installed a subscriber.
        _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// A test run by the fixture scheduler.
#[derive(Debug)]
pub(crate) struct FixtureTest {
    id: String,
    return_code: Option<i32>,
    logger: SharedTestLogger,
}

impl FixtureTest {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            return_code: None,
            logger: Arc::new(NullTestLogger),
        }
    }

    pub(crate) fn dynamic(basename: &str, hook: &str) -> Self {
        Self::new(format!("{basename}:{hook}"))
    }

    pub(crate) fn finish(&mut self, return_code: i32) {
        self.return_code = Some(return_code);
    }
}

impl TestCase for FixtureTest {
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

/// A job logger whose test loggers share one close counter.
#[derive(Debug)]
pub(crate) struct FixtureJobLogger {
    name: String,
    allocated: AtomicUsize,
    handler: Arc<CountingHandler>,
}

impl FixtureJobLogger {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            allocated: AtomicUsize::new(0),
            handler: Arc::new(CountingHandler::default()),
        }
    }

    pub(crate) fn allocated(&self) -> usize {
        self.allocated.load(Ordering::SeqCst)
    }

    pub(crate) fn closed(&self) -> usize {
        self.handler.closes.load(Ordering::SeqCst)
    }
}

impl JobLogger for FixtureJobLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn new_test_logger(
        &self,
        _short_name: &str,
        _basename: &str,
        _command: &str,
        _parent: &SharedTestLogger,
    ) -> SharedTestLogger {
        let n = self.allocated.fetch_add(1, Ordering::SeqCst);
        Arc::new(FixtureTestLogger {
            url: format!("http://logkeeper/build/{}/test/{n}", self.name),
            handler: self.handler.clone(),
        })
    }
}

#[derive(Debug)]
struct FixtureTestLogger {
    url: String,
    handler: Arc<CountingHandler>,
}

impl TestLogger for FixtureTestLogger {
    fn url_endpoint(&self) -> Option<&str> {
        Some(&self.url)
    }

    fn handlers(&self) -> Vec<SharedLogHandler> {
        vec![self.handler.clone()]
    }
}

#[derive(Debug, Default)]
struct CountingHandler {
    closes: AtomicUsize,
}

impl LogHandler for CountingHandler {
    fn close(&self) -> io::Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// The outcome a fixture test is driven to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, test_strategy::Arbitrary)]
pub(crate) enum FixtureOutcome {
    Pass,
    Fail,
    Error,
    /// Started, but never stopped or given an outcome.
    Interrupted,
}

impl FixtureOutcome {
    /// Drives `test` through the lifecycle calls a scheduler makes for this outcome.
    pub(crate) fn drive(
        self,
        report: &TestReport,
        test: &mut FixtureTest,
    ) -> Result<(), ReportError> {
        let is_dynamic = test.id().contains(':');
        report.start(test, is_dynamic);
        match self {
            Self::Pass => {
                test.finish(0);
                report.add_success(test)?;
            }
            Self::Fail => {
                test.finish(1);
                report.add_failure(test)?;
            }
            Self::Error => {
                test.finish(2);
                report.add_error(test)?;
            }
            Self::Interrupted => return Ok(()),
        }
        report.stop(test)
    }
}
