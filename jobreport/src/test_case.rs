// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The interface a test exposes to the report that tracks it.

use crate::logging::SharedTestLogger;

/// A test case, as seen by a [`TestReport`](crate::report::TestReport).
///
/// Tests are owned and run by the scheduler. The report reads their identity and return code, and
/// swaps their logger for a dedicated one between `start` and `stop`.
pub trait TestCase {
    /// The stable identity of the test.
    ///
    /// Dynamic tests generated at run time use the form `<basename>:<hook name>`.
    fn id(&self) -> &str;

    /// The display name of the test.
    fn basename(&self) -> &str;

    /// A short name for the test, used to name its logger.
    fn short_name(&self) -> &str;

    /// The command line that runs the test, rendered as a string.
    fn as_command(&self) -> String;

    /// The exit code of the test process, set by the scheduler once the process has exited.
    fn return_code(&self) -> Option<i32>;

    /// The logger currently installed on the test.
    fn logger(&self) -> SharedTestLogger;

    /// Installs `logger` on the test, returning the logger it replaces.
    fn replace_logger(&mut self, logger: SharedTestLogger) -> SharedTestLogger;
}
