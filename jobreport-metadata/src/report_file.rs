// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{ReportFailureStatusParseError, TestStatusParseError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The root of a persisted report file.
///
/// This is the `report.json` shape written at the end of a run, and read back when reports from
/// several runs are combined.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportFile {
    /// One entry per test record, in start order.
    pub results: Vec<TestResultSummary>,

    /// The number of failed, errored and interrupted tests.
    pub failures: usize,
}

impl ReportFile {
    /// Parses a report file from a JSON string.
    pub fn parse_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serializes this report file to a JSON string.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A single entry in [`ReportFile::results`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResultSummary {
    /// The identity of the test. Dynamic tests are named `<basename>:<hook name>`.
    pub test_file: String,

    /// The status of the test as seen by external consumers.
    pub status: TestStatus,

    /// The exit code of the test process.
    pub exit_code: i32,

    /// The time the test started, in seconds since the Unix epoch.
    pub start: f64,

    /// The time the test finished, in seconds since the Unix epoch.
    pub end: f64,

    /// `end - start`, in seconds.
    pub elapsed: f64,

    /// The location of the test's logs, if a log endpoint was allocated for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// The location of the test's raw logs: `url` followed by [`Self::RAW_URL_SUFFIX`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_raw: Option<String>,
}

impl TestResultSummary {
    /// The query string appended to `url` to form `url_raw`.
    pub const RAW_URL_SUFFIX: &'static str = "?raw=1";

    /// The separator between a dynamic test's basename and its hook name.
    pub const DYNAMIC_SEPARATOR: char = ':';

    /// Sets `url` and `url_raw` from a log endpoint.
    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        let url = url.into();
        self.url_raw = Some(format!("{url}{}", Self::RAW_URL_SUFFIX));
        self.url = Some(url);
        self
    }

    /// Returns true if the identity of this entry follows the dynamic test naming convention.
    pub fn is_dynamic(&self) -> bool {
        self.test_file.contains(Self::DYNAMIC_SEPARATOR)
    }
}

/// The status vocabulary of a test record.
///
/// An unset status (no terminal outcome recorded yet) is represented as `Option<TestStatus>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// The test passed.
    Pass,

    /// The test failed.
    Fail,

    /// The test failed, but its failure is reported without failing the run.
    #[serde(rename = "silentfail")]
    SilentFail,

    /// The test errored.
    Error,

    /// The test was interrupted before an outcome was recorded.
    Timeout,
}

impl TestStatus {
    /// Returns the string representation of every variant.
    pub fn variants() -> &'static [&'static str] {
        &["pass", "fail", "silentfail", "error", "timeout"]
    }

    /// Returns the string used for this status in report files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::SilentFail => "silentfail",
            Self::Error => "error",
            Self::Timeout => "timeout",
        }
    }

    /// Returns true if this status counts as a failure (`fail` or `silentfail`).
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Fail | Self::SilentFail)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestStatus {
    type Err = TestStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "pass" => Self::Pass,
            "fail" => Self::Fail,
            "silentfail" => Self::SilentFail,
            "error" => Self::Error,
            "timeout" => Self::Timeout,
            other => return Err(TestStatusParseError::new(other)),
        };
        Ok(status)
    }
}

/// The status that failed and errored non-dynamic tests are converted to in report files.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFailureStatus {
    /// Report failures as `fail`.
    #[default]
    Fail,

    /// Report failures as `silentfail`.
    #[serde(rename = "silentfail")]
    SilentFail,
}

impl ReportFailureStatus {
    /// Returns the string representation of every variant.
    pub fn variants() -> &'static [&'static str] {
        &["fail", "silentfail"]
    }

    /// Returns the [`TestStatus`] this failure status is written as.
    pub fn test_status(self) -> TestStatus {
        match self {
            Self::Fail => TestStatus::Fail,
            Self::SilentFail => TestStatus::SilentFail,
        }
    }
}

impl FromStr for ReportFailureStatus {
    type Err = ReportFailureStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fail" => Ok(Self::Fail),
            "silentfail" => Ok(Self::SilentFail),
            other => Err(ReportFailureStatusParseError::new(other)),
        }
    }
}

#[cfg(feature = "proptest1")]
mod proptest_impls {
    use super::*;
    use proptest::prelude::*;

    impl Arbitrary for TestStatus {
        type Parameters = ();
        type Strategy = BoxedStrategy<Self>;

        fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
            prop_oneof![
                Just(TestStatus::Pass),
                Just(TestStatus::Fail),
                Just(TestStatus::SilentFail),
                Just(TestStatus::Error),
                Just(TestStatus::Timeout),
            ]
            .boxed()
        }
    }
}
