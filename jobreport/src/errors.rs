// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by jobreport.

use camino::Utf8PathBuf;
use config::ConfigError;
use std::fmt;
use thiserror::Error;

/// An error returned by a [`TestReport`](crate::report::TestReport) operation.
///
/// These indicate misuse by the caller: the report is left unchanged when one is returned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    /// No record exists for the test: `start` was never called on it.
    #[error("details for {basename} (id `{test_id}`) not found in the report")]
    TestNotFound {
        /// The identity of the test.
        test_id: String,
        /// The display name of the test.
        basename: String,
    },

    /// The outcome of a test was overridden before `stop` was called on it.
    #[error("stop was not called on {basename} (id `{test_id}`)")]
    NotStopped {
        /// The identity of the test.
        test_id: String,
        /// The display name of the test.
        basename: String,
    },

    /// `stop` found no logger to restore for the test.
    #[error("no original logger recorded for test `{test_id}`")]
    LoggerNotInstalled {
        /// The identity of the test.
        test_id: String,
    },

    /// A record has no representation in a report file because its lifecycle is incomplete.
    #[error("test `{test_id}` is incomplete (missing {missing}); combine reports before serializing")]
    IncompleteRecord {
        /// The identity of the test.
        test_id: String,
        /// The field that was unset.
        missing: IncompleteField,
    },
}

/// A record field that must be set for the record to be serialized.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IncompleteField {
    /// The end time: `stop` was not called.
    EndTime,
    /// The status: no outcome was recorded.
    Status,
    /// The return code: no outcome was recorded.
    ReturnCode,
}

impl fmt::Display for IncompleteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndTime => write!(f, "end time"),
            Self::Status => write!(f, "status"),
            Self::ReturnCode => write!(f, "return code"),
        }
    }
}

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse jobreport config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    err: ConfigError,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, err: ConfigError) -> Self {
        Self {
            config_file: config_file.into(),
            err,
        }
    }

    /// Returns the config file that failed to parse.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }
}

/// An error that occurred while reading a report file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportFileReadError {
    /// The report file does not exist.
    #[error("report file `{path}` not found")]
    NotFound {
        /// The path that was read.
        path: Utf8PathBuf,
    },

    /// Reading the report file failed.
    #[error("failed to read report file `{path}`")]
    Read {
        /// The path that was read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: std::io::Error,
    },

    /// The report file was not a valid report.
    #[error("failed to parse report file `{path}`")]
    Parse {
        /// The path that was read.
        path: Utf8PathBuf,
        /// The underlying deserialization error.
        #[source]
        error: serde_json::Error,
    },
}

/// An error that occurred while writing a report file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportFileWriteError {
    /// The combined report could not be serialized.
    #[error("failed to build report for `{path}`")]
    Build {
        /// The path being written.
        path: Utf8PathBuf,
        /// The underlying report error.
        #[source]
        error: ReportError,
    },

    /// JSON serialization failed.
    #[error("failed to serialize report for `{path}`")]
    Serialize {
        /// The path being written.
        path: Utf8PathBuf,
        /// The underlying serialization error.
        #[source]
        error: serde_json::Error,
    },

    /// Writing the file failed.
    #[error("failed to write report file `{path}`")]
    Write {
        /// The path being written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        error: atomicwrites::Error<std::io::Error>,
    },
}

/// An error that occurred while shutting down the [`LogFlusher`](crate::logging::LogFlusher).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlusherError {
    /// The flusher thread panicked.
    #[error("log flusher thread panicked: {message}")]
    WorkerPanic {
        /// The panic message, if one was available.
        message: String,
    },
}
