// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use jobreport::errors::{ReportError, ReportFileReadError, ReportFileWriteError};
use jobreport_metadata::CombineExitCode;
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// The #[error()] strings are placeholder messages: the expected way to print out errors is with
// the display_to_stderr method, which colorizes errors.

/// An error that combine-reports knows how to report.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("no report files were specified")]
    NoReportFiles,
    #[error("failed to read report file")]
    ReportFileRead {
        #[from]
        error: ReportFileReadError,
    },
    #[error("failed to build combined report")]
    ReportBuild {
        #[from]
        error: ReportError,
    },
    #[error("failed to write combined report")]
    ReportFileWrite {
        #[from]
        error: ReportFileWriteError,
    },
    #[error("failed to write combined report to stdout")]
    StdoutWrite {
        #[source]
        error: std::io::Error,
    },
    #[error("failed to serialize combined report")]
    Serialize {
        #[source]
        error: serde_json::Error,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::NoReportFiles => CombineExitCode::NO_REPORTS,
            Self::ReportFileRead { .. }
            | Self::ReportBuild { .. }
            | Self::ReportFileWrite { .. }
            | Self::StdoutWrite { .. }
            | Self::Serialize { .. } => CombineExitCode::SETUP_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::NoReportFiles => {
                tracing::error!(
                    "no report files were specified\n(usage: {} [OPTIONS] REPORT...)",
                    "combine-reports".style(styles.bold)
                );
                None
            }
            Self::ReportFileRead { error } => {
                tracing::error!("{error}");
                error.source()
            }
            Self::ReportBuild { error } => {
                tracing::error!("failed to build combined report");
                Some(error as &dyn Error)
            }
            Self::ReportFileWrite { error } => {
                tracing::error!("{error}");
                error.source()
            }
            Self::StdoutWrite { error } => {
                tracing::error!("failed to write combined report to stdout");
                Some(error as &dyn Error)
            }
            Self::Serialize { error } => {
                tracing::error!("failed to serialize combined report");
                Some(error as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            tracing::error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
