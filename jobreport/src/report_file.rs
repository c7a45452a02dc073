// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading and writing report files.
//!
//! A report file is the JSON form of a [`ReportFile`]. Files are written atomically, so a reader
//! never observes a partially written report.

use crate::{
    config::ReportConfig,
    errors::{ReportFileReadError, ReportFileWriteError},
    report::{StatusConversion, TestReport},
};
use camino::{Utf8Path, Utf8PathBuf};
use jobreport_metadata::{ReportFailureStatus, ReportFile};
use std::io::{self, Write};
use tracing::{debug, info};

/// Combines `reports` and writes the result to `path` for external consumers.
///
/// Failed and errored tests are written with `failure_status`. Returns the report file that was
/// written.
pub fn write_report_file<'a>(
    reports: impl IntoIterator<Item = &'a TestReport>,
    path: &Utf8Path,
    failure_status: ReportFailureStatus,
) -> Result<ReportFile, ReportFileWriteError> {
    let combined = TestReport::combine(reports);
    let report_file = combined
        .to_report_file(StatusConversion::ConvertFailures(failure_status))
        .map_err(|error| ReportFileWriteError::Build {
            path: path.to_owned(),
            error,
        })?;

    persist_report_file(&report_file, path)?;
    info!(
        results = report_file.results.len(),
        failures = report_file.failures,
        "wrote report file to {path}"
    );
    Ok(report_file)
}

/// Writes the report file configured in `config`, if any.
///
/// Returns the path written to, or `None` if no report file is configured.
pub fn write_configured_report_file<'a>(
    reports: impl IntoIterator<Item = &'a TestReport>,
    config: &ReportConfig,
) -> Result<Option<Utf8PathBuf>, ReportFileWriteError> {
    let Some(path) = config.report_file() else {
        debug!("no report file configured, skipping write");
        return Ok(None);
    };
    write_report_file(reports, &path, config.failure_status())?;
    Ok(Some(path))
}

/// Atomically writes `report_file` as JSON to `path`.
pub fn persist_report_file(
    report_file: &ReportFile,
    path: &Utf8Path,
) -> Result<(), ReportFileWriteError> {
    let json = report_file
        .to_json_string()
        .map_err(|error| ReportFileWriteError::Serialize {
            path: path.to_owned(),
            error,
        })?;

    atomicwrites::AtomicFile::new(path, atomicwrites::AllowOverwrite)
        .write(|file| file.write_all(json.as_bytes()))
        .map_err(|error| ReportFileWriteError::Write {
            path: path.to_owned(),
            error,
        })
}

/// Reads a report file from `path`.
pub fn read_report_file(path: &Utf8Path) -> Result<ReportFile, ReportFileReadError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            return Err(ReportFileReadError::NotFound {
                path: path.to_owned(),
            });
        }
        Err(error) => {
            return Err(ReportFileReadError::Read {
                path: path.to_owned(),
                error,
            });
        }
    };

    ReportFile::parse_json(&contents).map_err(|error| ReportFileReadError::Parse {
        path: path.to_owned(),
        error,
    })
}
