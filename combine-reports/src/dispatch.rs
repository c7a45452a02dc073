// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError, Result,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use camino::Utf8PathBuf;
use clap::Parser;
use jobreport::{
    errors::ReportFileReadError,
    report::{StatusConversion, TestReport},
    report_file::{persist_report_file, read_report_file},
};
use jobreport_metadata::{CombineExitCode, TestStatus};
use std::io::Write;
use tracing::{debug, info};

/// The `--output-file` value that writes the combined report to stdout.
const STDOUT: &str = "-";

/// Combines JSON report files written by several jobs into one report.
#[derive(Debug, Parser)]
#[command(version, max_term_width = 100)]
pub struct CombineReportsApp {
    /// Report files to combine
    #[arg(value_name = "REPORT")]
    report_files: Vec<Utf8PathBuf>,

    /// File to write the combined report to, or `-` for stdout
    #[arg(short = 'o', long, value_name = "FILE", default_value = STDOUT)]
    output_file: Utf8PathBuf,

    /// Ignore any input report file that does not exist
    #[arg(short = 'm', long)]
    ignore_missing_reports: bool,

    /// Do not exit with a non-zero code if any test in the report fails
    #[arg(short = 'x', long)]
    no_report_exit: bool,

    #[clap(flatten)]
    output: OutputOpts,
}

impl CombineReportsApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code.
    pub fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        if self.report_files.is_empty() {
            return Err(ExpectedError::NoReportFiles);
        }

        let reports = self.read_reports()?;
        let combined = TestReport::combine(&reports);
        let report_file = combined.to_report_file(StatusConversion::Preserve)?;

        if self.output_file.as_str() == STDOUT {
            let json = report_file
                .to_json_string()
                .map_err(|error| ExpectedError::Serialize { error })?;
            let mut writer = output_writer.stdout_writer();
            writeln!(writer, "{json}")
                .and_then(|()| writer.flush())
                .map_err(|error| ExpectedError::StdoutWrite { error })?;
        } else {
            persist_report_file(&report_file, &self.output_file)?;
            debug!("wrote combined report to {}", self.output_file);
        }

        if self.no_report_exit {
            Ok(CombineExitCode::OK)
        } else {
            Ok(report_exit_code(&combined))
        }
    }

    fn read_reports(&self) -> Result<Vec<TestReport>> {
        let mut reports = Vec::with_capacity(self.report_files.len());
        for path in &self.report_files {
            match read_report_file(path) {
                Ok(report_file) => reports.push(TestReport::from_report_file(&report_file)),
                Err(ReportFileReadError::NotFound { .. }) if self.ignore_missing_reports => {
                    info!("Ignoring missing file {path}");
                }
                Err(error) => return Err(error.into()),
            }
        }
        Ok(reports)
    }
}

/// Returns the exit code for a combined report.
///
/// The run failed if any test has status `fail` or `timeout`. Tests that were converted to
/// `silentfail` don't fail the run.
pub fn report_exit_code(report: &TestReport) -> i32 {
    let failed = report
        .records()
        .iter()
        .any(|record| matches!(record.status, Some(TestStatus::Fail | TestStatus::Timeout)));
    if failed {
        CombineExitCode::TEST_RUN_FAILED
    } else {
        CombineExitCode::OK
    }
}
