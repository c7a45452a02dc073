// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::TestReport;
use crate::{
    errors::{IncompleteField, ReportError},
    record::TestRecord,
    time::Timestamp,
};
use jobreport_metadata::{ReportFailureStatus, ReportFile, TestResultSummary, TestStatus};

/// How statuses are rewritten when a report is converted to a [`ReportFile`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StatusConversion {
    /// Statuses are written as recorded.
    #[default]
    Preserve,

    /// Statuses are collapsed for external consumers.
    ///
    /// Failed and errored tests are written with the given failure status, except for dynamic
    /// tests, which are always written as `fail`. Interrupted tests are written as `fail`.
    ConvertFailures(ReportFailureStatus),
}

impl StatusConversion {
    /// Returns the status written for a record with the given status.
    pub fn convert(self, status: TestStatus, is_dynamic: bool) -> TestStatus {
        let Self::ConvertFailures(failure_status) = self else {
            return status;
        };
        match status {
            TestStatus::Fail | TestStatus::Error if is_dynamic => TestStatus::Fail,
            TestStatus::Fail | TestStatus::Error => failure_status.test_status(),
            // Report files can't distinguish interrupted tests from failed ones yet.
            TestStatus::Timeout => TestStatus::Fail,
            TestStatus::Pass | TestStatus::SilentFail => status,
        }
    }
}

impl TestReport {
    /// Produces the persisted form of this report.
    ///
    /// Every record must be complete. Reports that may contain running or interrupted tests
    /// should be [combined](Self::combine) first, which repairs them.
    pub fn to_report_file(&self, conversion: StatusConversion) -> Result<ReportFile, ReportError> {
        let inner = self.lock_inner();
        let results = inner
            .records
            .iter()
            .map(|record| record_to_summary(record, conversion))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReportFile {
            results,
            failures: inner.counts.failures(),
        })
    }

    /// Reloads a report from its persisted form.
    ///
    /// A test is considered dynamic if its identity contains
    /// [`TestResultSummary::DYNAMIC_SEPARATOR`].
    pub fn from_report_file(report_file: &ReportFile) -> TestReport {
        let records: Vec<_> = report_file.results.iter().map(summary_to_record).collect();
        let dynamic = records.iter().filter(|record| record.is_dynamic).count();
        TestReport::from_records(records, dynamic)
    }
}

fn record_to_summary(
    record: &TestRecord,
    conversion: StatusConversion,
) -> Result<TestResultSummary, ReportError> {
    let incomplete = |missing| ReportError::IncompleteRecord {
        test_id: record.test_id.clone(),
        missing,
    };
    let end_time = record.end_time.ok_or_else(|| incomplete(IncompleteField::EndTime))?;
    let status = record.status.ok_or_else(|| incomplete(IncompleteField::Status))?;
    let exit_code = record
        .return_code
        .ok_or_else(|| incomplete(IncompleteField::ReturnCode))?;

    let mut summary = TestResultSummary {
        test_file: record.test_id.clone(),
        status: conversion.convert(status, record.is_dynamic),
        exit_code,
        start: record.start_time.as_secs_f64(),
        end: end_time.as_secs_f64(),
        elapsed: end_time.seconds_since(record.start_time),
        url: None,
        url_raw: None,
    };
    if let Some(url) = &record.url_endpoint {
        summary.set_url(url.as_str());
    }
    Ok(summary)
}

fn summary_to_record(summary: &TestResultSummary) -> TestRecord {
    let mut record = TestRecord::new(
        summary.test_file.clone(),
        summary.is_dynamic(),
        Timestamp::from_secs_f64(summary.start),
    );
    record.end_time = Some(Timestamp::from_secs_f64(summary.end));
    record.status = Some(summary.status);
    record.return_code = Some(summary.exit_code);
    record.url_endpoint = summary.url.clone();
    record
}
