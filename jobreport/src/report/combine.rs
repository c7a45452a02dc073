// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::TestReport;
use crate::{record::TestRecord, time::Timestamp};
use tracing::debug;

impl TestReport {
    /// Merges the records of several reports into a new, detached report.
    ///
    /// Records are copied in input order. Any record without an outcome is marked as interrupted,
    /// and any record without an end time is given the time of the combination. The input reports
    /// are not modified, other than being briefly locked one at a time.
    pub fn combine<'a>(reports: impl IntoIterator<Item = &'a TestReport>) -> TestReport {
        Self::combine_at(reports, Timestamp::now())
    }

    /// Like [`combine`](Self::combine), with the time of the combination supplied by the caller.
    pub fn combine_at<'a>(
        reports: impl IntoIterator<Item = &'a TestReport>,
        combining_time: Timestamp,
    ) -> TestReport {
        let mut records = Vec::new();
        let mut dynamic = 0;
        let mut report_count = 0;
        let mut repaired = 0;

        for report in reports {
            report_count += 1;
            let inner = report.lock_inner();
            dynamic += inner.counts.dynamic;
            records.extend(inner.records.iter().cloned().map(|mut record: TestRecord| {
                if record.repair(combining_time) {
                    debug!(
                        test_id = %record.test_id,
                        status = ?record.status,
                        "repaired incomplete record"
                    );
                    repaired += 1;
                }
                record
            }));
        }

        debug!(
            report_count,
            record_count = records.len(),
            repaired,
            %combining_time,
            "combined test reports"
        );
        TestReport::from_records(records, dynamic)
    }
}
