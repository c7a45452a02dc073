// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::*;
use camino_tempfile::tempdir;
use color_eyre::eyre::{Result, ensure};
use jobreport::{
    config::ReportConfig,
    logging::{FlushHandle, LogFlusher},
    record::TestRecord,
    report::{ReportCounts, StatusConversion, TestReport},
    report_file::{read_report_file, write_configured_report_file},
    summary::ReportSummary,
};
use jobreport_metadata::{ReportFailureStatus, TestStatus};
use pretty_assertions::assert_eq;
use std::{
    sync::{Arc, Barrier},
    time::Duration,
};

const THREADS: usize = 8;
const TESTS_PER_THREAD: usize = 25;

fn outcome_for(i: usize) -> FixtureOutcome {
    match i % 10 {
        0 => FixtureOutcome::Fail,
        1 => FixtureOutcome::Error,
        2 => FixtureOutcome::Interrupted,
        _ => FixtureOutcome::Pass,
    }
}

#[test]
fn concurrent_workers_share_one_report() -> Result<()> {
    test_init();

    let flusher = LogFlusher::new();
    let job_logger = Arc::new(FixtureJobLogger::new("job0"));
    let report = TestReport::new(job_logger.clone(), flusher.handle());

    std::thread::scope(|s| {
        for thread in 0..THREADS {
            let report = &report;
            s.spawn(move || {
                for i in 0..TESTS_PER_THREAD {
                    let mut test = FixtureTest::new(format!("jstests/t{thread}/test{i}.js"));
                    outcome_for(i)
                        .drive(report, &mut test)
                        .expect("lifecycle calls succeed");
                }
            });
        }
    });

    let total = THREADS * TESTS_PER_THREAD;
    let per_thread = |outcome: FixtureOutcome| {
        (0..TESTS_PER_THREAD)
            .filter(|&i| outcome_for(i) == outcome)
            .count()
            * THREADS
    };
    let interrupted = per_thread(FixtureOutcome::Interrupted);

    assert_eq!(report.len(), total);
    assert_eq!(
        report.counts(),
        ReportCounts {
            dynamic: 0,
            succeeded: per_thread(FixtureOutcome::Pass),
            failed: per_thread(FixtureOutcome::Fail),
            errored: per_thread(FixtureOutcome::Error),
            interrupted: 0,
        },
        "interrupted tests are not counted until combined"
    );
    assert_eq!(job_logger.allocated(), total);

    let closed = flusher.finish()?;
    assert_eq!(closed, total - interrupted, "every stopped test's handler closed");
    assert_eq!(job_logger.closed(), total - interrupted);

    let combined = TestReport::combine([&report]);
    assert_eq!(combined.counts().interrupted, interrupted);
    assert_eq!(
        combined.counts().failures(),
        per_thread(FixtureOutcome::Fail) + per_thread(FixtureOutcome::Error) + interrupted
    );
    for record in combined.records() {
        ensure!(record.has_outcome(), "{} has an outcome", record.test_id);
        ensure!(record.url_endpoint.is_some(), "{} has a log URL", record.test_id);
    }

    Ok(())
}

#[test]
fn combine_snapshots_a_report_still_being_written() -> Result<()> {
    test_init();

    let report = TestReport::new(
        Arc::new(FixtureJobLogger::new("job0")),
        FlushHandle::immediate(),
    );
    // Workers wait here with their first test in flight until the snapshot is taken.
    let started = Barrier::new(THREADS + 1);
    let snapshotted = Barrier::new(THREADS + 1);

    let (snapshot, snapshot_records, live_snapshots) = std::thread::scope(|s| {
        for thread in 0..THREADS {
            let (report, started, snapshotted) = (&report, &started, &snapshotted);
            s.spawn(move || {
                let mut in_flight = FixtureTest::new(format!("jstests/t{thread}/first.js"));
                report.start(&mut in_flight, false);
                started.wait();
                snapshotted.wait();

                in_flight.finish(0);
                report
                    .add_success(&in_flight)
                    .expect("first test was started");
                report.stop(&mut in_flight).expect("first test was started");
                for i in 0..TESTS_PER_THREAD {
                    let mut test = FixtureTest::new(format!("jstests/t{thread}/test{i}.js"));
                    outcome_for(i)
                        .drive(report, &mut test)
                        .expect("lifecycle calls succeed");
                }
            });
        }

        started.wait();
        let snapshot = TestReport::combine([&report]);
        let snapshot_records = snapshot.records();
        snapshotted.wait();

        // Keep combining while the workers are running.
        let live_snapshots: Vec<_> = (0..16).map(|_| TestReport::combine([&report])).collect();
        (snapshot, snapshot_records, live_snapshots)
    });

    assert_eq!(snapshot.len(), THREADS, "only the in-flight tests were started");
    assert_eq!(snapshot.counts().interrupted, THREADS);
    for record in snapshot.records() {
        ensure!(
            record.status == Some(TestStatus::Timeout),
            "{} was in flight when combined",
            record.test_id
        );
        ensure!(
            record.return_code == Some(TestRecord::INTERRUPTED_RETURN_CODE),
            "{} has the interrupted return code",
            record.test_id
        );
    }
    assert_eq!(
        snapshot.records(),
        snapshot_records,
        "later mutations of the source are not visible in the snapshot"
    );

    for live in &live_snapshots {
        let counts = live.counts();
        assert_eq!(
            counts.succeeded + counts.failed + counts.errored + counts.interrupted,
            live.len(),
            "every copied record is repaired and counted"
        );
        ensure!(
            live.len() <= report.len(),
            "a snapshot never has more records than its source"
        );
    }

    // The source finished every test the snapshot saw as interrupted.
    let first_records: Vec<_> = report
        .records()
        .into_iter()
        .filter(|record| record.test_id.ends_with("/first.js"))
        .collect();
    assert_eq!(first_records.len(), THREADS);
    for record in first_records {
        assert_eq!(record.status, Some(TestStatus::Pass));
    }

    Ok(())
}

#[test]
fn jobs_combine_into_one_report_file() -> Result<()> {
    test_init();

    let workspace = tempdir()?;
    let mut config = ReportConfig::default_config(workspace.path());
    config
        .set_failure_status(ReportFailureStatus::SilentFail)
        .set_report_file(Some("report.json".into()));

    let job0 = TestReport::new(
        Arc::new(FixtureJobLogger::new("job0")),
        FlushHandle::immediate(),
    );
    let job1 = TestReport::new(
        Arc::new(FixtureJobLogger::new("job1")),
        FlushHandle::immediate(),
    );

    FixtureOutcome::Pass.drive(&job0, &mut FixtureTest::new("jstests/core/a.js"))?;
    FixtureOutcome::Error.drive(&job0, &mut FixtureTest::new("jstests/core/b.js"))?;
    FixtureOutcome::Fail.drive(
        &job0,
        &mut FixtureTest::dynamic("jstests/core/b.js", "ValidateCollections"),
    )?;
    FixtureOutcome::Pass.drive(&job1, &mut FixtureTest::new("jstests/core/c.js"))?;
    FixtureOutcome::Interrupted.drive(&job1, &mut FixtureTest::new("jstests/core/d.js"))?;

    let path = write_configured_report_file([&job0, &job1], &config)?
        .expect("report file is configured");
    let report_file = read_report_file(&path)?;

    let statuses: Vec<_> = report_file
        .results
        .iter()
        .map(|result| (result.test_file.as_str(), result.status))
        .collect();
    assert_eq!(
        statuses,
        [
            ("jstests/core/a.js", TestStatus::Pass),
            ("jstests/core/b.js", TestStatus::SilentFail),
            ("jstests/core/b.js:ValidateCollections", TestStatus::Fail),
            ("jstests/core/c.js", TestStatus::Pass),
            ("jstests/core/d.js", TestStatus::Fail),
        ]
    );
    assert_eq!(report_file.failures, 3);
    assert_eq!(
        report_file.results[0].url_raw.as_deref(),
        Some("http://logkeeper/build/job0/test/0?raw=1")
    );
    assert_eq!(
        report_file.results[4].exit_code,
        TestRecord::INTERRUPTED_RETURN_CODE
    );

    // Reloading a converted file keeps the converted statuses.
    let reloaded = TestReport::from_report_file(&report_file);
    assert_eq!(
        reloaded.counts(),
        ReportCounts {
            dynamic: 1,
            succeeded: 2,
            failed: 3,
            errored: 0,
            interrupted: 0,
        }
    );

    // The unconverted combination keeps errors and timeouts distinct.
    let combined = TestReport::combine([&job0, &job1]);
    let summary = ReportSummary::from_report(&combined, 5, Duration::from_secs(3));
    assert_eq!(
        summary.to_string(),
        "5 test(s) ran in 3.00 seconds (2 succeeded, 1 were skipped, 2 failed, 1 errored)\n\
         The following tests failed (with exit code):\n    \
         jstests/core/b.js:ValidateCollections (1)\n    \
         jstests/core/d.js (-2)\n\
         The following tests had errors:\n    \
         jstests/core/b.js"
    );
    let preserved = combined.to_report_file(StatusConversion::Preserve)?;
    assert_eq!(preserved.results[1].status, TestStatus::Error);
    assert_eq!(preserved.results[4].status, TestStatus::Timeout);

    Ok(())
}

#[test]
fn hook_failure_overrides_passed_test() -> Result<()> {
    test_init();

    let report = TestReport::new(
        Arc::new(FixtureJobLogger::new("job0")),
        FlushHandle::immediate(),
    );
    let mut test = FixtureTest::new("jstests/core/a.js");
    FixtureOutcome::Pass.drive(&report, &mut test)?;
    assert!(report.was_successful());

    // A hook that runs after the test found a problem with it.
    report.set_failure_with_return_code(&test, 253)?;
    assert!(!report.was_successful());
    assert_eq!(report.counts().succeeded, 0);
    assert_eq!(report.counts().failed, 1);
    assert_eq!(report.get_failed()[0].return_code, Some(253));

    report.reset();
    assert!(report.is_empty());
    assert!(report.was_successful());

    Ok(())
}
