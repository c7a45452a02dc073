// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `combine-reports` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum CombineExitCode {}

impl CombineExitCode {
    /// All tests passed, or only non-dynamic tests were converted to `silentfail`.
    pub const OK: i32 = 0;

    /// At least one test in the combined report has status `fail` or `timeout`.
    pub const TEST_RUN_FAILED: i32 = 31;

    /// No report files were specified.
    pub const NO_REPORTS: i32 = 2;

    /// A user issue happened while reading or writing report files.
    pub const SETUP_ERROR: i32 = 96;
}
