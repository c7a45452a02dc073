// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured access to jobreport's machine-readable output.
//!
//! The types in this crate describe the persisted report file written at the end of a run. Field
//! names and the status vocabulary are a frozen contract relied on by downstream dashboards and
//! retry tooling: do not rename them.

mod errors;
mod exit_codes;
mod report_file;

pub use errors::*;
pub use exit_codes::*;
pub use report_file::*;
