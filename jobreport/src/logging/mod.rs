// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interfaces to the logging subsystem.
//!
//! The logging subsystem is external: it allocates a log sink for every test and returns an
//! addressable URL for it. jobreport only swaps sinks in and out around a test and schedules them to
//! be closed once the test has stopped.

mod flush;
mod imp;

pub use flush::*;
pub use imp::*;
