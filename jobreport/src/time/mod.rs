// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall-clock timestamps for test records.

mod timestamp;

pub use timestamp::*;
