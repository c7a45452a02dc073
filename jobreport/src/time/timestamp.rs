// Copyright (c) The jobreport Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamps, stored the way they are persisted: as floating-point seconds since the Unix epoch.
//!
//! Reports are written out and read back (for example, to combine reports from several runs), so
//! the in-memory representation is identical to the persisted one. This makes loading a report
//! file and writing it out again lossless.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

/// A point in time, in seconds since the Unix epoch.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Timestamp(f64);

impl Timestamp {
    /// Returns the current time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Creates a timestamp from a number of seconds since the Unix epoch.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self(secs)
    }

    /// Creates a timestamp from a `chrono` date-time.
    pub fn from_datetime(datetime: DateTime<Utc>) -> Self {
        let secs = datetime.timestamp() as f64;
        let nanos = f64::from(datetime.timestamp_subsec_nanos());
        Self(secs + nanos / 1_000_000_000.0)
    }

    /// Returns the number of seconds since the Unix epoch.
    pub fn as_secs_f64(self) -> f64 {
        self.0
    }

    /// Returns the number of seconds elapsed from `earlier` to `self`.
    ///
    /// This is negative if `earlier` is after `self`.
    pub fn seconds_since(self, earlier: Timestamp) -> f64 {
        self.0 - earlier.0
    }

    /// Converts this timestamp to a `chrono` date-time, if it is within range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        if !self.0.is_finite() {
            return None;
        }
        let secs = self.0.floor();
        let nanos = ((self.0 - secs) * 1_000_000_000.0) as u32;
        DateTime::from_timestamp(secs as i64, nanos.min(999_999_999))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => {
                write!(f, "{}", datetime.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            None => write!(f, "{}", self.0),
        }
    }
}
