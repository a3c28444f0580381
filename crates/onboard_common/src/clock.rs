//! Wall-clock helpers.
//!
//! All "today" computations run in a fixed UTC offset (JST by default) so
//! reminder windows do not drift with the host timezone.

use crate::error::{OnboardError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

/// Default offset from UTC in hours (Japan Standard Time)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Fixed-offset clock used for timestamps and "today"
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    offset: FixedOffset,
}

impl Clock {
    /// Build a clock for the given hour offset. Out-of-range offsets fall back to UTC.
    pub fn with_offset_hours(hours: i32) -> Self {
        let offset = hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix());
        Self { offset }
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::with_offset_hours(DEFAULT_UTC_OFFSET_HOURS)
    }
}

/// Parse an ISO calendar date (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| OnboardError::InvalidDate(s.to_string()))
}

/// Parse an RFC 3339 timestamp as stored by the daemon
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}
