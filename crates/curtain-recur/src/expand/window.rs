use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::error::{RecurError, RecurResult};

/// Inclusive time window requested by a calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    /// ## Summary
    /// Creates a window over `[start, end]`.
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidWindow` if `end` precedes `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> RecurResult<Self> {
        if end < start {
            return Err(RecurError::InvalidWindow(format!(
                "end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// ## Summary
    /// Creates a day-aligned window from the start of `from` to the last instant of `to` (UTC).
    ///
    /// ## Errors
    /// Returns `RecurError::InvalidWindow` if `to` precedes `from`.
    pub fn days(from: NaiveDate, to: NaiveDate) -> RecurResult<Self> {
        let start = from.and_time(NaiveTime::MIN).and_utc();
        let end = to
            .succ_opt()
            .map_or(DateTime::<Utc>::MAX_UTC, |next| {
                next.and_time(NaiveTime::MIN).and_utc() - TimeDelta::nanoseconds(1)
            });
        Self::new(start, end)
    }

    /// Whether `[starts_at, ends_at]` overlaps the window.
    #[must_use]
    pub fn intersects(&self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> bool {
        starts_at <= self.end && ends_at.max(starts_at) >= self.start
    }
}
