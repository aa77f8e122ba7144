//! ## Summary
//! Pre-save occurrence estimate for "until" mode.
//!
//! Daily series are counted in closed form. Weekly and monthly series are simulated and the
//! simulation stops as soon as the running count passes the cutoff, so a far-off until date
//! costs no more than a near one.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::expand::dates::SeriesDates;
use crate::rule::{FrequencyKind, MonthlyMode, WeekOfMonth, WeekdaySet};
use crate::settings::EngineSettings;

/// Candidate rule fields as entered before saving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub frequency: FrequencyKind,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub until_date: Option<NaiveDate>,
    #[serde(default)]
    pub byday: WeekdaySet,
    pub by_month_day: Option<i64>,
    pub week_of_month: Option<i64>,
}

impl EstimateRequest {
    /// ## Summary
    /// Counts occurrences from the start date through `until_date`, both inclusive.
    ///
    /// For weekly and monthly series the result is exact up to `cutoff`; past it the count
    /// stops at `cutoff + 1`. A monthly rule that resolves to no day yields `Some(0)`.
    ///
    /// Returns `None` when the start date, start time, or until date is missing, or when the
    /// until date precedes the start date.
    #[must_use]
    pub fn estimate(&self, cutoff: u32) -> Option<u32> {
        let start = self.start_date?;
        let until = self.until_date?;
        if self.start_time.is_none() || until < start {
            return None;
        }

        let dates = match self.frequency {
            FrequencyKind::None => return Some(1),
            FrequencyKind::Daily => {
                let days = (until - start).num_days() + 1;
                return Some(u32::try_from(days).unwrap_or(u32::MAX));
            }
            FrequencyKind::Weekly => SeriesDates::weekly(start, &self.byday),
            FrequencyKind::Monthly => {
                let by_month_day = self.by_month_day.and_then(|day| u32::try_from(day).ok());
                let week_of_month = self.week_of_month.and_then(WeekOfMonth::from_code);
                match MonthlyMode::resolve(by_month_day, week_of_month, &self.byday) {
                    Some(mode) => SeriesDates::monthly(start, mode),
                    None => return Some(0),
                }
            }
        };

        let mut count: u32 = 0;
        for _ in dates.take_while(|date| *date <= until) {
            count += 1;
            if count > cutoff {
                break;
            }
        }
        Some(count)
    }
}

/// ## Summary
/// Estimates how many occurrences a rule ending on `until_date` would produce.
///
/// Uses the default occurrence cap as the early-exit cutoff. See `EstimateRequest::estimate`.
#[must_use]
pub fn estimate_until_count(
    frequency: FrequencyKind,
    start_date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    until_date: Option<NaiveDate>,
    byday: &WeekdaySet,
    by_month_day: Option<i64>,
    week_of_month: Option<i64>,
) -> Option<u32> {
    let request = EstimateRequest {
        frequency,
        start_date,
        start_time,
        until_date,
        byday: *byday,
        by_month_day,
        week_of_month,
    };
    request.estimate(EngineSettings::default().max_occurrences)
}
