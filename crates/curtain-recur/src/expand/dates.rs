//! Calendar-date generation for recurring series.
//!
//! Produces the unbounded, ascending sequence of dates a pattern selects on or after the
//! series start. Termination and windowing are the caller's job.

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::rule::{MonthlyMode, WeekOfMonth, WeekdaySet};

/// Number of days in `month` of `year`.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    first_of_next.pred_opt().map(|last| last.day())
}

/// `day` of the month, clamped to the month's last day.
#[must_use]
pub fn clamped_month_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.min(last))
}

/// Last `weekday` of the month.
#[must_use]
pub fn last_weekday_of_month(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)?;
    let back = (last.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
    last.checked_sub_days(Days::new(u64::from(back)))
}

/// The single date a monthly rule selects in the given month.
#[must_use]
pub fn resolve_month(year: i32, month: u32, mode: MonthlyMode) -> Option<NaiveDate> {
    match mode {
        MonthlyMode::MonthDay(day) => clamped_month_day(year, month, day),
        MonthlyMode::WeekOfMonth {
            week: WeekOfMonth::Nth(n),
            weekday,
        } => NaiveDate::from_weekday_of_month_opt(year, month, weekday, n),
        MonthlyMode::WeekOfMonth {
            week: WeekOfMonth::Last,
            weekday,
        } => last_weekday_of_month(year, month, weekday),
    }
}

/// Monday of the week containing `date`.
fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(
        date.weekday().num_days_from_monday(),
    )))
}

/// Ascending dates selected by a pattern, starting at the series start.
#[derive(Debug, Clone)]
pub enum SeriesDates {
    Daily {
        next: Option<NaiveDate>,
    },
    Weekly {
        start: NaiveDate,
        week: Option<NaiveDate>,
        days: Vec<Weekday>,
        position: usize,
    },
    Monthly {
        start: NaiveDate,
        year: i32,
        month: u32,
        mode: MonthlyMode,
        done: bool,
    },
}

impl SeriesDates {
    #[must_use]
    pub const fn daily(start: NaiveDate) -> Self {
        Self::Daily { next: Some(start) }
    }

    /// An empty `byday` falls back to the weekday of `start`.
    #[must_use]
    pub fn weekly(start: NaiveDate, byday: &WeekdaySet) -> Self {
        let days: Vec<Weekday> = if byday.is_empty() {
            vec![start.weekday()]
        } else {
            byday.days().collect()
        };
        Self::Weekly {
            start,
            week: week_start(start),
            days,
            position: 0,
        }
    }

    #[must_use]
    pub fn monthly(start: NaiveDate, mode: MonthlyMode) -> Self {
        Self::Monthly {
            start,
            year: start.year(),
            month: start.month(),
            mode,
            done: false,
        }
    }
}

impl Iterator for SeriesDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        match self {
            Self::Daily { next } => {
                let current = (*next)?;
                *next = current.succ_opt();
                Some(current)
            }
            Self::Weekly {
                start,
                week,
                days,
                position,
            } => loop {
                let monday = (*week)?;
                if *position >= days.len() {
                    *week = monday.checked_add_days(Days::new(7));
                    *position = 0;
                    continue;
                }
                let offset = days[*position].num_days_from_monday();
                *position += 1;
                let date = monday.checked_add_days(Days::new(u64::from(offset)))?;
                if date >= *start {
                    return Some(date);
                }
            },
            Self::Monthly {
                start,
                year,
                month,
                mode,
                done,
            } => loop {
                if *done {
                    return None;
                }
                let resolved = resolve_month(*year, *month, *mode);
                if *month == 12 {
                    match year.checked_add(1) {
                        Some(next) => *year = next,
                        None => *done = true,
                    }
                    *month = 1;
                } else {
                    *month += 1;
                }
                let Some(date) = resolved else {
                    *done = true;
                    return None;
                };
                if date >= *start {
                    return Some(date);
                }
            },
        }
    }
}
