//! Weekday codes and the weekday set used by weekly and week-of-month rules.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::RecurError;

const ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// ## Summary
/// Parses a weekday code.
///
/// Accepts two-letter (`MO`), three-letter (`MON`), and full (`monday`) names,
/// case-insensitively.
#[must_use]
pub fn parse_weekday_code(code: &str) -> Option<Weekday> {
    match code.trim().to_ascii_uppercase().as_str() {
        "MO" | "MON" | "MONDAY" => Some(Weekday::Mon),
        "TU" | "TUE" | "TUES" | "TUESDAY" => Some(Weekday::Tue),
        "WE" | "WED" | "WEDNESDAY" => Some(Weekday::Wed),
        "TH" | "THU" | "THUR" | "THURS" | "THURSDAY" => Some(Weekday::Thu),
        "FR" | "FRI" | "FRIDAY" => Some(Weekday::Fri),
        "SA" | "SAT" | "SATURDAY" => Some(Weekday::Sat),
        "SU" | "SUN" | "SUNDAY" => Some(Weekday::Sun),
        _ => None,
    }
}

/// ## Summary
/// Maps a legacy numeric weekday to a `Weekday`.
///
/// `1..=6` are Monday through Saturday; both `0` and `7` mean Sunday.
#[must_use]
pub const fn weekday_from_number(n: i64) -> Option<Weekday> {
    match n {
        0 | 7 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Two-letter code for a weekday.
#[must_use]
pub const fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Set of weekdays, iterated Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn single(day: Weekday) -> Self {
        Self(1 << day.num_days_from_monday())
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= 1 << day.num_days_from_monday();
    }

    #[must_use]
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the weekday when the set holds exactly one.
    #[must_use]
    pub fn only(&self) -> Option<Weekday> {
        if self.len() == 1 { self.days().next() } else { None }
    }

    /// Iterates members in ascending order, Monday first.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        ORDER.into_iter().filter(|day| self.contains(*day))
    }

    /// Two-letter codes of the members, Monday first.
    #[must_use]
    pub fn codes(&self) -> Vec<&'static str> {
        self.days().map(weekday_code).collect()
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.codes().join(","))
    }
}

/// Strict parse of a comma-separated code list. Unlike rule normalization,
/// an unknown code is an error here.
impl FromStr for WeekdaySet {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| {
                parse_weekday_code(code).ok_or_else(|| RecurError::UnknownWeekday(code.to_string()))
            })
            .collect()
    }
}

impl From<WeekdaySet> for Vec<String> {
    fn from(value: WeekdaySet) -> Self {
        value.days().map(|day| weekday_code(day).to_string()).collect()
    }
}

impl TryFrom<Vec<String>> for WeekdaySet {
    type Error = RecurError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        value
            .iter()
            .map(|code| {
                parse_weekday_code(code).ok_or_else(|| RecurError::UnknownWeekday(code.clone()))
            })
            .collect()
    }
}
