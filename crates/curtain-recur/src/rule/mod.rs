//! Canonical recurrence rule types.
//!
//! Every legacy input shape is folded into these by `normalize`; nothing downstream
//! inspects the raw representation.

mod weekday;

pub use weekday::{WeekdaySet, parse_weekday_code, weekday_code, weekday_from_number};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc, Weekday};
use curtain_core::types::EventId;
use serde::{Deserialize, Serialize};

use crate::error::RecurError;
use crate::normalize::RawRule;

/// Fully normalized recurrence rule of one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// Start of the first occurrence.
    pub starts_at: DateTime<Utc>,
    /// End of the first occurrence. `ends_at - starts_at` is the duration of every occurrence.
    pub ends_at: DateTime<Utc>,
    /// Display zone. Not used for arithmetic.
    pub timezone: String,
    pub frequency: Frequency,
    pub termination: Termination,
}

/// Repetition pattern of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frequency {
    /// A single occurrence; termination is ignored.
    None,
    Daily,
    /// An empty set falls back to the weekday of the first start at expansion time.
    Weekly { byday: WeekdaySet },
    Monthly(MonthlyMode),
    /// Rule could not be interpreted. Expands to nothing.
    Malformed(MalformedRule),
}

impl Frequency {
    /// The plain frequency kind, or `None` for malformed rules.
    #[must_use]
    pub const fn kind(&self) -> Option<FrequencyKind> {
        match self {
            Self::None => Some(FrequencyKind::None),
            Self::Daily => Some(FrequencyKind::Daily),
            Self::Weekly { .. } => Some(FrequencyKind::Weekly),
            Self::Monthly(_) => Some(FrequencyKind::Monthly),
            Self::Malformed(_) => None,
        }
    }
}

/// Why a stored rule could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedRule {
    UnknownFrequency(String),
    /// Monthly rule with neither a usable month day nor a week of month with exactly one weekday.
    UnresolvedMonthly,
}

impl fmt::Display for MalformedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFrequency(freq) => write!(f, "unknown frequency '{freq}'"),
            Self::UnresolvedMonthly => {
                f.write_str("monthly rule has no month day and no single week-of-month weekday")
            }
        }
    }
}

/// How a monthly rule picks its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyMode {
    /// Day of month in `1..=31`, clamped to the last day of shorter months.
    MonthDay(u32),
    WeekOfMonth { week: WeekOfMonth, weekday: Weekday },
}

impl MonthlyMode {
    /// ## Summary
    /// Picks the monthly mode from optional month fields.
    ///
    /// A month day wins when both are present. Week-of-month mode requires exactly one weekday.
    #[must_use]
    pub fn resolve(
        by_month_day: Option<u32>,
        week_of_month: Option<WeekOfMonth>,
        byday: &WeekdaySet,
    ) -> Option<Self> {
        if let Some(day) = by_month_day.filter(|day| (1..=31).contains(day)) {
            return Some(Self::MonthDay(day));
        }
        let week = week_of_month?;
        let weekday = byday.only()?;
        Some(Self::WeekOfMonth { week, weekday })
    }
}

/// Which occurrence of a weekday within the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekOfMonth {
    /// First through fourth.
    Nth(u8),
    Last,
}

impl WeekOfMonth {
    /// ## Summary
    /// Interprets the stored integer code: `1..=4`, or `-1` for "last".
    #[must_use]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            -1 => Some(Self::Last),
            1..=4 => u8::try_from(code).ok().map(Self::Nth),
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Nth(n) => i64::from(n),
            Self::Last => -1,
        }
    }
}

/// How a series ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Bounded only by the requested window.
    Unbounded,
    /// No occurrence falls on a calendar day after this instant's day.
    Until(DateTime<Utc>),
    /// Exactly this many occurrences.
    Count(u32),
}

/// Frequency as chosen in a form, without its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyKind {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl FrequencyKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Parses a stored frequency name. Absent or blank means `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "once" => Some(Self::None),
            "daily" | "day" => Some(Self::Daily),
            "weekly" | "week" => Some(Self::Weekly),
            "monthly" | "month" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for FrequencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyKind {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| RecurError::UnknownFrequency(s.to_string()))
    }
}

/// A stored series: display fields plus its rule as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseEvent {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub rule: RawRule,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_of_month_codes() {
        assert_eq!(WeekOfMonth::from_code(-1), Some(WeekOfMonth::Last));
        assert_eq!(WeekOfMonth::from_code(1), Some(WeekOfMonth::Nth(1)));
        assert_eq!(WeekOfMonth::from_code(4), Some(WeekOfMonth::Nth(4)));
        assert_eq!(WeekOfMonth::from_code(0), None);
        assert_eq!(WeekOfMonth::from_code(5), None);
        assert_eq!(WeekOfMonth::from_code(-2), None);
        assert_eq!(WeekOfMonth::Last.code(), -1);
        assert_eq!(WeekOfMonth::Nth(3).code(), 3);
    }

    #[test]
    fn monthly_mode_prefers_month_day() {
        let fri = WeekdaySet::single(Weekday::Fri);
        assert_eq!(
            MonthlyMode::resolve(Some(15), Some(WeekOfMonth::Last), &fri),
            Some(MonthlyMode::MonthDay(15))
        );
        assert_eq!(
            MonthlyMode::resolve(None, Some(WeekOfMonth::Last), &fri),
            Some(MonthlyMode::WeekOfMonth {
                week: WeekOfMonth::Last,
                weekday: Weekday::Fri
            })
        );
    }

    #[test]
    fn monthly_mode_needs_exactly_one_weekday() {
        let two: WeekdaySet = [Weekday::Mon, Weekday::Fri].into_iter().collect();
        assert_eq!(MonthlyMode::resolve(None, Some(WeekOfMonth::Nth(2)), &two), None);
        assert_eq!(
            MonthlyMode::resolve(None, Some(WeekOfMonth::Nth(2)), &WeekdaySet::new()),
            None
        );
        assert_eq!(MonthlyMode::resolve(Some(32), None, &two), None);
    }

    #[test]
    fn frequency_names() {
        assert_eq!(FrequencyKind::from_name("WEEKLY"), Some(FrequencyKind::Weekly));
        assert_eq!(FrequencyKind::from_name(""), Some(FrequencyKind::None));
        assert_eq!(FrequencyKind::from_name("yearly"), None);
        assert!(matches!(
            "fortnightly".parse::<FrequencyKind>(),
            Err(RecurError::UnknownFrequency(_))
        ));
    }
}
