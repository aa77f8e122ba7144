//! ## Summary
//! Rule normalization.
//!
//! Stored rules come in several shapes: weekday sets as lists, comma strings, or a single
//! legacy `weekday` field; month days as scalars, strings, or one-element lists. This module
//! folds all of them into one `RecurrenceRule`. Normalization is total: values it cannot read
//! degrade to "absent".

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::rule::{
    Frequency, FrequencyKind, MalformedRule, MonthlyMode, RecurrenceRule, Termination,
    WeekOfMonth, WeekdaySet, parse_weekday_code, weekday_from_number,
};
use crate::settings::EngineSettings;

/// Recurrence rule exactly as persisted.
///
/// Recurrence fields are kept as loose JSON values so every historical shape deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub freq: Option<Value>,
    #[serde(default)]
    pub byday: Option<Value>,
    /// Legacy single-weekday field, read when `byday` yields nothing.
    #[serde(default)]
    pub weekday: Option<Value>,
    #[serde(default, alias = "bymonthday")]
    pub by_month_day: Option<Value>,
    #[serde(default)]
    pub week_of_month: Option<Value>,
    #[serde(default)]
    pub until: Option<Value>,
    #[serde(default)]
    pub count: Option<Value>,
}

impl RawRule {
    /// A one-off rule with no recurrence fields.
    #[must_use]
    pub const fn new(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        Self {
            starts_at,
            ends_at,
            timezone: None,
            freq: None,
            byday: None,
            weekday: None,
            by_month_day: None,
            week_of_month: None,
            until: None,
            count: None,
        }
    }
}

/// ## Summary
/// Normalizes a stored rule using default engine settings.
#[must_use]
pub fn normalize(raw: &RawRule) -> RecurrenceRule {
    normalize_with(raw, &EngineSettings::default())
}

/// ## Summary
/// Normalizes a stored rule into the canonical `RecurrenceRule`.
///
/// Never fails. An unknown `freq` or an unresolvable monthly rule becomes
/// `Frequency::Malformed`, which expands to nothing. When both `count` and `until`
/// are present, `count` wins.
#[must_use]
pub fn normalize_with(raw: &RawRule, settings: &EngineSettings) -> RecurrenceRule {
    let timezone = raw
        .timezone
        .as_deref()
        .map(str::trim)
        .filter(|tz| !tz.is_empty())
        .unwrap_or(settings.default_timezone.as_str())
        .to_string();

    let byday = read_byday(raw);
    let frequency = match read_frequency(raw.freq.as_ref()) {
        Ok(FrequencyKind::None) => Frequency::None,
        Ok(FrequencyKind::Daily) => Frequency::Daily,
        Ok(FrequencyKind::Weekly) => Frequency::Weekly { byday },
        Ok(FrequencyKind::Monthly) => {
            let by_month_day = raw.by_month_day.as_ref().and_then(month_day_from_value);
            let week_of_month = raw.week_of_month.as_ref().and_then(week_of_month_from_value);
            MonthlyMode::resolve(by_month_day, week_of_month, &byday).map_or(
                Frequency::Malformed(MalformedRule::UnresolvedMonthly),
                Frequency::Monthly,
            )
        }
        Err(malformed) => Frequency::Malformed(malformed),
    };

    let termination = if frequency == Frequency::None {
        Termination::Unbounded
    } else if let Some(count) = raw.count.as_ref().and_then(count_from_value) {
        Termination::Count(count)
    } else if let Some(until) = raw.until.as_ref().and_then(until_from_value) {
        Termination::Until(until)
    } else {
        Termination::Unbounded
    };

    RecurrenceRule {
        starts_at: raw.starts_at,
        ends_at: raw.ends_at,
        timezone,
        frequency,
        termination,
    }
}

fn read_frequency(value: Option<&Value>) -> Result<FrequencyKind, MalformedRule> {
    match value {
        None | Some(Value::Null) => Ok(FrequencyKind::None),
        Some(Value::String(name)) => FrequencyKind::from_name(name)
            .ok_or_else(|| MalformedRule::UnknownFrequency(name.clone())),
        Some(other) => Err(MalformedRule::UnknownFrequency(other.to_string())),
    }
}

fn read_byday(raw: &RawRule) -> WeekdaySet {
    let byday = raw.byday.as_ref().map(weekdays_from_value).unwrap_or_default();
    if byday.is_empty() {
        raw.weekday.as_ref().map(weekdays_from_value).unwrap_or_default()
    } else {
        byday
    }
}

fn weekdays_from_value(value: &Value) -> WeekdaySet {
    let mut set = WeekdaySet::new();
    collect_weekdays(value, &mut set);
    set
}

fn collect_weekdays(value: &Value, set: &mut WeekdaySet) {
    match value {
        Value::String(text) => {
            for code in text.split(|c: char| c == ',' || c.is_whitespace()) {
                if code.is_empty() {
                    continue;
                }
                match parse_weekday_code(code) {
                    Some(day) => set.insert(day),
                    None => tracing::trace!(code, "Ignoring unknown weekday code"),
                }
            }
        }
        Value::Number(_) => {
            if let Some(day) = int_from_value(value).and_then(weekday_from_number) {
                set.insert(day);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_weekdays(item, set);
            }
        }
        Value::Null | Value::Bool(_) | Value::Object(_) => {}
    }
}

fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn month_day_from_value(value: &Value) -> Option<u32> {
    if let Value::Array(items) = value {
        return items.iter().find_map(month_day_from_value);
    }
    int_from_value(value)
        .filter(|day| (1..=31).contains(day))
        .and_then(|day| u32::try_from(day).ok())
}

fn week_of_month_from_value(value: &Value) -> Option<WeekOfMonth> {
    if let Value::Array(items) = value {
        return items.iter().find_map(week_of_month_from_value);
    }
    if let Value::String(text) = value {
        match text.trim().to_ascii_lowercase().as_str() {
            "last" => return Some(WeekOfMonth::Last),
            "first" => return Some(WeekOfMonth::Nth(1)),
            "second" => return Some(WeekOfMonth::Nth(2)),
            "third" => return Some(WeekOfMonth::Nth(3)),
            "fourth" => return Some(WeekOfMonth::Nth(4)),
            _ => {}
        }
    }
    int_from_value(value).and_then(WeekOfMonth::from_code)
}

fn count_from_value(value: &Value) -> Option<u32> {
    int_from_value(value)
        .filter(|count| *count >= 1)
        .and_then(|count| u32::try_from(count).ok())
}

fn until_from_value(value: &Value) -> Option<DateTime<Utc>> {
    let Value::String(text) = value else {
        return None;
    };
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
}
