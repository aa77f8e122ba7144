//! ## Summary
//! Pre-save validation of a candidate recurrence rule.
//!
//! Every check runs on its own and all failures are collected, so the caller can show the
//! complete list at once. Validation never fails; an empty list means the rule may be saved.
//!
//! End times are compared as `HH:MM` strings on the start date. Events that run past
//! midnight are rejected.

use chrono::{NaiveDate, NaiveTime};
use curtain_core::types::EventId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::estimate::EstimateRequest;
use crate::normalize::RawRule;
use crate::rule::{BaseEvent, FrequencyKind, MonthlyMode, WeekOfMonth, WeekdaySet};
use crate::settings::EngineSettings;

/// How a recurring series ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndMode {
    #[default]
    Never,
    Until,
    Count,
}

/// Rule fields as entered in the scheduling form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleForm {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// `HH:MM`
    pub start_time: Option<String>,
    /// `HH:MM`, same day as the start.
    pub end_time: Option<String>,
    pub timezone: Option<String>,
    pub frequency: FrequencyKind,
    pub byday: WeekdaySet,
    pub by_month_day: Option<i64>,
    pub week_of_month: Option<i64>,
    pub end_mode: EndMode,
    pub until_date: Option<NaiveDate>,
    pub count: Option<i64>,
}

/// One reason a candidate rule cannot be saved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleIssue {
    #[error("Title is required.")]
    MissingTitle,

    #[error("Start date is required.")]
    MissingStartDate,

    #[error("Start time is required.")]
    MissingStartTime,

    #[error("End time is required.")]
    MissingEndTime,

    #[error("Times must use the HH:MM format: {0}")]
    MalformedTime(String),

    #[error("End time must be after start time.")]
    EndNotAfterStart,

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error("Pick an end date.")]
    MissingUntil,

    #[error("The end date must be on or after the start date.")]
    UntilBeforeStart,

    #[error(
        "This schedule would create {count} occurrences, more than the limit of {max}. \
         Pick an earlier end date or end after a number of occurrences instead."
    )]
    TooManyOccurrences { count: u32, max: u32 },

    #[error("Number of occurrences must be between 1 and {max}.")]
    InvalidCount { max: u32 },

    #[error("Pick at least one weekday.")]
    MissingWeekday,

    #[error("Pick a day of the month (1-31), or a week of the month with exactly one weekday.")]
    UnresolvedMonthly,
}

/// ## Summary
/// Validates a candidate rule with default engine settings.
///
/// Returns one human-readable message per problem; empty when the rule is valid.
#[must_use]
pub fn validate_rule(form: &RuleForm) -> Vec<String> {
    validate_rule_with(form, &EngineSettings::default())
}

/// ## Summary
/// Validates a candidate rule against `settings.max_occurrences`.
#[must_use]
pub fn validate_rule_with(form: &RuleForm, settings: &EngineSettings) -> Vec<String> {
    form.issues(settings)
        .iter()
        .map(ToString::to_string)
        .collect()
}

impl RuleForm {
    /// ## Summary
    /// Collects every problem that blocks saving this rule.
    #[must_use]
    pub fn issues(&self, settings: &EngineSettings) -> Vec<RuleIssue> {
        let mut issues = Vec::new();
        self.check_fields(&mut issues);
        if self.frequency != FrequencyKind::None {
            self.check_termination(settings.max_occurrences, &mut issues);
        }
        self.check_pattern(&mut issues);

        if !issues.is_empty() {
            tracing::debug!(
                frequency = %self.frequency,
                issues = issues.len(),
                "Rule rejected"
            );
        }
        issues
    }

    fn check_fields(&self, issues: &mut Vec<RuleIssue>) {
        if self.title.trim().is_empty() {
            issues.push(RuleIssue::MissingTitle);
        }
        if self.start_date.is_none() {
            issues.push(RuleIssue::MissingStartDate);
        }

        let start = present(self.start_time.as_deref());
        let end = present(self.end_time.as_deref());
        if start.is_none() {
            issues.push(RuleIssue::MissingStartTime);
        }
        if end.is_none() {
            issues.push(RuleIssue::MissingEndTime);
        }
        for text in [start, end].into_iter().flatten() {
            if parse_clock(text).is_none() {
                issues.push(RuleIssue::MalformedTime(text.to_string()));
            }
        }
        if let (Some(start), Some(end)) = (start, end)
            && parse_clock(start).is_some()
            && parse_clock(end).is_some()
            && end <= start
        {
            issues.push(RuleIssue::EndNotAfterStart);
        }

        if let Some(zone) = present(self.timezone.as_deref())
            && zone.parse::<chrono_tz::Tz>().is_err()
        {
            issues.push(RuleIssue::UnknownTimeZone(zone.to_string()));
        }
    }

    fn check_termination(&self, max: u32, issues: &mut Vec<RuleIssue>) {
        match self.end_mode {
            EndMode::Never => {}
            EndMode::Until => {
                let Some(until) = self.until_date else {
                    issues.push(RuleIssue::MissingUntil);
                    return;
                };
                if self.start_date.is_some_and(|start| until < start) {
                    issues.push(RuleIssue::UntilBeforeStart);
                    return;
                }
                if let Some(count) = self.estimate_request().estimate(max)
                    && count > max
                {
                    issues.push(RuleIssue::TooManyOccurrences { count, max });
                }
            }
            EndMode::Count => {
                let in_range = self
                    .count
                    .is_some_and(|count| (1..=i64::from(max)).contains(&count));
                if !in_range {
                    issues.push(RuleIssue::InvalidCount { max });
                }
            }
        }
    }

    fn check_pattern(&self, issues: &mut Vec<RuleIssue>) {
        match self.frequency {
            FrequencyKind::Weekly if self.byday.is_empty() => {
                issues.push(RuleIssue::MissingWeekday);
            }
            FrequencyKind::Monthly if self.monthly_mode().is_none() => {
                issues.push(RuleIssue::UnresolvedMonthly);
            }
            _ => {}
        }
    }

    fn monthly_mode(&self) -> Option<MonthlyMode> {
        let by_month_day = self.by_month_day.and_then(|day| u32::try_from(day).ok());
        let week_of_month = self.week_of_month.and_then(WeekOfMonth::from_code);
        MonthlyMode::resolve(by_month_day, week_of_month, &self.byday)
    }

    fn estimate_request(&self) -> EstimateRequest {
        EstimateRequest {
            frequency: self.frequency,
            start_date: self.start_date,
            start_time: present(self.start_time.as_deref()).and_then(parse_clock),
            until_date: self.until_date,
            byday: self.byday,
            by_month_day: self.by_month_day,
            week_of_month: self.week_of_month,
        }
    }

    /// ## Summary
    /// Builds the stored rule for this form.
    ///
    /// Start and end are the start date at the entered wall times, read as UTC. Only the
    /// termination matching `end_mode` is written.
    ///
    /// Returns `None` when the start date or either time is missing or malformed. Call
    /// `issues` first to learn why.
    #[must_use]
    pub fn to_raw_rule(&self) -> Option<RawRule> {
        let date = self.start_date?;
        let start = present(self.start_time.as_deref()).and_then(parse_clock)?;
        let end = present(self.end_time.as_deref()).and_then(parse_clock)?;

        let mut rule = RawRule::new(date.and_time(start).and_utc(), date.and_time(end).and_utc());
        rule.timezone = present(self.timezone.as_deref()).map(str::to_string);

        if self.frequency == FrequencyKind::None {
            return Some(rule);
        }
        rule.freq = Some(json!(self.frequency.as_str()));
        if !self.byday.is_empty() {
            rule.byday = Some(json!(self.byday.codes()));
        }
        rule.by_month_day = self.by_month_day.map(|day| json!(day));
        rule.week_of_month = self.week_of_month.map(|week| json!(week));
        match self.end_mode {
            EndMode::Never => {}
            EndMode::Until => {
                rule.until = self
                    .until_date
                    .map(|until| json!(until.format("%Y-%m-%d").to_string()));
            }
            EndMode::Count => rule.count = self.count.map(|count| json!(count)),
        }
        Some(rule)
    }

    /// ## Summary
    /// Wraps `to_raw_rule` with the form's display fields.
    #[must_use]
    pub fn to_event(&self, id: EventId) -> Option<BaseEvent> {
        Some(BaseEvent {
            id,
            title: self.title.trim().to_string(),
            description: present(self.description.as_deref()).map(str::to_string),
            location: present(self.location.as_deref()).map(str::to_string),
            category: present(self.category.as_deref()).map(str::to_string),
            rule: self.to_raw_rule()?,
        })
    }
}

fn present(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|text| !text.is_empty())
}

fn parse_clock(text: &str) -> Option<NaiveTime> {
    if text.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(text, "%H:%M").ok()
}
