use chrono::{DateTime, NaiveDate, Utc};
use curtain_core::types::EventId;
use curtain_recur::{BaseEvent, OverrideKey, OverrideRecord, OverrideSet, RawRule, Window};

pub struct ExpansionCase {
    pub name: &'static str,
    /// Stored rule as JSON, in any accepted shape.
    pub rule: &'static str,
    pub window: (&'static str, &'static str),
    /// Anchors canceled by overrides.
    pub canceled: &'static [&'static str],
    pub expected: Option<&'static [&'static str]>,
    pub expected_len: Option<usize>,
}

#[expect(clippy::too_many_lines)]
pub fn expansion_cases() -> Vec<ExpansionCase> {
    vec![
        ExpansionCase {
            name: "weekly_mondays_count",
            rule: r#"{"starts_at":"2024-01-01T18:00:00Z","ends_at":"2024-01-01T19:00:00Z","freq":"weekly","byday":["MO"],"count":3}"#,
            window: ("2024-01-01", "2024-01-31"),
            canceled: &[],
            expected: Some(&[
                "2024-01-01T18:00:00Z",
                "2024-01-08T18:00:00Z",
                "2024-01-15T18:00:00Z",
            ]),
            expected_len: None,
        },
        ExpansionCase {
            name: "weekly_window_between_occurrences",
            rule: r#"{"starts_at":"2024-01-01T18:00:00Z","ends_at":"2024-01-01T19:00:00Z","freq":"weekly","byday":["MO"],"count":3}"#,
            window: ("2024-01-10", "2024-01-12"),
            canceled: &[],
            expected: Some(&[]),
            expected_len: None,
        },
        ExpansionCase {
            name: "weekly_cancel_second",
            rule: r#"{"starts_at":"2024-01-01T18:00:00Z","ends_at":"2024-01-01T19:00:00Z","freq":"weekly","byday":["MO"],"count":3}"#,
            window: ("2024-01-01", "2024-01-31"),
            canceled: &["2024-01-08T18:00:00Z"],
            expected: Some(&["2024-01-01T18:00:00Z", "2024-01-15T18:00:00Z"]),
            expected_len: None,
        },
        ExpansionCase {
            name: "monthly_last_friday_leap_year",
            rule: r#"{"starts_at":"2024-01-01T20:00:00Z","ends_at":"2024-01-01T22:00:00Z","freq":"monthly","byday":["FR"],"week_of_month":-1}"#,
            window: ("2024-01-01", "2024-02-29"),
            canceled: &[],
            expected: Some(&["2024-01-26T20:00:00Z", "2024-02-23T20:00:00Z"]),
            expected_len: None,
        },
        ExpansionCase {
            name: "monthly_second_tuesday_named_week",
            rule: r#"{"starts_at":"2024-01-01T19:00:00Z","ends_at":"2024-01-01T21:00:00Z","freq":"monthly","byday":"TU","week_of_month":"second","count":3}"#,
            window: ("2024-01-01", "2024-12-31"),
            canceled: &[],
            expected: Some(&[
                "2024-01-09T19:00:00Z",
                "2024-02-13T19:00:00Z",
                "2024-03-12T19:00:00Z",
            ]),
            expected_len: None,
        },
        ExpansionCase {
            name: "monthly_day_31_clamped",
            rule: r#"{"starts_at":"2024-01-31T18:00:00Z","ends_at":"2024-01-31T19:00:00Z","freq":"monthly","bymonthday":[31],"count":4}"#,
            window: ("2024-01-01", "2024-12-31"),
            canceled: &[],
            expected: Some(&[
                "2024-01-31T18:00:00Z",
                "2024-02-29T18:00:00Z",
                "2024-03-31T18:00:00Z",
                "2024-04-30T18:00:00Z",
            ]),
            expected_len: None,
        },
        ExpansionCase {
            name: "daily_until_date_inclusive",
            rule: r#"{"starts_at":"2024-01-01T18:00:00Z","ends_at":"2024-01-01T19:00:00Z","freq":"daily","until":"2024-01-05"}"#,
            window: ("2024-01-01", "2024-01-31"),
            canceled: &[],
            expected: None,
            expected_len: Some(5),
        },
        ExpansionCase {
            name: "count_wins_over_until",
            rule: r#"{"starts_at":"2024-01-01T18:00:00Z","ends_at":"2024-01-01T19:00:00Z","freq":"daily","until":"2024-01-31T00:00:00Z","count":"2"}"#,
            window: ("2024-01-01", "2024-01-31"),
            canceled: &[],
            expected: Some(&["2024-01-01T18:00:00Z", "2024-01-02T18:00:00Z"]),
            expected_len: None,
        },
        ExpansionCase {
            name: "legacy_weekday_number",
            rule: r#"{"starts_at":"2024-01-01T18:00:00Z","ends_at":"2024-01-01T19:00:00Z","freq":"weekly","weekday":3,"count":2}"#,
            window: ("2024-01-01", "2024-01-31"),
            canceled: &[],
            expected: Some(&["2024-01-03T18:00:00Z", "2024-01-10T18:00:00Z"]),
            expected_len: None,
        },
        ExpansionCase {
            name: "weekly_comma_separated_byday",
            rule: r#"{"starts_at":"2024-01-01T18:00:00Z","ends_at":"2024-01-01T19:00:00Z","freq":"weekly","byday":"TH,TU","count":4}"#,
            window: ("2024-01-01", "2024-01-31"),
            canceled: &[],
            expected: Some(&[
                "2024-01-02T18:00:00Z",
                "2024-01-04T18:00:00Z",
                "2024-01-09T18:00:00Z",
                "2024-01-11T18:00:00Z",
            ]),
            expected_len: None,
        },
        ExpansionCase {
            name: "weekly_unbounded_capped_by_window",
            rule: r#"{"starts_at":"2024-01-05T18:00:00Z","ends_at":"2024-01-05T19:00:00Z","freq":"weekly","byday":["FR"]}"#,
            window: ("2024-03-01", "2024-03-31"),
            canceled: &[],
            expected: None,
            expected_len: Some(5),
        },
        ExpansionCase {
            name: "single_event_ignores_termination",
            rule: r#"{"starts_at":"2024-01-01T18:00:00Z","ends_at":"2024-01-01T19:00:00Z","count":5}"#,
            window: ("2024-01-01", "2024-01-31"),
            canceled: &[],
            expected: Some(&["2024-01-01T18:00:00Z"]),
            expected_len: None,
        },
        ExpansionCase {
            name: "unknown_frequency_is_empty",
            rule: r#"{"starts_at":"2024-01-01T18:00:00Z","ends_at":"2024-01-01T19:00:00Z","freq":"yearly","count":3}"#,
            window: ("2024-01-01", "2024-12-31"),
            canceled: &[],
            expected: Some(&[]),
            expected_len: None,
        },
        ExpansionCase {
            name: "overnight_occurrence_overlapping_window_start",
            rule: r#"{"starts_at":"2024-01-01T22:00:00Z","ends_at":"2024-01-02T02:00:00Z","freq":"daily","count":3}"#,
            window: ("2024-01-02", "2024-01-31"),
            canceled: &[],
            expected: Some(&[
                "2024-01-01T22:00:00Z",
                "2024-01-02T22:00:00Z",
                "2024-01-03T22:00:00Z",
            ]),
            expected_len: None,
        },
        ExpansionCase {
            name: "end_time_out_of_range",
            rule: r#"{"starts_at":"2024-01-01T18:00:00Z","ends_at":"+262142-12-31T00:00:00Z","freq":"daily","count":3}"#,
            window: ("2024-01-01", "2024-01-31"),
            canceled: &[],
            expected: Some(&[]),
            expected_len: None,
        },
    ]
}

pub fn assert_case(case: &ExpansionCase) {
    let rule: RawRule = serde_json::from_str(case.rule)
        .unwrap_or_else(|err| panic!("Failed to parse rule for {}: {}", case.name, err));
    let event = BaseEvent {
        id: EventId::new(),
        title: case.name.to_string(),
        description: None,
        location: None,
        category: None,
        rule,
    };

    let overrides: OverrideSet = case
        .canceled
        .iter()
        .map(|anchor| OverrideRecord::cancellation(OverrideKey::new(event.id, parse_instant(anchor))))
        .collect();

    let window = Window::days(parse_date(case.window.0), parse_date(case.window.1))
        .unwrap_or_else(|err| panic!("Invalid window for {}: {}", case.name, err));

    let occurrences = curtain_recur::expand(std::slice::from_ref(&event), &overrides, &window);
    let actual: Vec<DateTime<Utc>> = occurrences.iter().map(|o| o.starts_at).collect();

    if let Some(expected) = case.expected {
        let expected: Vec<DateTime<Utc>> = expected.iter().map(|value| parse_instant(value)).collect();
        assert_eq!(actual, expected, "Case {} did not match", case.name);
    }

    if let Some(expected_len) = case.expected_len {
        assert_eq!(
            actual.len(),
            expected_len,
            "Case {} expected {} occurrences",
            case.name,
            expected_len
        );
    }
}

fn parse_instant(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap_or_else(|err| panic!("Failed to parse rfc3339 value {value}: {err}"))
        .with_timezone(&Utc)
}

fn parse_date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .unwrap_or_else(|err| panic!("Failed to parse date {value}: {err}"))
}
