//! ## Summary
//! Occurrence expansion.
//!
//! Turns one normalized rule and a window into the ordered raw occurrences of that window.
//! Every generated occurrence advances the series sequence, whether or not it lands in the
//! window, so `count` termination and occurrence numbering do not depend on the window.

pub mod dates;
mod window;

pub use window::Window;

use chrono::{DateTime, TimeDelta, Utc};
use curtain_core::types::EventId;

use crate::rule::{Frequency, RecurrenceRule, Termination};
use dates::SeriesDates;

/// One generated occurrence before overrides are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOccurrence {
    pub event_id: EventId,
    /// Scheduled start in the unmodified series. Identity key for overrides.
    pub anchor_start: DateTime<Utc>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// 1-based position in the full series.
    pub sequence: u32,
    /// Series length, set only for count-bound series.
    pub total: Option<u32>,
}

/// ## Summary
/// Expands one series into the raw occurrences that intersect `window`.
///
/// Iteration walks the series from its first date, stops permanently at the `count`th
/// occurrence or the first date past `until`, and never continues past `window.end`.
/// Output is sorted by start and unique per anchor. A series whose duration pushes an end
/// time past the representable range yields nothing.
#[must_use]
pub fn expand_series(
    event_id: EventId,
    rule: &RecurrenceRule,
    window: &Window,
) -> Vec<RawOccurrence> {
    let start_date = rule.starts_at.date_naive();
    let dates = match &rule.frequency {
        Frequency::None => return expand_single(event_id, rule, window),
        Frequency::Malformed(reason) => {
            tracing::warn!(
                event_id = %event_id,
                reason = %reason,
                "Skipping malformed recurrence rule"
            );
            return Vec::new();
        }
        Frequency::Daily => SeriesDates::daily(start_date),
        Frequency::Weekly { byday } => SeriesDates::weekly(start_date, byday),
        Frequency::Monthly(mode) => SeriesDates::monthly(start_date, *mode),
    };

    let time_of_day = rule.starts_at.time();
    let duration: TimeDelta = rule.ends_at - rule.starts_at;
    let total = match rule.termination {
        Termination::Count(count) => Some(count),
        Termination::Unbounded | Termination::Until(_) => None,
    };

    let mut occurrences = Vec::new();
    let mut sequence: u32 = 0;

    for date in dates {
        match rule.termination {
            Termination::Count(count) if sequence >= count => break,
            Termination::Until(until) if date > until.date_naive() => break,
            _ => {}
        }

        let starts_at = date.and_time(time_of_day).and_utc();
        if starts_at > window.end {
            break;
        }
        sequence += 1;

        let Some(ends_at) = starts_at.checked_add_signed(duration) else {
            tracing::warn!(
                event_id = %event_id,
                starts_at = %starts_at,
                duration_seconds = duration.num_seconds(),
                "Skipping series whose end time is out of range"
            );
            return Vec::new();
        };
        if window.intersects(starts_at, ends_at) {
            occurrences.push(RawOccurrence {
                event_id,
                anchor_start: starts_at,
                starts_at,
                ends_at,
                sequence,
                total,
            });
        }
    }

    occurrences.sort_by_key(|occurrence| occurrence.starts_at);
    occurrences.dedup_by_key(|occurrence| occurrence.anchor_start);

    tracing::trace!(
        event_id = %event_id,
        generated = sequence,
        visible = occurrences.len(),
        "Expanded series"
    );

    occurrences
}

fn expand_single(event_id: EventId, rule: &RecurrenceRule, window: &Window) -> Vec<RawOccurrence> {
    if !window.intersects(rule.starts_at, rule.ends_at) {
        return Vec::new();
    }
    vec![RawOccurrence {
        event_id,
        anchor_start: rule.starts_at,
        starts_at: rule.starts_at,
        ends_at: rule.ends_at,
        sequence: 1,
        total: None,
    }]
}
