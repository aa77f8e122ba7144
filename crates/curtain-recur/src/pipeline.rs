use std::cmp::Ordering;

use crate::expand::{Window, expand_series};
use crate::merge::{Occurrence, OverrideSet, dedup_by_anchor, merge_series};
use crate::normalize::normalize_with;
use crate::rule::BaseEvent;
use crate::settings::EngineSettings;

/// ## Summary
/// Materializes every event's occurrences in `window` using default engine settings.
#[must_use]
pub fn expand(events: &[BaseEvent], overrides: &OverrideSet, window: &Window) -> Vec<Occurrence> {
    expand_with(events, overrides, window, &EngineSettings::default())
}

/// ## Summary
/// Runs normalize, expand, and merge for each event, then combines the results.
///
/// The combined list is deduplicated per `(event_id, anchor_start)` with the last entry
/// winning, and sorted by displayed start. Ties fall back to anchor, then event id, so the
/// order is stable across calls.
#[must_use]
pub fn expand_with(
    events: &[BaseEvent],
    overrides: &OverrideSet,
    window: &Window,
    settings: &EngineSettings,
) -> Vec<Occurrence> {
    let mut combined = Vec::new();

    for event in events {
        let rule = normalize_with(&event.rule, settings);
        let raw = expand_series(event.id, &rule, window);
        combined.extend(merge_series(event, &rule.timezone, raw, overrides));
    }

    let mut occurrences = dedup_by_anchor(combined);
    occurrences.sort_by(display_order);

    tracing::debug!(
        events = events.len(),
        overrides = overrides.len(),
        occurrences = occurrences.len(),
        window_start = %window.start,
        window_end = %window.end,
        "Materialized occurrences"
    );

    occurrences
}

fn display_order(a: &Occurrence, b: &Occurrence) -> Ordering {
    a.starts_at
        .cmp(&b.starts_at)
        .then_with(|| a.anchor_start.cmp(&b.anchor_start))
        .then_with(|| a.event_id.cmp(&b.event_id))
}
