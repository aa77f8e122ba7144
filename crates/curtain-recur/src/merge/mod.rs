//! ## Summary
//! Override merging.
//!
//! Overlays per-occurrence edits and cancellations onto expanded occurrences. Lookups use
//! the exact `(event_id, anchor_start)` pair, so an edit that moves an occurrence keeps
//! matching the same occurrence on every later expansion.

mod occurrence;
mod overrides;

pub use occurrence::Occurrence;
pub use overrides::{OverrideKey, OverrideRecord, OverrideSet};

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::expand::RawOccurrence;
use crate::rule::BaseEvent;

/// ## Summary
/// Applies overrides to the raw occurrences of one series.
///
/// Canceled occurrences are dropped. Other overrides replace display fields one by one,
/// falling back to the series values where the override has none. The anchor is always
/// the raw one.
#[must_use]
pub fn merge_series(
    event: &BaseEvent,
    timezone: &str,
    raw: Vec<RawOccurrence>,
    overrides: &OverrideSet,
) -> Vec<Occurrence> {
    let mut merged = Vec::with_capacity(raw.len());

    for occurrence in raw {
        let key = OverrideKey::new(occurrence.event_id, occurrence.anchor_start);
        let base = Occurrence {
            event_id: occurrence.event_id,
            anchor_start: occurrence.anchor_start,
            starts_at: occurrence.starts_at,
            ends_at: occurrence.ends_at,
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            timezone: timezone.to_string(),
            category: event.category.clone(),
            overridden: false,
            occ_index: occurrence.total.map(|_| occurrence.sequence),
            occ_total: occurrence.total,
        };

        match overrides.get(&key) {
            Some(record) if record.canceled => {
                tracing::trace!(
                    event_id = %key.event_id,
                    anchor_start = %key.anchor_start,
                    "Occurrence canceled by override"
                );
            }
            Some(record) => merged.push(apply_override(base, record)),
            None => merged.push(base),
        }
    }

    merged
}

fn apply_override(base: Occurrence, record: &OverrideRecord) -> Occurrence {
    Occurrence {
        starts_at: record.starts_at.unwrap_or(base.starts_at),
        ends_at: record.ends_at.unwrap_or(base.ends_at),
        title: record.title.clone().unwrap_or(base.title),
        description: record.description.clone().or(base.description),
        location: record.location.clone().or(base.location),
        timezone: record.timezone.clone().unwrap_or(base.timezone),
        category: record.category.clone().or(base.category),
        overridden: true,
        ..base
    }
}

/// ## Summary
/// Keeps one occurrence per `(event_id, anchor_start)`.
///
/// A later entry replaces an earlier one with the same key but takes over its position.
#[must_use]
pub fn dedup_by_anchor(occurrences: Vec<Occurrence>) -> Vec<Occurrence> {
    let mut positions: HashMap<OverrideKey, usize> = HashMap::with_capacity(occurrences.len());
    let mut unique: Vec<Occurrence> = Vec::with_capacity(occurrences.len());

    for occurrence in occurrences {
        match positions.entry(occurrence.key()) {
            Entry::Occupied(slot) => {
                tracing::debug!(
                    event_id = %occurrence.event_id,
                    anchor_start = %occurrence.anchor_start,
                    "Duplicate occurrence replaced"
                );
                unique[*slot.get()] = occurrence;
            }
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(occurrence);
            }
        }
    }

    unique
}
