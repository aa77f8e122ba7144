use std::collections::HashMap;
use std::collections::hash_map;

use chrono::{DateTime, Utc};
use curtain_core::types::EventId;
use serde::{Deserialize, Serialize};

/// Identity of one occurrence: its series and its original scheduled start.
///
/// Never derived from an occurrence's displayed time, which an override may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverrideKey {
    pub event_id: EventId,
    pub anchor_start: DateTime<Utc>,
}

impl OverrideKey {
    #[must_use]
    pub const fn new(event_id: EventId, anchor_start: DateTime<Utc>) -> Self {
        Self {
            event_id,
            anchor_start,
        }
    }
}

/// Per-occurrence edit or cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRecord {
    pub event_id: EventId,
    pub anchor_start: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub canceled: bool,
}

impl OverrideRecord {
    /// An override that changes nothing yet.
    #[must_use]
    pub const fn new(key: OverrideKey) -> Self {
        Self {
            event_id: key.event_id,
            anchor_start: key.anchor_start,
            title: None,
            description: None,
            location: None,
            timezone: None,
            starts_at: None,
            ends_at: None,
            category: None,
            canceled: false,
        }
    }

    /// An override that removes the occurrence.
    #[must_use]
    pub fn cancellation(key: OverrideKey) -> Self {
        let mut record = Self::new(key);
        record.canceled = true;
        record
    }

    #[must_use]
    pub const fn key(&self) -> OverrideKey {
        OverrideKey::new(self.event_id, self.anchor_start)
    }

    /// Moves the displayed time; the anchor is untouched.
    #[must_use]
    pub fn with_times(mut self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        self.starts_at = Some(starts_at);
        self.ends_at = Some(ends_at);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Override records indexed by `OverrideKey`. Holds at most one record per occurrence.
#[derive(Debug, Clone, Default)]
pub struct OverrideSet {
    records: HashMap<OverrideKey, OverrideRecord>,
}

impl OverrideSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Inserts or replaces the record for its key.
    ///
    /// Returns the record previously stored under the same key.
    pub fn upsert(&mut self, record: OverrideRecord) -> Option<OverrideRecord> {
        self.records.insert(record.key(), record)
    }

    pub fn remove(&mut self, key: &OverrideKey) -> Option<OverrideRecord> {
        self.records.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &OverrideKey) -> Option<&OverrideRecord> {
        self.records.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> hash_map::Values<'_, OverrideKey, OverrideRecord> {
        self.records.values()
    }
}

/// Later records win over earlier ones with the same key.
impl FromIterator<OverrideRecord> for OverrideSet {
    fn from_iter<I: IntoIterator<Item = OverrideRecord>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.upsert(record);
        }
        set
    }
}

impl Extend<OverrideRecord> for OverrideSet {
    fn extend<I: IntoIterator<Item = OverrideRecord>>(&mut self, iter: I) {
        for record in iter {
            self.upsert(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    #[test]
    fn upsert_replaces_by_anchor() {
        let anchor = Utc.with_ymd_and_hms(2024, 1, 8, 18, 0, 0).unwrap();
        let key = OverrideKey::new(EventId::new(), anchor);
        let moved = anchor + TimeDelta::hours(1);

        let mut set = OverrideSet::new();
        let first = OverrideRecord::new(key).with_times(moved, moved + TimeDelta::hours(1));
        let second = OverrideRecord::new(key).with_times(moved, moved + TimeDelta::hours(2));
        assert!(set.upsert(first).is_none());
        let previous = set.upsert(second);

        assert!(previous.is_some());
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.get(&key).and_then(|record| record.ends_at),
            Some(moved + TimeDelta::hours(2))
        );
    }

    #[test]
    fn collect_keeps_last_record_per_key() {
        let key = OverrideKey::new(
            EventId::new(),
            Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap(),
        );
        let set: OverrideSet = [
            OverrideRecord::new(key).with_title("First"),
            OverrideRecord::cancellation(key),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.len(), 1);
        assert!(set.get(&key).is_some_and(|record| record.canceled));
    }

    #[test]
    fn deserializes_with_defaults() {
        let record: OverrideRecord = serde_json::from_value(serde_json::json!({
            "event_id": "550e8400-e29b-41d4-a716-446655440000",
            "anchor_start": "2024-01-08T18:00:00Z",
            "location": "Studio B",
        }))
        .unwrap();
        assert!(!record.canceled);
        assert_eq!(record.location.as_deref(), Some("Studio B"));
        assert_eq!(record.starts_at, None);
    }
}
