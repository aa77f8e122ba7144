use chrono::{DateTime, Utc};
use curtain_core::types::EventId;
use serde::Serialize;

use super::overrides::OverrideKey;

/// One concrete calendar entry after overrides. Derived on every call, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub event_id: EventId,
    /// Original scheduled start; stays fixed when an override moves the displayed time.
    pub anchor_start: DateTime<Utc>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub timezone: String,
    pub category: Option<String>,
    pub overridden: bool,
    /// 1-based position, only for count-bound series.
    pub occ_index: Option<u32>,
    /// Series length, only for count-bound series.
    pub occ_total: Option<u32>,
}

impl Occurrence {
    #[must_use]
    pub const fn key(&self) -> OverrideKey {
        OverrideKey::new(self.event_id, self.anchor_start)
    }

    /// "2 of 6" for count-bound series.
    #[must_use]
    pub fn position_label(&self) -> Option<String> {
        match (self.occ_index, self.occ_total) {
            (Some(index), Some(total)) => Some(format!("{index} of {total}")),
            _ => None,
        }
    }
}
