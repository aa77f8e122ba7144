//! In-process `ScheduleStore` backed by maps behind a `tokio` lock.

use std::collections::{BTreeMap, HashMap, HashSet};

use curtain_core::types::{EventId, Scope};
use curtain_recur::{BaseEvent, OverrideKey, OverrideRecord};
use tokio::sync::RwLock;

use crate::error::ServiceError;
use crate::store::{ScheduleStore, StoreFuture};

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

#[derive(Debug, Default)]
struct Records {
    events: BTreeMap<EventId, (Scope, BaseEvent)>,
    overrides: HashMap<OverrideKey, OverrideRecord>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored override records across all scopes.
    pub async fn override_count(&self) -> usize {
        self.records.read().await.overrides.len()
    }
}

impl ScheduleStore for MemoryStore {
    fn list_events<'a>(&'a self, scope: &'a Scope) -> StoreFuture<'a, Vec<BaseEvent>> {
        Box::pin(async move {
            let records = self.records.read().await;
            Ok(records
                .events
                .values()
                .filter(|(owner, _)| owner == scope)
                .map(|(_, event)| event.clone())
                .collect())
        })
    }

    fn list_overrides<'a>(&'a self, scope: &'a Scope) -> StoreFuture<'a, Vec<OverrideRecord>> {
        Box::pin(async move {
            let records = self.records.read().await;
            let in_scope: HashSet<EventId> = records
                .events
                .iter()
                .filter(|(_, (owner, _))| owner == scope)
                .map(|(id, _)| *id)
                .collect();
            let mut overrides: Vec<OverrideRecord> = records
                .overrides
                .values()
                .filter(|record| in_scope.contains(&record.event_id))
                .cloned()
                .collect();
            overrides.sort_by_key(OverrideRecord::key);
            Ok(overrides)
        })
    }

    fn save_event<'a>(&'a self, scope: &'a Scope, event: BaseEvent) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            records.events.insert(event.id, (*scope, event));
            Ok(())
        })
    }

    fn upsert_override(&self, record: OverrideRecord) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            if !records.events.contains_key(&record.event_id) {
                return Err(ServiceError::Store(format!(
                    "no event {} for override",
                    record.event_id
                )));
            }
            records.overrides.insert(record.key(), record);
            Ok(())
        })
    }

    fn delete_override<'a>(&'a self, key: &'a OverrideKey) -> StoreFuture<'a, bool> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            Ok(records.overrides.remove(key).is_some())
        })
    }
}
