use std::future::Future;
use std::pin::Pin;

use curtain_core::types::Scope;
use curtain_recur::{BaseEvent, OverrideKey, OverrideRecord};

use crate::error::ServiceResult;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = ServiceResult<T>> + Send + 'a>>;

/// ## Summary
/// Persistence for series and override records.
///
/// Every call is an opaque remote operation that either succeeds or fails as a whole.
/// Implementations map their own failures to `ServiceError::Store`.
pub trait ScheduleStore: Send + Sync {
    /// All series visible in `scope`.
    fn list_events<'a>(&'a self, scope: &'a Scope) -> StoreFuture<'a, Vec<BaseEvent>>;

    /// All override records for series visible in `scope`.
    fn list_overrides<'a>(&'a self, scope: &'a Scope) -> StoreFuture<'a, Vec<OverrideRecord>>;

    /// Creates or replaces a series by id.
    fn save_event<'a>(&'a self, scope: &'a Scope, event: BaseEvent) -> StoreFuture<'a, ()>;

    /// Creates or replaces the override stored under the record's anchor key.
    fn upsert_override(&self, record: OverrideRecord) -> StoreFuture<'_, ()>;

    /// Removes an override. Resolves to whether one existed.
    fn delete_override<'a>(&'a self, key: &'a OverrideKey) -> StoreFuture<'a, bool>;
}
