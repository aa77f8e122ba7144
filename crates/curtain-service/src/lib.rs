//! Schedule service: wires the recurrence engine to a record store.
//!
//! The engine is pure; this crate owns the boundary. Reads of series and overrides run
//! concurrently and must both succeed before anything is merged.

pub mod error;
pub mod memory;
pub mod schedule;
pub mod store;

pub use error::{ServiceError, ServiceResult};
pub use memory::MemoryStore;
pub use schedule::ScheduleService;
pub use store::{ScheduleStore, StoreFuture};
