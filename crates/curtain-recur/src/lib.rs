//! Recurrence expansion and override merging for rehearsal and show schedules.
//!
//! ## Summary
//! Turns compact recurrence rules into concrete occurrences inside a requested window and
//! overlays per-occurrence edits and cancellations keyed by each occurrence's original start.
//!
//! The pipeline is `normalize` → `expand` → `merge`. The estimator and validator run before a
//! rule is saved to block incomplete or runaway configurations.

pub mod error;
pub mod estimate;
pub mod expand;
pub mod merge;
pub mod normalize;
pub mod rule;
pub mod settings;
pub mod validate;

mod pipeline;

pub use estimate::{EstimateRequest, estimate_until_count};
pub use expand::{RawOccurrence, Window, expand_series};
pub use merge::{Occurrence, OverrideKey, OverrideRecord, OverrideSet, merge_series};
pub use normalize::{RawRule, normalize, normalize_with};
pub use pipeline::{expand, expand_with};
pub use rule::{
    BaseEvent, Frequency, FrequencyKind, MalformedRule, MonthlyMode, RecurrenceRule, Termination,
    WeekOfMonth, WeekdaySet,
};
pub use settings::EngineSettings;
pub use validate::{EndMode, RuleForm, RuleIssue, validate_rule, validate_rule_with};
