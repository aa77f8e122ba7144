use chrono::NaiveDate;
use curtain_core::config::Settings;
use curtain_core::types::{EventId, Scope};
use curtain_recur::{
    BaseEvent, EngineSettings, Occurrence, OverrideKey, OverrideRecord, OverrideSet, RuleForm,
    Window, validate_rule_with,
};

use crate::error::{ServiceError, ServiceResult};
use crate::store::ScheduleStore;

/// ## Summary
/// Calendar operations over a `ScheduleStore`.
///
/// Occurrences are recomputed from a fresh read on every call; nothing is cached.
#[derive(Debug)]
pub struct ScheduleService<S> {
    store: S,
    settings: EngineSettings,
}

impl<S: ScheduleStore> ScheduleService<S> {
    #[must_use]
    pub const fn new(store: S, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    /// Builds a service using the `recurrence` section of loaded settings.
    #[must_use]
    pub fn from_settings(store: S, settings: &Settings) -> Self {
        Self::new(store, EngineSettings::from(&settings.recurrence))
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// ## Summary
    /// Materializes every occurrence in `scope` that intersects `window`.
    ///
    /// Series and overrides are read concurrently. Both reads must succeed; a failure of
    /// either fails the whole call and nothing is merged.
    ///
    /// ## Errors
    /// Returns the store's error if either read fails.
    #[tracing::instrument(skip_all, fields(
        scope = %scope,
        window_start = %window.start,
        window_end = %window.end
    ))]
    pub async fn occurrences(
        &self,
        scope: &Scope,
        window: &Window,
    ) -> ServiceResult<Vec<Occurrence>> {
        let (events, overrides) = futures::try_join!(
            self.store.list_events(scope),
            self.store.list_overrides(scope)
        )?;
        tracing::debug!(
            events = events.len(),
            overrides = overrides.len(),
            "Loaded schedule records"
        );

        let overrides: OverrideSet = overrides.into_iter().collect();
        Ok(curtain_recur::expand_with(
            &events,
            &overrides,
            window,
            &self.settings,
        ))
    }

    /// ## Summary
    /// Materializes occurrences for the calendar days `from` through `to`, inclusive.
    ///
    /// ## Errors
    /// - `ServiceError::RecurError` if `to` precedes `from`.
    /// - The store's error if either read fails.
    pub async fn occurrences_between(
        &self,
        scope: &Scope,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ServiceResult<Vec<Occurrence>> {
        let window = Window::days(from, to)?;
        self.occurrences(scope, &window).await
    }

    /// ## Summary
    /// Validates a candidate rule and saves it as series `id`.
    ///
    /// The store is not touched when validation fails.
    ///
    /// ## Errors
    /// - `ServiceError::Invalid` with every validation message if the rule is rejected.
    /// - The store's error if saving fails.
    #[tracing::instrument(skip_all, fields(scope = %scope, event_id = %id))]
    pub async fn submit_rule(
        &self,
        scope: &Scope,
        id: EventId,
        form: &RuleForm,
    ) -> ServiceResult<BaseEvent> {
        let errors = validate_rule_with(form, &self.settings);
        if !errors.is_empty() {
            tracing::warn!(errors = errors.len(), "Rule rejected by validation");
            return Err(ServiceError::Invalid(errors));
        }

        let event = form
            .to_event(id)
            .ok_or(ServiceError::InvariantViolation("validated form produced no rule"))?;
        self.store.save_event(scope, event.clone()).await?;
        tracing::info!(frequency = %form.frequency, "Saved recurring event");
        Ok(event)
    }

    /// ## Summary
    /// Stores an edit to one occurrence, replacing any earlier edit to the same anchor.
    ///
    /// ## Errors
    /// - `ServiceError::Invalid` if the edit ends before it starts.
    /// - The store's error if saving fails.
    #[tracing::instrument(skip_all, fields(
        event_id = %record.event_id,
        anchor_start = %record.anchor_start,
        canceled = record.canceled
    ))]
    pub async fn edit_occurrence(&self, record: OverrideRecord) -> ServiceResult<()> {
        if let (Some(starts_at), Some(ends_at)) = (record.starts_at, record.ends_at)
            && ends_at < starts_at
        {
            return Err(ServiceError::Invalid(vec![
                "End time must be after start time.".to_string(),
            ]));
        }
        self.store.upsert_override(record).await
    }

    /// ## Summary
    /// Cancels one occurrence. Any earlier edit to it is replaced.
    ///
    /// ## Errors
    /// Returns the store's error if saving fails.
    pub async fn cancel_occurrence(&self, key: OverrideKey) -> ServiceResult<()> {
        tracing::debug!(
            event_id = %key.event_id,
            anchor_start = %key.anchor_start,
            "Canceling occurrence"
        );
        self.store
            .upsert_override(OverrideRecord::cancellation(key))
            .await
    }

    /// ## Summary
    /// Drops the override for one occurrence so it follows its series again.
    ///
    /// Returns whether an override existed.
    ///
    /// ## Errors
    /// Returns the store's error if the delete fails.
    pub async fn restore_occurrence(&self, key: OverrideKey) -> ServiceResult<bool> {
        let removed = self.store.delete_override(&key).await?;
        tracing::debug!(
            event_id = %key.event_id,
            anchor_start = %key.anchor_start,
            removed,
            "Restored occurrence"
        );
        Ok(removed)
    }
}
