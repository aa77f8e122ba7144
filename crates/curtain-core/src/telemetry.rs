//! Tracing subscriber bootstrap.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::error::{CoreError, CoreResult};

type FilterHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

/// Handle to the installed filter so the level can be changed after start-up.
#[derive(Debug)]
pub struct LogHandle {
    filter: FilterHandle,
}

impl LogHandle {
    /// ## Summary
    /// Replaces the active filter directive.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the directive does not parse or the subscriber
    /// has been dropped.
    pub fn set_level(&self, level: &str) -> CoreResult<()> {
        let filter = build_filter(level)?;
        self.filter
            .modify(|current| *current = filter)
            .map_err(|e| CoreError::ConfigError(e.to_string()))
    }
}

/// ## Summary
/// Parses an `EnvFilter` directive such as `info` or `curtain_recur=trace,warn`.
///
/// ## Errors
/// Returns `CoreError::ConfigError` if the directive is invalid.
pub fn build_filter(level: &str) -> CoreResult<EnvFilter> {
    EnvFilter::try_new(level)
        .map_err(|e| CoreError::ConfigError(format!("invalid log level '{level}': {e}")))
}

/// ## Summary
/// Installs the global tracing subscriber using the configured level.
///
/// Falls back to `info` when the configured level is invalid.
///
/// ## Errors
/// Returns `CoreError::ConfigError` if a global subscriber is already installed.
pub fn init_tracing(logging: &LoggingConfig) -> CoreResult<LogHandle> {
    let initial = build_filter(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, filter) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| CoreError::ConfigError(e.to_string()))?;

    tracing::debug!(level = %logging.level, "Tracing initialised");

    Ok(LogHandle { filter })
}
