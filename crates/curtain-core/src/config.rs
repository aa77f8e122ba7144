use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, FileFormat};
use serde::Deserialize;

/// Default cap on occurrences for bounded series.
pub const DEFAULT_MAX_OCCURRENCES: u32 = 12;

/// Default display zone for rules that do not declare one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub recurrence: RecurrenceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecurrenceConfig {
    /// Upper bound for `count` and for the estimated length of an until-bound series.
    pub max_occurrences: u32,
    pub default_timezone: String,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            max_occurrences: DEFAULT_MAX_OCCURRENCES,
            default_timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `curtain.toml`.
    /// Environment variables (`CURTAIN_RECURRENCE__MAX_OCCURRENCES`, ...) take precedence
    /// over the file.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Self::builder()?
            .add_source(config::File::with_name("curtain.toml").required(false))
            .add_source(
                config::Environment::with_prefix("CURTAIN")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Builds settings from TOML text layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the text is not valid TOML or does not match `Settings`.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(Self::builder()?
            .add_source(config::File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?)
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default(
                "recurrence.max_occurrences",
                i64::from(DEFAULT_MAX_OCCURRENCES),
            )?
            .set_default("recurrence.default_timezone", DEFAULT_TIMEZONE)?
            .set_default("logging.level", "info")?)
    }
}

/// ## Summary
/// Loads configuration from `.env`, environment variables, and `curtain.toml`.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
