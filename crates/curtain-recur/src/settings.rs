use curtain_core::config::RecurrenceConfig;

/// Engine knobs taken from `RecurrenceConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Largest accepted `count`, and the estimator's early-exit threshold.
    pub max_occurrences: u32,
    /// Zone given to rules stored without one.
    pub default_timezone: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from(&RecurrenceConfig::default())
    }
}

impl From<&RecurrenceConfig> for EngineSettings {
    fn from(config: &RecurrenceConfig) -> Self {
        Self {
            max_occurrences: config.max_occurrences,
            default_timezone: config.default_timezone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curtain_core::config::Settings;

    #[test]
    fn defaults_match_loaded_configuration() {
        let loaded = Settings::from_toml("").unwrap();
        assert_eq!(
            EngineSettings::from(&loaded.recurrence),
            EngineSettings::default()
        );
        assert_eq!(EngineSettings::default().max_occurrences, 12);
        assert_eq!(EngineSettings::default().default_timezone, "UTC");
    }
}
