//! Engine configuration module
//!
//! Tuning knobs for the editing engine: history retention and the auto-save
//! debounce interval.

use std::time::Duration;

use thiserror::Error;

use crate::engine::DEFAULT_MAX_HISTORY;

/// Default quiet period before a dirty session is auto-saved.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_millis(5000);

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Retention cap of each session's operation log
    pub max_history_size: usize,
    /// Debounce interval for auto-save
    pub autosave_interval: Duration,
}

impl EngineConfig {
    /// Create a new EngineConfigBuilder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history_size == 0 {
            return Err(ConfigError::ZeroHistorySize);
        }
        if self.autosave_interval.is_zero() {
            return Err(ConfigError::ZeroAutosaveInterval);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_history_size: DEFAULT_MAX_HISTORY,
            autosave_interval: DEFAULT_AUTOSAVE_INTERVAL,
        }
    }
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    max_history_size: Option<usize>,
    autosave_interval: Option<Duration>,
}

impl EngineConfigBuilder {
    /// Set the operation-log retention cap
    pub fn max_history_size(mut self, cap: usize) -> Self {
        self.max_history_size = Some(cap);
        self
    }

    /// Set the auto-save debounce interval
    pub fn autosave_interval(mut self, interval: Duration) -> Self {
        self.autosave_interval = Some(interval);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let config = EngineConfig {
            max_history_size: self.max_history_size.unwrap_or(DEFAULT_MAX_HISTORY),
            autosave_interval: self.autosave_interval.unwrap_or(DEFAULT_AUTOSAVE_INTERVAL),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max history size must be at least 1")]
    ZeroHistorySize,
    #[error("autosave interval must be nonzero")]
    ZeroAutosaveInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_history_size, 100);
        assert_eq!(config.autosave_interval, Duration::from_millis(5000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = EngineConfig::builder()
            .max_history_size(2)
            .autosave_interval(Duration::from_millis(250))
            .build()
            .unwrap();
        assert_eq!(config.max_history_size, 2);
        assert_eq!(config.autosave_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_zero_cap_rejected() {
        let result = EngineConfig::builder().max_history_size(0).build();
        assert_eq!(result.unwrap_err(), ConfigError::ZeroHistorySize);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let result = EngineConfig::builder()
            .autosave_interval(Duration::ZERO)
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::ZeroAutosaveInterval);
    }
}
