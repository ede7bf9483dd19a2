//! Configuration management for the concierge
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (CONCIERGE_ prefix, `__` separator)
//!
//! Localized copy and content policy (drink keywords, language detection
//! table) live here too, so they can change without touching code.

pub mod content;
pub mod locale;
pub mod settings;

pub use content::ContentPolicy;
pub use locale::{LocaleBundle, LocaleStrings};
pub use settings::{
    load_settings, load_settings_from, BackendSettings, MonitorSettings, ObservabilityConfig,
    RuntimeEnvironment, SessionSettings, Settings, TrainingSettings, VoiceSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for concierge_core::Error {
    fn from(err: ConfigError) -> Self {
        concierge_core::Error::Config(err.to_string())
    }
}
