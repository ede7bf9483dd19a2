//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use concierge_core::Language;

use crate::{ConfigError, ContentPolicy, LocaleBundle};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// Remote concierge API
    #[serde(default)]
    pub backend: BackendSettings,

    /// Conversation session behaviour
    #[serde(default)]
    pub session: SessionSettings,

    /// Voice capture and playback
    #[serde(default)]
    pub voice: VoiceSettings,

    /// Health probe and availability polling
    #[serde(default)]
    pub monitor: MonitorSettings,

    /// Staff roleplay training
    #[serde(default)]
    pub training: TrainingSettings,

    /// Keyword and language tables
    #[serde(default)]
    pub content: ContentPolicy,

    /// Localized in-chat copy
    #[serde(default)]
    pub strings: LocaleBundle,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the concierge API
    pub base_url: String,
    /// Upper bound on every request; an unresponsive backend counts as unavailable
    pub timeout_ms: u64,
    /// Bearer token for the staff endpoints
    pub staff_token: Option<String>,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 30_000,
            staff_token: None,
        }
    }
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// User messages before the rating prompt is offered
    pub rating_threshold: usize,
    /// Send the selected language with each chat request
    pub send_language: bool,
    /// Send message count and drink mentions with each chat request
    pub send_energy_context: bool,
    /// Spoken language selected when a session starts
    pub default_language: Language,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            rating_threshold: 3,
            send_language: true,
            send_energy_context: true,
            default_language: Language::Japanese,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// Delay between end of speech and auto-submit, letting the final transcript settle
    pub auto_submit_delay_ms: u64,
    pub continuous: bool,
    pub interim_results: bool,
    /// Rate for the local synthesizer fallback
    pub speech_rate: f32,
    /// Start muted
    pub muted: bool,
    /// Directory the terminal front-end writes remote TTS clips to
    pub audio_output_dir: Option<PathBuf>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            auto_submit_delay_ms: 300,
            continuous: false,
            interim_results: true,
            speech_rate: 1.0,
            muted: false,
            audio_output_dir: None,
        }
    }
}

impl VoiceSettings {
    pub fn auto_submit_delay(&self) -> Duration {
        Duration::from_millis(self.auto_submit_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    /// Probe /health when a session starts
    pub health_probe: bool,
    /// Availability poll interval in seconds
    pub availability_poll_secs: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            health_probe: true,
            availability_poll_secs: 20,
        }
    }
}

impl MonitorSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.availability_poll_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingSettings {
    /// Turns after which the roleplay customer orders and gives feedback
    pub turn_limit: usize,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self { turn_limit: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_json: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_backend()?;
        self.validate_session()?;
        self.validate_voice()?;
        self.content.validate()?;

        if !self.strings.has(Language::English) {
            return Err(ConfigError::MissingField("strings.en-US".to_string()));
        }

        Ok(())
    }

    /// Render the effective settings as TOML
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn validate_backend(&self) -> Result<(), ConfigError> {
        let url = self.backend.base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::MissingField("backend.base_url".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                "backend.base_url",
                format!("must be an http(s) URL, got {}", url),
            ));
        }
        if self.backend.timeout_ms == 0 {
            return Err(ConfigError::invalid("backend.timeout_ms", "must be at least 1"));
        }
        if self.environment.is_production() && url.starts_with("http://") {
            tracing::warn!(url, "Production backend is not using TLS");
        }
        Ok(())
    }

    fn validate_session(&self) -> Result<(), ConfigError> {
        if self.session.rating_threshold == 0 {
            return Err(ConfigError::invalid(
                "session.rating_threshold",
                "must be at least 1",
            ));
        }
        if self.monitor.availability_poll_secs == 0 {
            return Err(ConfigError::invalid(
                "monitor.availability_poll_secs",
                "must be at least 1",
            ));
        }
        if self.training.turn_limit == 0 {
            return Err(ConfigError::invalid("training.turn_limit", "must be at least 1"));
        }
        Ok(())
    }

    fn validate_voice(&self) -> Result<(), ConfigError> {
        let rate = self.voice.speech_rate;
        if !(rate > 0.0 && rate <= 10.0) {
            return Err(ConfigError::invalid(
                "voice.speech_rate",
                format!("must be in (0, 10], got {}", rate),
            ));
        }
        Ok(())
    }
}

/// Load settings from `config/` and the environment
///
/// Priority: env vars > config/{env} > config/default > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from(Path::new("config"), env)
}

/// Load settings from a specific configuration directory
pub fn load_settings_from(dir: &Path, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("CONCIERGE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
