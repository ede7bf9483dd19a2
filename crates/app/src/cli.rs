use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use concierge_config::Settings;
use concierge_core::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub(crate) enum Mode {
    /// Guest chat with the concierge
    #[default]
    Chat,
    /// Staff roleplay practice against a simulated guest
    Train,
    /// Staff menu availability console
    Staff,
}

#[derive(Debug, Parser, Clone)]
#[command(name = "concierge", about = "Restaurant chat concierge", author, version)]
pub(crate) struct Cli {
    /// What to run
    #[arg(value_enum, default_value_t = Mode::Chat)]
    pub(crate) mode: Mode,

    /// Directory holding default.{toml,yaml,json} and per-environment files
    #[arg(long = "config-dir", default_value = "config")]
    pub(crate) config_dir: PathBuf,

    /// Environment overlay loaded on top of the defaults
    #[arg(long = "env", env = "CONCIERGE_ENV")]
    pub(crate) env: Option<String>,

    /// Backend base URL (overrides config)
    #[arg(long = "backend-url")]
    pub(crate) backend_url: Option<String>,

    /// Spoken language tag, e.g. ja-JP or en-US (overrides config)
    #[arg(long = "lang", value_parser = parse_language)]
    pub(crate) lang: Option<Language>,

    /// Start with voice output muted
    #[arg(long = "mute", default_value_t = false)]
    pub(crate) mute: bool,

    /// Directory to write synthesized reply audio to
    #[arg(long = "audio-dir")]
    pub(crate) audio_dir: Option<PathBuf>,

    /// Staff password for the staff console
    #[arg(long = "staff-password", env = "CONCIERGE_STAFF_PASSWORD", hide_env_values = true)]
    pub(crate) staff_password: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long = "log-level")]
    pub(crate) log_level: Option<String>,

    /// Print the effective configuration as TOML and exit
    #[arg(long = "print-config", default_value_t = false)]
    pub(crate) print_config: bool,
}

impl Cli {
    /// Apply command-line overrides on top of loaded settings
    pub(crate) fn apply(&self, settings: &mut Settings) {
        if let Some(url) = &self.backend_url {
            settings.backend.base_url = url.clone();
        }
        if let Some(lang) = self.lang {
            settings.session.default_language = lang;
        }
        if self.mute {
            settings.voice.muted = true;
        }
        if let Some(dir) = &self.audio_dir {
            settings.voice.audio_output_dir = Some(dir.clone());
        }
        if let Some(password) = &self.staff_password {
            settings.backend.staff_token = Some(password.clone());
        }
        if let Some(level) = &self.log_level {
            settings.observability.log_level = level.clone();
        }
    }
}

fn parse_language(value: &str) -> Result<Language, String> {
    Language::from_str_loose(value).ok_or_else(|| {
        let known: Vec<&str> = Language::all().iter().map(|l| l.tag()).collect();
        format!("unknown language '{}', expected one of {}", value, known.join(", "))
    })
}
