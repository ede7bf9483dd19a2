//! Concierge terminal entry point

mod cli;
mod platform;
mod render;
mod repl;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use concierge_agent::Concierge;
use concierge_client::{ConciergeBackend, HttpBackend};
use concierge_config::{load_settings_from, Settings};

use crate::cli::{Cli, Mode};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Priority: CLI flags > env vars > config/{env}.toml > config/default.toml > defaults
    let mut config = match load_settings_from(&cli.config_dir, cli.env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;

    if cli.print_config {
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    init_tracing(&config);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?config.environment,
        backend = %config.backend.base_url,
        mode = ?cli.mode,
        "Starting concierge"
    );

    let backend: Arc<dyn ConciergeBackend> = Arc::new(
        HttpBackend::from_settings(&config.backend).context("failed to build backend client")?,
    );
    let platform = platform::terminal_platform(config.voice.audio_output_dir.clone());
    let concierge = Concierge::new(&config, backend, platform)?;

    match cli.mode {
        Mode::Chat => repl::run_chat(&concierge).await,
        Mode::Train => repl::run_training(&concierge).await,
        Mode::Staff => repl::run_staff(&concierge, config.backend.staff_token.as_deref()).await,
    }
}

fn init_tracing(config: &Settings) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.observability.log_level;
        format!("concierge={}", level).into()
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);
    // stdout belongs to the conversation
    let fmt_layer = if config.observability.log_json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };
    subscriber.with(fmt_layer).init();
}
