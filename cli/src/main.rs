//! CLI entrypoint for Spotlight
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use spotlight_application::{GameHost, TextGenerationGateway};
use spotlight_infrastructure::{
    ChatCompletionsGateway, ConfigLoader, FileConfig, JsonlGameEventLogger, Severity,
};
use spotlight_presentation::{Cli, Command, TerminalGame, play, serve};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the stderr logger, plus a daily log file when `--log-dir` is set.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(cli: &Cli) -> Option<WorkerGuard> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "spotlight.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    if cli.no_config {
        return Ok(ConfigLoader::load_defaults());
    }
    ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")
}

/// Log warnings and refuse to start on errors
fn check_config(config: &FileConfig) -> Result<()> {
    let mut errors = Vec::new();
    for issue in config.validate() {
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => errors.push(issue.message),
        }
    }
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  - {}", errors.join("\n  - "));
    }
    Ok(())
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    ConfigLoader::print_config_sources(cli.config.as_ref());

    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("********".to_string());
    }
    println!();
    println!("Effective configuration:");
    println!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(&cli);

    let config = load_config(&cli)?;
    if cli.show_config {
        return show_config(&cli, &config);
    }
    check_config(&config)?;

    info!("Starting Spotlight");

    let command = cli.resolved_command();
    let mut settings = config.to_settings().context("Invalid roster")?;
    if let Command::Play {
        rounds: Some(rounds),
        ..
    } = &command
    {
        settings = settings.with_max_rounds(*rounds);
    }

    // === Dependency Injection ===
    let gateway: Arc<dyn TextGenerationGateway> = Arc::new(
        ChatCompletionsGateway::from_config(&config.provider)
            .context("Failed to set up the text generation provider")?,
    );
    info!(
        "Using model {} at {}",
        config.provider.model, config.provider.base_url
    );

    let mut host = GameHost::new(gateway, settings);
    if let Some(path) = &config.logging.event_log {
        match JsonlGameEventLogger::new(path) {
            Some(logger) => {
                info!("Writing game events to {}", logger.path().display());
                host = host.with_event_logger(Arc::new(logger));
            }
            None => warn!("Game event log disabled"),
        }
    }
    let host = Arc::new(host);

    match command {
        Command::Serve { host: bind, port } => {
            let mut server = config.server.clone();
            if let Some(bind) = bind {
                server.host = bind;
            }
            if let Some(port) = port {
                server.port = port;
            }
            serve(host, &server.bind_address(), &server.allowed_origins)
                .await
                .context("HTTP server failed")?;
        }
        Command::Play { quiet, .. } => {
            let game = TerminalGame::new(host).with_progress(!quiet);
            if let Err(e) = game.run().await {
                play::print_error(&e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}
