use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use meshcast::config::MeshcastConfig;
use meshcast::messaging::{ConsoleMessenger, InboundMessage};
use meshcast::{WeatherBot, VERSION};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Message-driven weather assistant
#[derive(Debug, Parser)]
#[command(name = "meshcast", version = VERSION, about)]
struct Cli {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable detailed logging for location parsing and geocoding
    #[arg(long)]
    debug: bool,

    /// Directory for messenger storage (attachments, identity files)
    #[arg(long)]
    storage_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config =
        MeshcastConfig::load_from_path(cli.config).context("Failed to load configuration")?;
    if let Some(storage_path) = cli.storage_path {
        config.bot.storage_path = storage_path.display().to_string();
    }

    let level = if cli.debug {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let messenger = ConsoleMessenger::new(config.bot.storage_path.clone());
    let bot = WeatherBot::new(config.clone()).context("Failed to initialize the assistant")?;

    println!(
        "{} ready. Send a location (or 'help'); Ctrl-D to quit.",
        config.bot.name
    );

    // One message at a time, start to finish, in arrival order.
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let message = InboundMessage {
            sender: "local".to_string(),
            content: line,
        };
        if let Err(e) = bot.handle_message(&message, &messenger).await {
            error!("Error processing message: {e}");
        }
    }

    Ok(())
}
