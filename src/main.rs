mod api;
mod commands;
mod config;
mod controller;
mod errors;
mod poller;
mod ui;
mod validation;

use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::api::client::HttpBackend;
use crate::commands::{dispatch, parse_command, Flow, HELP_TEXT};
use crate::controller::UiController;
use crate::poller::ProgressPoller;
use crate::ui::terminal::TerminalView;

#[derive(Parser, Debug)]
#[command(name = "media-dl-ui", version, about = "Control a local media-download service from the terminal")]
struct Cli {
    /// Base URL of the download service
    #[arg(long)]
    server: Option<String>,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Progress refresh period in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still wins over the default level
    env_logger::Builder::new()
        .filter_level(if cli.verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .parse_default_env()
        .init();

    info!("Starting media-dl-ui");

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => config::AppConfig::load_from(path),
        None => config::AppConfig::load(),
    };
    let mut config = match loaded {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            log::error!("Failed to load configuration: {}", e);
            config::AppConfig::default()
        }
    };

    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if let Some(interval) = cli.poll_interval_ms {
        config.poll_interval_ms = interval;
    }
    config.validate().context("invalid configuration")?;

    let backend = Arc::new(HttpBackend::new(&config).context("failed to build HTTP client")?);
    info!("Talking to {}", backend.base_url());

    let view = Arc::new(TerminalView::new(config.default_theme, &config.default_format));
    let controller = Arc::new(UiController::new(
        backend,
        view.clone(),
        config.default_theme,
        config.strict_urls,
    ));
    let poller = ProgressPoller::start(controller.clone(), config.poll_interval());

    view.println("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };

                let flow = match parse_command(&line) {
                    Ok(Some(command)) => dispatch(&controller, &poller, command).await,
                    Ok(None) => Ok(Flow::Continue),
                    Err(e) => Err(e),
                };

                match flow {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::ShowHelp) => view.println(HELP_TEXT),
                    Ok(Flow::Quit) => break,
                    Err(e) => view.println(format!("✗ {}", e)),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    poller.stop();
    view.finish();
    info!("Bye");
    Ok(())
}
