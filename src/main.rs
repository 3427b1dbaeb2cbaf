#![forbid(unsafe_code)]

mod catalog;
mod cli;
mod config;
mod constants;
mod display_server;
mod edid;
mod error;
mod gui;
mod snapshot;
mod switch;
mod timing;
mod x11;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Command};
use config::Config;

fn parse_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken config should not stop the tool from listing modes
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };

    // LOG_LEVEL wins over the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| config.log_level.clone());
    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&log_level))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")?;

    if let Some(err) = config_error {
        tracing::warn!(error = ?err, "Using default config");
    }

    let display = cli.display.clone().or_else(|| config.display.clone());

    match cli.command {
        Some(Command::List { json }) => {
            let snapshot = x11::capture(display.as_deref())?;
            cli::list(&snapshot, json)
        }
        Some(Command::Set { output, mode }) => {
            let snapshot = x11::capture(display.as_deref())?;
            cli::set(&snapshot, &output, &mode)
        }
        None => {
            info!("starting GUI");
            gui::run_gui(&config, display)
        }
    }
}
