//! Taskboard CLI - boards, columns and tasks from the terminal.
//!
//! Commands:
//! - `taskboard boards list|show|create|delete|favorite|stats`
//! - `taskboard columns add|rename|delete`
//! - `taskboard tasks list|add|move|status|delete|comment`
//! - `taskboard stats <kind>`
//!
//! Exit codes:
//! - 0: Success
//! - 1: The operation failed or could not start

mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use taskboard::Taskboard;
use taskboard_config::{ConfigOverrides, ConfigProvider};
use tracing::Level;

/// Level for the logging flags; `--quiet` wins, then the most verbose flag
fn log_level(verbose: bool, debug: bool, quiet: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

fn configure_logging(verbose: bool, debug: bool, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

    let log_level = log_level(verbose, debug, quiet);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hyper=warn,reqwest=warn,{log_level}")));

    registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = ConfigProvider::new()
        .load()
        .context("Failed to load configuration")?;
    let config = ConfigOverrides {
        base_url: cli.base_url,
        token: cli.token,
        timeout_secs: None,
    }
    .apply(config)
    .context("Invalid command-line overrides")?;

    let board = Taskboard::connect(&config)
        .await
        .context("Failed to set up the API client")?;
    commands::run(cli.command, &board).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    configure_logging(cli.verbose, cli.debug, cli.quiet);

    let exit_code = match run(cli).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };
    std::process::exit(exit_code);
}
