mod cli;
mod commands;
mod config;
mod controller;
mod model;
mod seed;
mod telemetry;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let config = config::AppConfig::load()
        .context("loading configuration")?
        .with_seed_override(args.seed);
    telemetry::init(&config.log).context("initializing logging")?;
    tracing::info!(seed = ?config.seed_path, "jobtrack starting");

    let command = args.command.unwrap_or(cli::Command::Tui { search: None });
    match command {
        cli::Command::Tui { search } => commands::tui(&config, search),
        cli::Command::List {
            search,
            status,
            yaml,
        } => commands::list(&config, search, status, yaml),
    }
}
