//! hmr-agent - A headless hot-reload client for server-rendered pages.

#![allow(dead_code)]

mod actor;
mod cli;
mod config;
mod core;
mod dom;
mod logger;
mod reload;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AgentConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = AgentConfig::load(&cli)?;
    logger::set_verbose(config.verbose);

    match &cli.command {
        Commands::Connect { .. } => cli::connect::run_session(config),
        Commands::Inspect { html, .. } => cli::inspect::run_inspect(&config, *html),
    }
}
