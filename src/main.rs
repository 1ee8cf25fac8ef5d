//! hotserve - static file server with live reload for local site development.

mod cli;
mod config;
mod core;
mod embed;
mod http;
mod logger;
mod reload;
mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};

use cli::Cli;
use config::Config;

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
    logger::set_verbose(cli.verbose);

    // Every configuration problem surfaces here, before the port is bound.
    let config = Config::load(&cli)
        .with_context(|| format!("invalid configuration ({})", cli.config.display()))?;
    let spec = config
        .watch_spec()
        .context("invalid watch configuration")?;

    let server = cli::serve::bind_server(&config, Arc::new(spec))?;
    server.run()
}
