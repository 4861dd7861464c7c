// ABOUTME: Entry point for the berth CLI application.
// ABOUTME: Parses arguments, loads settings and dispatches to command handlers.

mod cli;
mod commands;

use berth::config::Settings;
use berth::error::{Error, Result};
use berth::output::{Output, OutputMode};
use clap::Parser;
use cli::Cli;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Normal
    });

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let cwd = env::current_dir().map_err(Error::Io)?;
    let mut settings = Settings::resolve(&cwd, cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        settings.backend = backend.into();
    }

    let adapter = berth::adapter_for(&settings);
    commands::dispatch(adapter.as_ref(), cli.command, output).await
}
