// ABOUTME: Entry point for the springship CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use springship::config::{self, Config};
use springship::error::Result;
use springship::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(OutputMode::from_flags(cli.quiet, cli.json));
    let mode = output.mode();

    if let Err(e) = run(cli, output).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init {
            name,
            service,
            force,
        } => {
            config::init_config(&cwd, name.as_deref(), service.as_deref(), force)?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Deploy { service } => {
            let config = Config::discover(&cwd)?;
            commands::deploy(config, &cwd, &cli.environment, service.as_deref(), output).await
        }
        Commands::Endpoints { service } => {
            let config = Config::discover(&cwd)?;
            commands::endpoints(config, &cwd, &cli.environment, service.as_deref(), output).await
        }
    }
}
