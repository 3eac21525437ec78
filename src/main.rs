//! hnposts - Hacker News posts from the terminal
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use hnposts::cli::{commands, Cli, Commands};
use hnposts::config::{Config, ConfigManager};
use hnposts::error::HnResult;
use hnposts::ui;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> HnResult<()> {
    let cli = Cli::parse();

    // Completions need neither config nor logging
    if let Commands::Completions { shell } = cli.command {
        commands::completions(shell);
        return Ok(());
    }

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load()?;

    init_logging(cli.verbose, &config);
    debug!("Using config {}", config_manager.path().display());

    match cli.command {
        Commands::Completions { .. } => unreachable!("Completions handled above"),
        Commands::Posts(args) => commands::posts(args, &config),
        Commands::Cache(args) => commands::cache(args, &config),
        Commands::Config(args) => commands::config(args, &config, &config_manager),
    }
}

/// Initialize logging: 0 = warn, 1 = info, 2+ = debug; always on stderr
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("hnposts=warn"),
        1 => EnvFilter::new("hnposts=info"),
        _ => EnvFilter::new("hnposts=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
