//! Tickflow CLI application.

mod cli;
mod logging;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tickflow_config::{load_config, AppConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging. Configuration problems surface later through the
    // commands themselves; logging bootstraps from defaults meanwhile.
    let config = if cli.config.exists() {
        load_config(&cli.config).unwrap_or_else(|_| AppConfig::default())
    } else {
        AppConfig::default()
    };
    let cli_level = cli.log_level.as_ref().map(|level| match level {
        cli::LogLevel::Trace => "trace",
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    });
    logging::setup_logging(cli_level, cli.json_logs, &config.logging);

    // Execute command
    match cli.command {
        Commands::Replay(args) => cli::commands::replay::run(args, &cli.config),
        Commands::Quotes(args) => cli::commands::quotes::run(args, &cli.config),
        Commands::Indicators => cli::commands::indicators::run(),
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config),
    }
}
