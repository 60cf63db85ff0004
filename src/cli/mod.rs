//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tickflow")]
#[command(author, version, about = "Streaming indicator pipeline over replayed market data")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configuration's logging section)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a candle CSV through an indicator
    Replay(ReplayArgs),
    /// Replay a level-1 CSV through a field extractor
    Quotes(QuotesArgs),
    /// List available indicators
    Indicators,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct ReplayArgs {
    /// Candle data file (CSV)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Indicator to drive
    #[arg(short, long, default_value = "awesome_oscillator")]
    pub indicator: String,

    /// Override the indicator's length setting
    #[arg(long)]
    pub length: Option<usize>,

    /// Cap indicator history at N pairs
    #[arg(long)]
    pub history_limit: Option<usize>,

    /// Save the indicator's settings to a JSON file after the run
    #[arg(long)]
    pub save_settings: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct QuotesArgs {
    /// Level-1 data file (CSV)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Field to extract
    #[arg(short, long, default_value = "last_trade_price")]
    pub field: String,
}
