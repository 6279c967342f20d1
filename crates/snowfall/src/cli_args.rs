//! All the CLI arguments for snowfall

use std::path::PathBuf;

use snowfall_config::LogLevel;

/// Endless snowfall in your terminal.
#[derive(clap::Parser, Debug, Clone, Default)]
#[command(version, about)]
pub struct CliArgs {
    /// Path to the preferences file. Defaults to the standard config directory.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for a reproducible snowfall.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of snowflakes, overriding the preferences for this run only.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Maximum log level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Where to write the log file.
    #[arg(long)]
    pub log_path: Option<PathBuf>,
}
