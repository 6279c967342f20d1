//! Log to a file, since the terminal belongs to the animation.

use color_eyre::eyre::{ContextCompat as _, Result};
use snowfall_config::{LogLevel, Preferences};
use tracing_subscriber::{Layer as _, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use crate::cli_args::CliArgs;

/// Environment variable that overrides all other log filtering.
const LOG_ENV_VAR: &str = "SNOWFALL_LOG";

/// Crates whose events are written at the configured level.
const CRATES: &[&str] = &["snowfall", "snowfall_sim", "snowfall_config"];

/// Install the file logger. Does nothing when logging is off and no filters are set.
pub fn setup(cli_args: &CliArgs, preferences: &Preferences) -> Result<()> {
    let are_log_filters_manually_set = std::env::var(LOG_ENV_VAR).is_ok();
    let path = cli_args
        .log_path
        .clone()
        .unwrap_or_else(|| preferences.log_path.clone());
    let level = cli_args.log_level.unwrap_or(preferences.log_level);

    if level == LogLevel::Off && !are_log_filters_manually_set {
        return Ok(());
    }

    let directory = path.parent().context("Couldn't get log path's parent")?;
    std::fs::create_dir_all(directory)?;
    let file = std::fs::File::create(&path)?;

    let filters = if are_log_filters_manually_set {
        tracing_subscriber::EnvFilter::builder()
            .with_default_directive("error".parse()?)
            .with_env_var(LOG_ENV_VAR)
            .from_env_lossy()
    } else {
        tracing_subscriber::EnvFilter::try_new(crate_directives(level))?
    };

    let logfile_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_filter(filters);
    tracing_subscriber::registry().with(logfile_layer).init();

    tracing::info!("Logging to {}", path.display());
    Ok(())
}

/// Filter directives enabling `level` for our own crates only.
fn crate_directives(level: LogLevel) -> String {
    CRATES
        .iter()
        .map(|name| format!("{name}={}", level.as_directive()))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_directives() {
        assert_eq!(
            crate_directives(LogLevel::Debug),
            "snowfall=debug,snowfall_sim=debug,snowfall_config=debug"
        );
    }
}
