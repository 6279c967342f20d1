//! Persisted preferences for the snowfall animation.
//!
//! Preferences live in a single TOML file in the user's config directory. A missing file
//! means defaults; every key is optional.

use std::path::{Path, PathBuf};

use color_eyre::eyre::{ContextCompat as _, Result, WrapErr as _};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use snowfall_core::{FieldConfig, SpriteSource, Theme};

/// Name of the preferences file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Maximum log level written to the log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// No logging
    #[default]
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// User preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Light or dark background.
    pub theme: Theme,
    /// Which snowflake image to draw.
    pub sprite: SpriteSource,
    /// Simulation units covered by one terminal pixel (half a cell).
    pub units_per_pixel: f32,
    /// The maximum log level
    pub log_level: LogLevel,
    /// The location of the log file.
    pub log_path: PathBuf,
    /// Snowflake population tuning.
    pub field: FieldConfig,
}

impl Default for Preferences {
    fn default() -> Self {
        let log_directory = project_dirs()
            .map(|dirs| {
                dirs.state_dir()
                    .unwrap_or_else(|| dirs.data_local_dir())
                    .to_path_buf()
            })
            .unwrap_or_else(|| PathBuf::from("./"));

        Self {
            theme: Theme::default(),
            sprite: SpriteSource::default(),
            units_per_pixel: 4.0,
            log_level: LogLevel::Off,
            log_path: log_directory.join("snowfall.log"),
            field: FieldConfig::default(),
        }
    }
}

impl Preferences {
    /// Get the stable location of the config directory on the user's system.
    pub fn default_directory() -> Result<PathBuf> {
        Ok(project_dirs()
            .context("Couldn't get standard config directory")?
            .config_dir()
            .to_path_buf())
    }

    /// Canonical path to the preferences file.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::default_directory()?.join(CONFIG_FILE_NAME))
    }

    /// Load preferences, falling back to defaults when the file doesn't exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Couldn't read preferences from {}", path.display()))?;
        let preferences = toml::from_str::<Self>(&data)
            .wrap_err_with(|| format!("Invalid preferences in {}", path.display()))?;
        Ok(preferences)
    }

    /// Write preferences, creating the directory if needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(directory) = path.parent() {
            std::fs::create_dir_all(directory)?;
        }
        let data = toml::to_string_pretty(self)?;
        std::fs::write(path, data)
            .wrap_err_with(|| format!("Couldn't write preferences to {}", path.display()))?;
        Ok(())
    }

    /// Flip between light and dark, returning the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggle();
        self.theme
    }

    /// Flip between the procedural and bundled sprite, returning the new source.
    pub fn toggle_sprite(&mut self) -> SpriteSource {
        self.sprite = self.sprite.toggle();
        self.sprite
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "snowfall")
}
