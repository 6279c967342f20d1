//! Core types shared by the snowfall crates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Delay between frames when the host has no native "next frame" signal (~60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Tuning for a snowfall population.
///
/// Every value is a base that gets randomized per particle when the field is populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of snowflakes alive at any time.
    pub particle_count: usize,
    /// Side length of an average snowflake, in viewport units.
    pub base_size: f32,
    /// Slowest possible fall speed, in units per tick.
    pub base_fall_speed: f32,
    /// Extra fall speed added on top of the base, drawn uniformly from `[0, jitter)`.
    pub fall_speed_jitter: f32,
    /// Average rotation speed, in degrees per tick.
    pub base_rotation_speed: f32,
    /// Sway amplitude of an average snowflake, scaled with its size.
    pub base_sway_amplitude: f32,
    /// Draw a soft grey halo under the procedural sprite.
    pub shadow: bool,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 100,
            base_size: 20.0,
            base_fall_speed: 2.0,
            fall_speed_jitter: 2.0,
            base_rotation_speed: 1.0,
            base_sway_amplitude: 15.0,
            shadow: true,
        }
    }
}

/// Where the snowflake sprite comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteSource {
    /// Six-pointed star drawn at startup.
    #[default]
    Procedural,
    /// Raster image shipped with the simulation crate.
    Bundled,
}

impl SpriteSource {
    /// Switch to the other source.
    pub fn toggle(self) -> Self {
        match self {
            SpriteSource::Procedural => SpriteSource::Bundled,
            SpriteSource::Bundled => SpriteSource::Procedural,
        }
    }

    /// Short label for help text.
    pub fn label(self) -> &'static str {
        match self {
            SpriteSource::Procedural => "star",
            SpriteSource::Bundled => "image",
        }
    }
}

/// Colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Switch between dark and light.
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Background colour as RGB.
    pub fn background(self) -> [u8; 3] {
        match self {
            Theme::Dark => [12, 16, 28],
            Theme::Light => [232, 238, 246],
        }
    }

    /// Colour that a fully white sprite pixel is drawn with.
    pub fn flake_tint(self) -> [u8; 3] {
        match self {
            Theme::Dark => [255, 255, 255],
            // Steel blue stays visible on a pale background
            Theme::Light => [70, 100, 160],
        }
    }
}

/// Size of the drawable area, in simulation units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether there is any area to put snowflakes in.
    pub fn is_visible(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
