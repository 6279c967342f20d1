//! Snowflake simulation for the snowfall animation.
//!
//! A [`SnowfallField`] owns a fixed population of [`Particle`]s that fall, sway and spin
//! through a viewport, respawning at the top once they leave the bottom. Each frame the
//! host asks the field to advance and receives one [`DrawTransform`] per snowflake, in
//! back-to-front order, through its own [`DrawSink`]. Pixels are the host's business.

mod draw;
mod field;
mod particle;
mod sprite;

pub use draw::{DrawSink, DrawTransform, RecordingSink};
pub use field::SnowfallField;
pub use particle::{Particle, SWAY_TIME_STEP, Spawn, Spin};
pub use sprite::Sprite;
