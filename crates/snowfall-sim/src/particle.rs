//! A single falling snowflake.

use std::f32::consts::TAU;

use rand::Rng;
use snowfall_core::Viewport;

use crate::draw::DrawTransform;

/// How far the sway waveform moves on each tick.
pub const SWAY_TIME_STEP: f32 = 0.05;

/// Starting parameters for a snowflake, usually randomized by the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub x: f32,
    pub y: f32,
    /// Units fallen per tick.
    pub fall_speed: f32,
    /// Side length of the drawn square.
    pub size: f32,
    /// Initial rotation in degrees.
    pub angle: f32,
    /// Degrees turned per tick, before a direction is picked.
    pub rotation_speed: f32,
    pub sway_amplitude: f32,
}

/// Which way a snowflake spins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Clockwise,
    CounterClockwise,
}

impl Spin {
    fn sign(self) -> f32 {
        match self {
            Spin::Clockwise => 1.0,
            Spin::CounterClockwise => -1.0,
        }
    }
}

/// State for a single snowflake.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    x: f32,
    y: f32,
    fall_speed: f32,
    size: f32,
    /// Current rotation in degrees, unbounded.
    angle: f32,
    /// Signed degrees per tick.
    rotation_speed: f32,
    sway_amplitude: f32,
    /// Offset into the sway waveform so flakes don't move in lockstep.
    sway_phase: f32,
    /// Ticks since the last respawn, scaled by [`SWAY_TIME_STEP`].
    time: f32,
}

impl Particle {
    /// Create a snowflake with a random spin direction and sway phase.
    pub fn new<R: Rng + ?Sized>(spawn: Spawn, rng: &mut R) -> Self {
        let spin = if rng.random_bool(0.5) {
            Spin::Clockwise
        } else {
            Spin::CounterClockwise
        };
        let sway_phase = rng.random::<f32>() * TAU;
        Self::with_motion(spawn, spin, sway_phase)
    }

    /// Create a snowflake with a known spin direction and sway phase.
    pub fn with_motion(spawn: Spawn, spin: Spin, sway_phase: f32) -> Self {
        Self {
            x: spawn.x,
            y: spawn.y,
            fall_speed: spawn.fall_speed,
            size: spawn.size,
            angle: spawn.angle,
            rotation_speed: spawn.rotation_speed.abs() * spin.sign(),
            sway_amplitude: spawn.sway_amplitude,
            sway_phase,
            time: 0.0,
        }
    }

    /// Move the snowflake forward by one tick.
    ///
    /// Once it drops below the bottom edge it restarts at the top, at a new random column.
    /// Only position and sway time are reset; the angle keeps accumulating.
    pub fn advance<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        self.y += self.fall_speed;
        self.angle += self.rotation_speed;
        self.time += SWAY_TIME_STEP;

        if self.y > viewport.height {
            self.y = 0.0;
            self.x = uniform_below(rng, viewport.width);
            self.time = 0.0;
        }
    }

    /// Horizontal offset from the sway waveform. Never exceeds the sway amplitude.
    pub fn sway(&self) -> f32 {
        (self.time + self.sway_phase).sin() * self.sway_amplitude
    }

    /// Where and how to draw the snowflake right now.
    pub fn draw_transform(&self) -> DrawTransform {
        DrawTransform {
            x: self.x + self.sway(),
            y: self.y,
            rotation_deg: self.angle,
            size: self.size,
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn fall_speed(&self) -> f32 {
        self.fall_speed
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Signed rotation speed; negative spins counter-clockwise.
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    pub fn sway_amplitude(&self) -> f32 {
        self.sway_amplitude
    }

    pub fn sway_phase(&self) -> f32 {
        self.sway_phase
    }

    /// Sway time accumulated since the last respawn.
    pub fn time(&self) -> f32 {
        self.time
    }
}

/// Uniform sample in `[0, upper)`, or 0 when there is no room.
pub(crate) fn uniform_below<R: Rng + ?Sized>(rng: &mut R, upper: f32) -> f32 {
    if upper.is_nan() || upper <= 0.0 {
        return 0.0;
    }
    let value = rng.random::<f32>() * upper;
    // Rounding can land exactly on the upper bound
    if value < upper { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn spawn() -> Spawn {
        Spawn {
            x: 100.0,
            y: 0.0,
            fall_speed: 2.0,
            size: 20.0,
            angle: 45.0,
            rotation_speed: 1.5,
            sway_amplitude: 15.0,
        }
    }

    #[test]
    fn test_advance_moves_one_tick() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut particle = Particle::with_motion(spawn(), Spin::Clockwise, 0.0);
        particle.advance(Viewport::new(800.0, 600.0), &mut rng);

        assert_eq!(particle.y(), 2.0);
        assert_eq!(particle.angle(), 46.5);
        assert!((particle.time() - SWAY_TIME_STEP).abs() < f32::EPSILON);
        assert_eq!(particle.x(), 100.0);
    }

    #[test]
    fn test_rotation_drifts_linearly_through_wrap() {
        let mut rng = StdRng::seed_from_u64(2);
        let viewport = Viewport::new(800.0, 50.0);
        let mut particle = Particle::with_motion(spawn(), Spin::CounterClockwise, 0.0);
        assert_eq!(particle.rotation_speed(), -1.5);

        for _ in 0..40 {
            particle.advance(viewport, &mut rng);
        }
        // 40 ticks at 2 units per tick wraps once, the angle must not care
        assert_eq!(particle.angle(), 45.0 - 40.0 * 1.5);
    }

    #[test]
    fn test_wrap_resets_position_only() {
        let mut rng = StdRng::seed_from_u64(3);
        let viewport = Viewport::new(800.0, 600.0);
        let mut particle = Particle::new(spawn(), &mut rng);
        let before = particle.clone();

        let mut ticks = 0;
        while particle.y() != 0.0 || ticks == 0 {
            particle.advance(viewport, &mut rng);
            ticks += 1;
        }

        // 300 ticks land exactly on the bottom edge, the next one crosses it
        assert_eq!(ticks, 301);
        assert_eq!(particle.y(), 0.0);
        assert_eq!(particle.time(), 0.0);
        assert!((0.0..800.0).contains(&particle.x()));
        assert_eq!(particle.size(), before.size());
        assert_eq!(particle.fall_speed(), before.fall_speed());
        assert_eq!(particle.rotation_speed(), before.rotation_speed());
        assert_eq!(particle.sway_amplitude(), before.sway_amplitude());
        assert_eq!(particle.sway_phase(), before.sway_phase());
    }

    #[test]
    fn test_wraps_once_by_tick_three_hundred() {
        let mut rng = StdRng::seed_from_u64(4);
        let viewport = Viewport::new(800.0, 600.0);
        let mut particle = Particle::with_motion(
            Spawn {
                fall_speed: 2.1,
                ..spawn()
            },
            Spin::Clockwise,
            0.0,
        );

        let mut wraps = 0;
        for _ in 0..300 {
            particle.advance(viewport, &mut rng);
            if particle.y() == 0.0 {
                wraps += 1;
            }
        }
        assert_eq!(wraps, 1);
    }

    #[test]
    fn test_sway_is_bounded() {
        let mut rng = StdRng::seed_from_u64(5);
        let viewport = Viewport::new(800.0, 600.0);
        let mut particle = Particle::new(spawn(), &mut rng);
        for _ in 0..1000 {
            particle.advance(viewport, &mut rng);
            assert!(particle.sway().abs() <= particle.sway_amplitude());
        }
    }

    #[test]
    fn test_draw_transform() {
        let particle = Particle::with_motion(spawn(), Spin::Clockwise, std::f32::consts::FRAC_PI_2);
        let transform = particle.draw_transform();
        assert!((transform.x - 115.0).abs() < 1e-4);
        assert_eq!(transform.y, 0.0);
        assert_eq!(transform.rotation_deg, 45.0);
        assert_eq!(transform.size, 20.0);
    }

    #[test]
    fn test_random_spin_uses_both_directions() {
        let mut rng = StdRng::seed_from_u64(6);
        let clockwise = (0..200)
            .map(|_| Particle::new(spawn(), &mut rng))
            .filter(|p| p.rotation_speed() > 0.0)
            .count();
        assert!(clockwise > 50 && clockwise < 150);
    }

    #[test]
    fn test_uniform_below_empty_range() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(uniform_below(&mut rng, 0.0), 0.0);
        assert_eq!(uniform_below(&mut rng, -5.0), 0.0);
        for _ in 0..100 {
            assert!((0.0..3.0).contains(&uniform_below(&mut rng, 3.0)));
        }
    }
}
