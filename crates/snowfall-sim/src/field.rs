//! The snowflake population and its per-frame pass.

use rand::{Rng, SeedableRng, rngs::StdRng};
use snowfall_core::{FieldConfig, Viewport};

use crate::draw::DrawSink;
use crate::particle::{Particle, Spawn, uniform_below};
use crate::sprite::Sprite;

/// A fixed population of snowflakes falling through a viewport.
///
/// The field never schedules anything itself: the host calls [`SnowfallField::render_frame`]
/// once per display frame, and [`SnowfallField::on_viewport_resized`] whenever the
/// drawable area changes. Both take `&mut self`, so a host that receives those signals on
/// different threads has to put the field behind a lock.
#[derive(Debug)]
pub struct SnowfallField<R: Rng = StdRng> {
    /// Snowflakes ordered by ascending size, smallest (farthest) first.
    particles: Vec<Particle>,
    viewport: Viewport,
    config: FieldConfig,
    sprite: Sprite,
    rng: R,
}

impl SnowfallField<StdRng> {
    /// Create an empty field seeded from the operating system.
    pub fn new(config: FieldConfig, sprite: Sprite) -> Self {
        Self::with_rng(config, sprite, StdRng::from_os_rng())
    }

    /// Create an empty field whose randomness is reproducible.
    pub fn with_seed(config: FieldConfig, sprite: Sprite, seed: u64) -> Self {
        Self::with_rng(config, sprite, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SnowfallField<R> {
    /// Create an empty field drawing randomness from `rng`.
    pub fn with_rng(config: FieldConfig, sprite: Sprite, rng: R) -> Self {
        Self {
            particles: Vec::new(),
            viewport: Viewport::default(),
            config,
            sprite,
            rng,
        }
    }

    /// Throw away every snowflake and scatter a fresh population over the new area.
    ///
    /// Safe to call on every layout pass. A viewport with no area leaves the field empty
    /// until a usable size arrives.
    pub fn on_viewport_resized(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.particles.clear();

        if !self.viewport.is_visible() {
            tracing::debug!("Viewport {width}x{height} has no area, deferring snowfall");
            return;
        }

        let mut particles: Vec<Particle> = (0..self.config.particle_count)
            .map(|_| self.spawn_particle())
            .collect();
        particles.sort_by(|a, b| a.size().total_cmp(&b.size()));
        self.particles = particles;

        tracing::debug!(
            "Populated {} snowflakes for a {width}x{height} viewport",
            self.particles.len()
        );
    }

    /// Advance every snowflake by one tick and hand each one to `sink`, back to front.
    pub fn render_frame<S: DrawSink + ?Sized>(&mut self, sink: &mut S) {
        let viewport = self.viewport;
        for particle in &mut self.particles {
            particle.advance(viewport, &mut self.rng);
            sink.blit(&self.sprite, particle.draw_transform());
        }
    }

    /// Swap the snowflake at `index` for `particle`, returning the old one.
    ///
    /// The population size never changes; the newcomer is moved to its place in the
    /// smallest-first draw order. Returns `None` and leaves the field untouched when
    /// `index` is out of range.
    pub fn replace(&mut self, index: usize, particle: Particle) -> Option<Particle> {
        if index >= self.particles.len() {
            return None;
        }
        let old = self.particles.remove(index);
        let position = self
            .particles
            .partition_point(|other| other.size() <= particle.size());
        self.particles.insert(position, particle);
        Some(old)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Randomize one snowflake anywhere in the current viewport.
    fn spawn_particle(&mut self) -> Particle {
        let config = self.config;
        let rng = &mut self.rng;

        // Size and sway share a multiplier so bigger flakes also swing wider
        let size_multiplier = 0.5 + rng.random::<f32>();
        let spawn = Spawn {
            x: uniform_below(rng, self.viewport.width),
            y: uniform_below(rng, self.viewport.height),
            fall_speed: config.base_fall_speed + rng.random::<f32>() * config.fall_speed_jitter,
            size: config.base_size * size_multiplier,
            angle: rng.random::<f32>() * 360.0,
            rotation_speed: config.base_rotation_speed * (0.5 + rng.random::<f32>()),
            sway_amplitude: config.base_sway_amplitude * size_multiplier,
        };
        Particle::new(spawn, rng)
    }
}
