//! Boundary between the simulation and whatever puts pixels on screen.

use crate::sprite::Sprite;

/// Placement of one sprite on screen.
///
/// The whole sprite is scaled to a `size` square whose top-left corner sits at `(x, y)`,
/// then rotated by `rotation_deg` about that square's centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawTransform {
    pub x: f32,
    pub y: f32,
    pub rotation_deg: f32,
    pub size: f32,
}

impl DrawTransform {
    /// Centre of the destination square.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

/// Something that can composite sprites, called once per particle per frame.
pub trait DrawSink {
    fn blit(&mut self, sprite: &Sprite, transform: DrawTransform);
}

/// Sink that only remembers what it was asked to draw.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub transforms: Vec<DrawTransform>,
}

impl DrawSink for RecordingSink {
    fn blit(&mut self, _sprite: &Sprite, transform: DrawTransform) {
        self.transforms.push(transform);
    }
}
