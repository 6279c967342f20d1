//! The snowflake image shared by every particle.
//!
//! Built once when the field is created and never touched again; every draw call samples
//! the same pixels.

use color_eyre::eyre::{Result, WrapErr as _, bail};
use image::{
    ImageFormat, Rgba, RgbaImage,
    imageops::{self, FilterType},
};
use snowfall_core::{FieldConfig, SpriteSource};

/// PNG shipped with the crate for [`SpriteSource::Bundled`].
const BUNDLED_PNG: &[u8] = include_bytes!("../assets/snowflake.png");

/// Largest base size a sprite is built for, in pixels.
pub const MAX_SPRITE_SIZE: f32 = 1024.0;

/// Stroke width of the procedural star's arms.
const STROKE_WIDTH: f32 = 2.0;

const FLAKE_COLOUR: [u8; 3] = [255, 255, 255];
const SHADOW_COLOUR: [u8; 3] = [136, 136, 136];

/// Immutable RGBA snowflake image.
#[derive(Debug, Clone)]
pub struct Sprite {
    image: RgbaImage,
}

impl Sprite {
    /// Build the sprite picked in the preferences, sized to the configured base size.
    pub fn from_source(source: SpriteSource, config: &FieldConfig) -> Result<Self> {
        let base_size = config.base_size.round();
        if !base_size.is_finite() || base_size > MAX_SPRITE_SIZE {
            bail!(
                "Snowflake base size {} is out of range, it must be at most {MAX_SPRITE_SIZE}",
                config.base_size
            );
        }
        let size = base_size.max(1.0) as u32;
        match source {
            SpriteSource::Procedural => Ok(Self::procedural(size, config.shadow)),
            SpriteSource::Bundled => Self::bundled(size),
        }
    }

    /// Draw a six-pointed star: three strokes crossing the centre at 60° steps.
    ///
    /// The canvas is padded by a fifth of `size` on every side to leave room for the
    /// blurred grey halo drawn beneath the star when `shadow` is set.
    pub fn procedural(size: u32, shadow: bool) -> Self {
        let size = size.max(1);
        let padding = size / 5;
        let side = size + padding * 2;
        let center = side as f32 / 2.0;
        let radius = size as f32 / 2.0;

        let mut image = RgbaImage::new(side, side);
        if shadow && padding > 0 {
            let halo = star_layer(side, center, radius, SHADOW_COLOUR);
            image = imageops::blur(&halo, padding as f32 / 2.0);
        }
        let star = star_layer(side, center, radius, FLAKE_COLOUR);
        imageops::overlay(&mut image, &star, 0, 0);

        Self { image }
    }

    /// Decode the bundled PNG and scale it to a `size` square.
    pub fn bundled(size: u32) -> Result<Self> {
        let size = size.max(1);
        let decoded = image::load_from_memory_with_format(BUNDLED_PNG, ImageFormat::Png)
            .wrap_err("Couldn't decode the bundled snowflake image")?;
        let image = imageops::resize(&decoded.to_rgba8(), size, size, FilterType::Triangle);
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Nearest pixel at normalized coordinates, `None` outside `[0, 1)`.
    pub fn sample(&self, u: f32, v: f32) -> Option<Rgba<u8>> {
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        let x = ((u * self.width() as f32) as u32).min(self.width() - 1);
        let y = ((v * self.height() as f32) as u32).min(self.height() - 1);
        Some(*self.image.get_pixel(x, y))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// A transparent layer holding one anti-aliased star.
fn star_layer(side: u32, center: f32, radius: f32, colour: [u8; 3]) -> RgbaImage {
    let arms: Vec<((f32, f32), (f32, f32))> = (0..3)
        .map(|i| {
            let angle = (i as f32 * 60.0).to_radians();
            let (dx, dy) = (radius * angle.cos(), radius * angle.sin());
            ((center - dx, center - dy), (center + dx, center + dy))
        })
        .collect();

    RgbaImage::from_fn(side, side, |x, y| {
        let point = (x as f32 + 0.5, y as f32 + 0.5);
        let coverage = arms
            .iter()
            .map(|&(from, to)| stroke_coverage(point, from, to))
            .fold(0.0_f32, f32::max);
        let [r, g, b] = colour;
        Rgba([r, g, b, (coverage * 255.0).round() as u8])
    })
}

/// How much of the pixel centred on `point` a stroke from `from` to `to` covers.
fn stroke_coverage(point: (f32, f32), from: (f32, f32), to: (f32, f32)) -> f32 {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq > 0.0 {
        (((point.0 - from.0) * dx + (point.1 - from.1) * dy) / length_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let nearest = (from.0 + t * dx, from.1 + t * dy);
    let distance = ((point.0 - nearest.0).powi(2) + (point.1 - nearest.1).powi(2)).sqrt();
    (STROKE_WIDTH / 2.0 + 0.5 - distance).clamp(0.0, 1.0)
}
