//! Half-block pixel canvas that composites snowflake sprites for the terminal.
//!
//! Every terminal cell holds two vertically stacked pixels, drawn as "▀" with the upper
//! pixel in the foreground colour and the lower one in the background colour.

use std::f32::consts::FRAC_1_SQRT_2;

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};
use snowfall_core::{Theme, Viewport};
use snowfall_sim::{DrawSink, DrawTransform, Sprite};

/// RGB colour with channels in `0.0..=1.0`.
type Colour = [f32; 3];

/// A grid of pixels the size of the terminal.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Width in pixels, same as the terminal's columns.
    width: usize,
    /// Height in pixels, twice the terminal's rows.
    height: usize,
    /// Simulation units covered by one pixel.
    units_per_pixel: f32,
    background: Colour,
    tint: Colour,
    pixels: Vec<Colour>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16, units_per_pixel: f32, theme: Theme) -> Self {
        let mut canvas = Self {
            width: 0,
            height: 0,
            units_per_pixel: units_per_pixel.max(f32::EPSILON),
            background: to_colour(theme.background()),
            tint: to_colour(theme.flake_tint()),
            pixels: Vec::new(),
        };
        canvas.resize(cols, rows);
        canvas
    }

    /// Match the canvas to a new terminal size and clear it.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.width = usize::from(cols);
        self.height = usize::from(rows) * 2;
        self.pixels = vec![self.background; self.width * self.height];
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.background = to_colour(theme.background());
        self.tint = to_colour(theme.flake_tint());
        self.clear();
    }

    /// Fill every pixel with the theme's background.
    pub fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    /// The area the simulation should fill, in its own units.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.width as f32 * self.units_per_pixel,
            self.height as f32 * self.units_per_pixel,
        )
    }

    /// Colour of a pixel as 8-bit RGB.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(to_rgb(self.pixels[y * self.width + x]))
    }
}

impl DrawSink for Canvas {
    /// Composite the sprite by mapping every covered pixel back into sprite space.
    fn blit(&mut self, sprite: &Sprite, transform: DrawTransform) {
        let size = transform.size / self.units_per_pixel;
        if size.is_nan() || size <= 0.0 || self.pixels.is_empty() {
            return;
        }

        let (center_x, center_y) = transform.center();
        let (center_x, center_y) = (
            center_x / self.units_per_pixel,
            center_y / self.units_per_pixel,
        );
        let (sin, cos) = transform.rotation_deg.to_radians().sin_cos();

        // Half the diagonal covers the square at any rotation
        let reach = size * FRAC_1_SQRT_2;
        let x_start = (center_x - reach).floor().clamp(0.0, self.width as f32) as usize;
        let x_end = (center_x + reach).ceil().clamp(0.0, self.width as f32) as usize;
        let y_start = (center_y - reach).floor().clamp(0.0, self.height as f32) as usize;
        let y_end = (center_y + reach).ceil().clamp(0.0, self.height as f32) as usize;

        for y in y_start..y_end {
            for x in x_start..x_end {
                let dx = x as f32 + 0.5 - center_x;
                let dy = y as f32 + 0.5 - center_y;
                let local_x = dx * cos + dy * sin;
                let local_y = dy * cos - dx * sin;

                let Some(texel) = sprite.sample(local_x / size + 0.5, local_y / size + 0.5)
                else {
                    continue;
                };
                let alpha = f32::from(texel[3]) / 255.0;
                if alpha <= 0.0 {
                    continue;
                }

                let pixel = &mut self.pixels[y * self.width + x];
                for channel in 0..3 {
                    let source = self.tint[channel] * f32::from(texel[channel]) / 255.0;
                    pixel[channel] += (source - pixel[channel]) * alpha;
                }
            }
        }
    }
}

impl Widget for &Canvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let x = usize::from(col);
                let y = usize::from(row) * 2;
                let (Some(upper), Some(lower)) = (self.pixel(x, y), self.pixel(x, y + 1)) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char('▀')
                        .set_fg(Color::Rgb(upper[0], upper[1], upper[2]))
                        .set_bg(Color::Rgb(lower[0], lower[1], lower[2]));
                }
            }
        }
    }
}

fn to_colour(rgb: [u8; 3]) -> Colour {
    rgb.map(|channel| f32::from(channel) / 255.0)
}

fn to_rgb(colour: Colour) -> [u8; 3] {
    colour.map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(10, 5, 4.0, Theme::Dark)
    }

    fn flake_at(x: f32, y: f32, rotation_deg: f32) -> DrawTransform {
        DrawTransform {
            x,
            y,
            rotation_deg,
            size: 40.0,
        }
    }

    fn painted(canvas: &Canvas) -> usize {
        let background = Theme::Dark.background();
        (0..canvas.height)
            .flat_map(|y| (0..canvas.width).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) != Some(background))
            .count()
    }

    #[test]
    fn test_viewport_in_units() {
        let canvas = canvas();
        assert_eq!(canvas.viewport(), Viewport::new(40.0, 40.0));
        assert_eq!(canvas.pixel(9, 9), Some(Theme::Dark.background()));
        assert_eq!(canvas.pixel(10, 0), None);
    }

    #[test]
    fn test_blit_paints_inside_square_only() {
        let mut canvas = canvas();
        let sprite = Sprite::procedural(20, false);
        // A 5 pixel flake in the top-left quarter
        canvas.blit(
            &sprite,
            DrawTransform {
                size: 20.0,
                ..flake_at(0.0, 0.0, 0.0)
            },
        );

        assert!(painted(&canvas) > 0);
        for y in 0..10 {
            for x in 0..10 {
                if x >= 6 || y >= 6 {
                    assert_eq!(canvas.pixel(x, y), Some(Theme::Dark.background()));
                }
            }
        }
    }

    #[test]
    fn test_rotated_blit_still_paints() {
        let mut canvas = canvas();
        let sprite = Sprite::procedural(20, false);
        canvas.blit(&sprite, flake_at(0.0, 0.0, 37.0));
        assert!(painted(&canvas) > 0);
    }

    #[test]
    fn test_offscreen_blit_is_ignored() {
        let mut canvas = canvas();
        let sprite = Sprite::procedural(20, false);
        canvas.blit(&sprite, flake_at(-500.0, -500.0, 90.0));
        canvas.blit(&sprite, flake_at(500.0, 500.0, 0.0));
        canvas.blit(
            &sprite,
            DrawTransform {
                size: 0.0,
                ..flake_at(0.0, 0.0, 0.0)
            },
        );
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn test_clear_and_theme() {
        let mut canvas = canvas();
        let sprite = Sprite::procedural(20, false);
        canvas.blit(&sprite, flake_at(0.0, 0.0, 0.0));
        canvas.clear();
        assert_eq!(painted(&canvas), 0);

        canvas.set_theme(Theme::Light);
        assert_eq!(canvas.pixel(0, 0), Some(Theme::Light.background()));
    }

    #[test]
    fn test_empty_canvas() {
        let mut canvas = Canvas::new(0, 0, 4.0, Theme::Dark);
        assert!(!canvas.viewport().is_visible());
        canvas.blit(&Sprite::procedural(20, false), flake_at(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_render_half_blocks() {
        let mut canvas = Canvas::new(2, 1, 4.0, Theme::Dark);
        canvas.pixels[0] = [1.0, 1.0, 1.0];

        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        (&canvas).render(area, &mut buf);

        let [r, g, b] = Theme::Dark.background();
        let first = &buf[(0, 0)];
        assert_eq!(first.symbol(), "▀");
        assert_eq!(first.fg, Color::Rgb(255, 255, 255));
        assert_eq!(first.bg, Color::Rgb(r, g, b));
        assert_eq!(buf[(1, 0)].fg, Color::Rgb(r, g, b));
    }
}
