//! Drawing primitives used by the deck compositor.
//!
//! The compositor only talks to the [`Surface`] trait, so tile layout can be
//! exercised with a recording surface while [`super::raster::RasterSurface`]
//! does the pixel work. All coordinates are logical pixels.

use super::font::Font;
use super::text::TextMeasurer;
use image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `alpha` in 0.0..=1.0
    pub fn rgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            r,
            g,
            b,
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }

    /// Channel-wise interpolation, `t` in 0.0..=1.0
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Baseline {
    /// `y` is the top of the line box
    #[default]
    Top,
    /// `y` is the vertical middle of the line box
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub color: Color,
    pub align: TextAlign,
    pub baseline: Baseline,
}

impl TextStyle {
    pub fn new(font: Font, color: Color) -> Self {
        Self {
            font,
            color,
            align: TextAlign::Left,
            baseline: Baseline::Top,
        }
    }

    pub fn centered(mut self) -> Self {
        self.align = TextAlign::Center;
        self.baseline = Baseline::Middle;
        self
    }
}

pub trait Surface: TextMeasurer {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Color);
    /// One logical pixel outline
    fn stroke_round_rect(&mut self, rect: Rect, radius: f32, color: Color);
    fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color);
    /// Scale `image` into `dest`
    fn draw_image(&mut self, image: &RgbaImage, dest: Rect);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_rounds_alpha() {
        assert_eq!(Color::rgba(0, 0, 0, 0.5).a, 128);
        assert_eq!(Color::rgba(0, 0, 0, 2.0).a, 255);
    }

    #[test]
    fn test_lerp_endpoints() {
        let from = Color::rgb(0, 0, 0);
        let to = Color::rgba(200, 100, 50, 0.0);
        assert_eq!(from.lerp(to, 0.0), from);
        assert_eq!(from.lerp(to, 1.0), to);
        assert_eq!(from.lerp(to, 0.5), Color { r: 100, g: 50, b: 25, a: 128 });
    }

    #[test]
    fn test_inset_never_goes_negative() {
        let rect = Rect::new(10.0, 10.0, 4.0, 40.0).inset(3.0);
        assert_eq!(rect, Rect::new(13.0, 13.0, 0.0, 34.0));
    }
}
