//! [`Surface`] implementation over a `tiny-skia` pixmap.
//!
//! Shapes are drawn in logical pixels through a scale transform. Text is laid
//! out with `ab_glyph` directly in device pixels so glyphs stay crisp at 2x.

use super::font::{Font, Typeface};
use super::surface::{Baseline, Color, Rect, Surface, TextAlign, TextStyle};
use super::text::TextMeasurer;
use crate::error::{ApiError, ApiResult};
use ab_glyph::{point, Font as _, GlyphId, OutlinedGlyph, ScaleFont as _};
use image::{Rgba, RgbaImage};
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, GradientStop, LinearGradient, Paint, Path, PathBuilder,
    Pixmap, PixmapPaint, Point, SpreadMode, Stroke, Transform,
};

/// Cubic control point distance for a quarter circle
const KAPPA: f32 = 0.552_284_8;

pub struct RasterSurface {
    pixmap: Pixmap,
    scale: f32,
    typeface: Typeface,
}

impl RasterSurface {
    /// Surface of `width` x `height` logical pixels, `scale` device pixels
    /// per logical pixel, filled with `background`.
    pub fn new(width: f32, height: f32, scale: f32, background: Color) -> ApiResult<Self> {
        let device_width = (width * scale).round().max(1.0) as u32;
        let device_height = (height * scale).round().max(1.0) as u32;
        let mut pixmap = Pixmap::new(device_width, device_height).ok_or_else(|| {
            ApiError::Image(format!(
                "Cannot allocate {}x{} canvas",
                device_width, device_height
            ))
        })?;
        pixmap.fill(to_skia(background));
        Ok(Self {
            pixmap,
            scale,
            typeface: Typeface::embedded()?,
        })
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Straight-alpha copy of the canvas
    pub fn to_image(&self) -> RgbaImage {
        let width = self.pixmap.width();
        let pixels = self.pixmap.pixels();
        RgbaImage::from_fn(width, self.pixmap.height(), |x, y| {
            let color = pixels[(y * width + x) as usize].demultiply();
            Rgba([color.red(), color.green(), color.blue(), color.alpha()])
        })
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.scale, self.scale)
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        let transform = self.transform();
        self.pixmap
            .fill_path(path, &solid(color), FillRule::Winding, transform, None);
    }

    /// Outlines for `text` laid out from a device-space pen position
    fn layout_glyphs(&self, text: &str, font: &Font, x: f32, baseline: f32) -> Vec<OutlinedGlyph> {
        let face = self.typeface.face(font);
        let scale = self.typeface.px_scale(font, font.size * self.scale);
        let scaled = face.as_scaled(scale);

        let mut outlined = Vec::new();
        let mut pen_x = x;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                pen_x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(pen_x, baseline));
            pen_x += scaled.h_advance(id);
            previous = Some(id);
            // Whitespace has no outline
            if let Some(glyph) = face.outline_glyph(glyph) {
                outlined.push(glyph);
            }
        }
        outlined
    }
}

impl TextMeasurer for RasterSurface {
    fn measure_text(&self, text: &str, font: &Font) -> f32 {
        self.typeface.text_width(text, font, 1.0)
    }
}

impl Surface for RasterSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(area) = to_skia_rect(rect) else {
            return;
        };
        let transform = self.transform();
        self.pixmap.fill_rect(area, &solid(color), transform, None);
    }

    fn fill_round_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        if let Some(path) = round_rect_path(rect, radius) {
            self.fill_path(&path, color);
        }
    }

    fn stroke_round_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        // Keep the 1px line inside the shape
        let Some(path) = round_rect_path(rect.inset(0.5), (radius - 0.5).max(0.0)) else {
            return;
        };
        let stroke = Stroke {
            width: 1.0,
            ..Stroke::default()
        };
        let transform = self.transform();
        self.pixmap
            .stroke_path(&path, &solid(color), &stroke, transform, None);
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        let Some(area) = to_skia_rect(rect) else {
            return;
        };
        let Some(shader) = LinearGradient::new(
            Point::from_xy(rect.x, rect.y),
            Point::from_xy(rect.x, rect.bottom()),
            vec![
                GradientStop::new(0.0, to_skia(top)),
                GradientStop::new(1.0, to_skia(bottom)),
            ],
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        let transform = self.transform();
        self.pixmap.fill_rect(area, &paint, transform, None);
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Rect) {
        if dest.width <= 0.0 || dest.height <= 0.0 {
            return;
        }
        let Some(source) = to_pixmap(image) else {
            return;
        };
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        let transform = self
            .transform()
            .pre_translate(dest.x, dest.y)
            .pre_scale(
                dest.width / image.width() as f32,
                dest.height / image.height() as f32,
            );
        self.pixmap
            .draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        let font = style.font;
        let metrics = self.typeface.line_metrics(&font, self.scale);
        let left = match style.align {
            TextAlign::Left => x * self.scale,
            TextAlign::Center => {
                (x * self.scale) - self.typeface.text_width(text, &font, self.scale) / 2.0
            }
        };
        let baseline = match style.baseline {
            Baseline::Top => y * self.scale + metrics.ascent,
            Baseline::Middle => y * self.scale + (metrics.ascent - metrics.descent) / 2.0,
        };

        let glyphs = self.layout_glyphs(text, &font, left, baseline);
        let Some(mask) = GlyphMask::rasterize(&glyphs) else {
            return;
        };
        if let Some(layer) = mask.colored(style.color) {
            self.pixmap.draw_pixmap(
                mask.left,
                mask.top,
                layer.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }
}

/// Coverage of a run of glyphs over their combined device-pixel bounds
struct GlyphMask {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
    coverage: Vec<f32>,
}

impl GlyphMask {
    fn rasterize(glyphs: &[OutlinedGlyph]) -> Option<Self> {
        let bounds = glyphs.iter().map(OutlinedGlyph::px_bounds).reduce(|a, b| {
            ab_glyph::Rect {
                min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
                max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
            }
        })?;
        let left = bounds.min.x.floor() as i32;
        let top = bounds.min.y.floor() as i32;
        let width = (bounds.max.x.ceil() as i32 - left).max(0) as u32;
        let height = (bounds.max.y.ceil() as i32 - top).max(0) as u32;
        if width == 0 || height == 0 {
            return None;
        }

        let mut coverage = vec![0.0_f32; (width * height) as usize];
        for glyph in glyphs {
            let glyph_bounds = glyph.px_bounds();
            let offset_x = glyph_bounds.min.x as i32 - left;
            let offset_y = glyph_bounds.min.y as i32 - top;
            glyph.draw(|gx, gy, c| {
                let px = offset_x + gx as i32;
                let py = offset_y + gy as i32;
                if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                    return;
                }
                let cell = &mut coverage[(py as u32 * width + px as u32) as usize];
                *cell = (*cell + c).min(1.0);
            });
        }
        Some(Self {
            left,
            top,
            width,
            height,
            coverage,
        })
    }

    /// Layer filled with `color`, alpha scaled by coverage
    fn colored(&self, color: Color) -> Option<Pixmap> {
        let mut layer = Pixmap::new(self.width, self.height)?;
        for (pixel, coverage) in layer.pixels_mut().iter_mut().zip(&self.coverage) {
            let alpha = (f32::from(color.a) * coverage).round() as u8;
            *pixel = ColorU8::from_rgba(color.r, color.g, color.b, alpha).premultiply();
        }
        Some(layer)
    }
}

fn to_skia(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn solid(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn to_skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

/// Rounded rectangle outline; the radius is capped at half the shorter side
fn round_rect_path(rect: Rect, radius: f32) -> Option<Path> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    if r == 0.0 {
        return to_skia_rect(rect).map(PathBuilder::from_rect);
    }
    let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
    pb.finish()
}

/// Premultiplied copy of decoded artwork
fn to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (pixel, source) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = source.0;
        *pixel = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}
