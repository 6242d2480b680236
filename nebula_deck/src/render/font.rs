//! Fonts for tile text.
//!
//! DejaVu Sans (regular and bold) is compiled into the binary so rendered
//! decks look the same on every machine. See `assets/fonts/LICENSE-DejaVu.txt`.

use crate::error::{ApiError, ApiResult};
use ab_glyph::{Font as _, FontRef, GlyphId, PxScale, ScaleFont as _};

static REGULAR_FACE: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static BOLD_FACE: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Size and weight of a piece of text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    /// Pixel size in logical pixels
    pub size: f32,
    pub bold: bool,
}

impl Font {
    pub const fn regular(size: f32) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: f32) -> Self {
        Self { size, bold: true }
    }
}

/// Vertical metrics for one font at one size, in the caller's units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    /// Distance from the top of the line to the baseline
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line (positive)
    pub descent: f32,
}

/// The embedded regular and bold faces
#[derive(Debug, Clone)]
pub struct Typeface {
    regular: FontRef<'static>,
    bold: FontRef<'static>,
}

impl Typeface {
    pub fn embedded() -> ApiResult<Self> {
        let parse = |bytes: &'static [u8], name: &str| {
            FontRef::try_from_slice(bytes)
                .map_err(|e| ApiError::Image(format!("Invalid embedded font {}: {}", name, e)))
        };
        Ok(Self {
            regular: parse(REGULAR_FACE, "DejaVuSans")?,
            bold: parse(BOLD_FACE, "DejaVuSans-Bold")?,
        })
    }

    pub fn face(&self, font: &Font) -> &FontRef<'static> {
        if font.bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    /// Glyph scale for an em size of `px` pixels, as CSS sizes fonts
    pub fn px_scale(&self, font: &Font, px: f32) -> PxScale {
        self.face(font)
            .pt_to_px_scale(px * 0.75)
            .unwrap_or_else(|| PxScale::from(px))
    }

    /// Whether the face has a real glyph (not `.notdef`) for `ch`
    pub fn covers(&self, font: &Font, ch: char) -> bool {
        self.face(font).glyph_id(ch) != GlyphId(0)
    }

    /// Advance width of `text` at `font.size * scale` pixels, kerning included
    pub fn text_width(&self, text: &str, font: &Font, scale: f32) -> f32 {
        let scaled = self
            .face(font)
            .as_scaled(self.px_scale(font, font.size * scale));
        let mut width = 0.0;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        width
    }

    pub fn line_metrics(&self, font: &Font, scale: f32) -> LineMetrics {
        let scaled = self
            .face(font)
            .as_scaled(self.px_scale(font, font.size * scale));
        LineMetrics {
            ascent: scaled.ascent(),
            descent: -scaled.descent(),
        }
    }
}
