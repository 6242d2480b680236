//! Deck image export: one tile per deck entry on a fixed grid.

use super::font::Font;
use super::raster::RasterSurface;
use super::surface::{Color, Rect, Surface, TextStyle};
use super::text::clamp_text;
use crate::api::ArtworkLoader;
use crate::config::APP_NAME;
use crate::deck::Deck;
use crate::error::ApiResult;
use crate::models::{shown, Card};
use chrono::{DateTime, Utc};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

pub const TILES_PER_ROW: usize = 4;
pub const TILE_WIDTH: f32 = 220.0;
pub const TILE_HEIGHT: f32 = 320.0;
pub const TILE_GAP: f32 = 16.0;

const TILE_PADDING: f32 = 10.0;
const TILE_RADIUS: f32 = 12.0;
/// Height reserved below the artwork for captions
const CAPTION_HEIGHT: f32 = 90.0;
const OVERLAY_HEIGHT: f32 = 110.0;
const BADGE_WIDTH: f32 = 46.0;
const BADGE_HEIGHT: f32 = 26.0;

const BACKGROUND: Color = Color::rgb(0x0b, 0x10, 0x20);
const TILE_FILL: Color = Color::rgb(0x11, 0x18, 0x2d);
const TILE_STROKE: Color = Color::rgba8(255, 255, 255, 26);
const PLACEHOLDER_FILL: Color = Color::rgba8(255, 255, 255, 10);
const PLACEHOLDER_STROKE: Color = Color::rgba8(255, 255, 255, 20);
const PLACEHOLDER_TEXT: Color = Color::rgba8(200, 220, 255, 128);
const OVERLAY_TOP: Color = Color::rgba8(12, 18, 36, 204);
const OVERLAY_BOTTOM: Color = Color::rgba8(12, 18, 36, 242);
const TITLE_COLOR: Color = Color::rgb(0xe8, 0xf0, 0xff);
const META_COLOR: Color = Color::rgb(0x9f, 0xb3, 0xd9);
const BADGE_FILL: Color = Color::rgba8(99, 255, 214, 46);
const BADGE_STROKE: Color = Color::rgba8(99, 255, 214, 128);
const BADGE_TEXT: Color = Color::rgb(0x63, 0xff, 0xd6);

const TITLE_FONT: Font = Font::bold(18.0);
const META_FONT: Font = Font::regular(13.0);
const BADGE_FONT: Font = Font::bold(14.0);
const PLACEHOLDER_FONT: Font = Font::regular(12.0);

/// Canvas geometry for a given number of tiles, in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub rows: usize,
    pub width: f32,
    pub height: f32,
}

impl GridLayout {
    pub fn for_tiles(count: usize) -> Self {
        let rows = count.div_ceil(TILES_PER_ROW);
        Self {
            rows,
            width: TILE_GAP + TILES_PER_ROW as f32 * (TILE_WIDTH + TILE_GAP),
            height: TILE_GAP + rows as f32 * (TILE_HEIGHT + TILE_GAP),
        }
    }

    /// Tile rectangle for the `index`-th entry, filled row by row
    pub fn tile_rect(&self, index: usize) -> Rect {
        let col = index % TILES_PER_ROW;
        let row = index / TILES_PER_ROW;
        Rect::new(
            TILE_GAP + col as f32 * (TILE_WIDTH + TILE_GAP),
            TILE_GAP + row as f32 * (TILE_HEIGHT + TILE_GAP),
            TILE_WIDTH,
            TILE_HEIGHT,
        )
    }
}

/// High-density displays get a 2x raster, everything else 1x
pub fn scale_for_pixel_ratio(pixel_ratio: f32) -> f32 {
    if pixel_ratio > 1.0 {
        2.0
    } else {
        1.0
    }
}

/// Render the deck to an image, or `None` when the deck is empty.
pub async fn render_deck<L: ArtworkLoader>(
    deck: &Deck,
    loader: &L,
    pixel_ratio: f32,
) -> ApiResult<Option<RgbaImage>> {
    if deck.is_empty() {
        return Ok(None);
    }
    let layout = GridLayout::for_tiles(deck.unique_count());
    let mut surface = RasterSurface::new(
        layout.width,
        layout.height,
        scale_for_pixel_ratio(pixel_ratio),
        BACKGROUND,
    )?;
    draw_deck(&mut surface, deck, &layout, loader).await;
    Ok(Some(surface.to_image()))
}

/// Draw every tile in key order. Artwork loads are awaited one at a time.
pub async fn draw_deck<S: Surface, L: ArtworkLoader>(
    surface: &mut S,
    deck: &Deck,
    layout: &GridLayout,
    loader: &L,
) {
    surface.fill_rect(Rect::new(0.0, 0.0, layout.width, layout.height), BACKGROUND);
    for (index, entry) in deck.entries().enumerate() {
        draw_card_tile(surface, &entry.card, entry.count, layout.tile_rect(index), loader).await;
    }
}

pub async fn draw_card_tile<S: Surface, L: ArtworkLoader>(
    surface: &mut S,
    card: &Card,
    count: u32,
    tile: Rect,
    loader: &L,
) {
    surface.fill_round_rect(tile, TILE_RADIUS, TILE_FILL);
    surface.stroke_round_rect(tile, TILE_RADIUS, TILE_STROKE);

    let art_area = Rect::new(
        tile.x + TILE_PADDING,
        tile.y + TILE_PADDING,
        tile.width - TILE_PADDING * 2.0,
        tile.height - CAPTION_HEIGHT,
    );
    let artwork = match card.artwork_url() {
        Some(url) => load_artwork(loader, url).await,
        None => None,
    };
    match artwork {
        Some(image) => {
            let dest = fit_artwork(image.width(), image.height(), &tile, &art_area);
            surface.draw_image(&image, dest);
        }
        None => draw_placeholder(surface, art_area),
    }

    draw_captions(surface, card, &tile);
    draw_badge(surface, count, &tile);
}

/// Fetch and decode artwork; failures are logged and yield `None`
pub async fn load_artwork<L: ArtworkLoader>(loader: &L, url: &str) -> Option<RgbaImage> {
    let bytes = match loader.load(url).await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("Image load failed {}: {}", url, e);
            return None;
        }
    };
    match image::load_from_memory(&bytes) {
        Ok(decoded) => Some(decoded.to_rgba8()),
        Err(e) => {
            log::warn!("Image decode failed {}: {}", url, e);
            None
        }
    }
}

/// Largest aspect-preserving fit inside `area`, centred on the tile and
/// top-aligned.
pub fn fit_artwork(width: u32, height: u32, tile: &Rect, area: &Rect) -> Rect {
    let (width, height) = (width.max(1) as f32, height.max(1) as f32);
    let ratio = (area.width / width).min(area.height / height);
    let draw_width = width * ratio;
    let draw_height = height * ratio;
    Rect::new(
        tile.x + (tile.width - draw_width) / 2.0,
        area.y,
        draw_width,
        draw_height,
    )
}

pub fn draw_placeholder<S: Surface>(surface: &mut S, area: Rect) {
    surface.fill_round_rect(area, 10.0, PLACEHOLDER_FILL);
    surface.stroke_round_rect(area, 10.0, PLACEHOLDER_STROKE);
    surface.fill_text(
        "No image",
        area.x + area.width / 2.0,
        area.y + area.height / 2.0,
        &TextStyle::new(PLACEHOLDER_FONT, PLACEHOLDER_TEXT).centered(),
    );
}

fn draw_captions<S: Surface>(surface: &mut S, card: &Card, tile: &Rect) {
    let overlay = Rect::new(
        tile.x,
        tile.bottom() - OVERLAY_HEIGHT,
        tile.width,
        OVERLAY_HEIGHT,
    );
    surface.fill_vertical_gradient(overlay, OVERLAY_TOP, OVERLAY_BOTTOM);

    let text_width = tile.width - 24.0;
    let detail_width = tile.width - 72.0;
    let left = tile.x + 12.0;

    let title = clamp_text(&*surface, card.display_name(), &TITLE_FONT, text_width);
    surface.fill_text(
        &title,
        left,
        tile.bottom() - 102.0,
        &TextStyle::new(TITLE_FONT, TITLE_COLOR),
    );

    let meta_style = TextStyle::new(META_FONT, META_COLOR);
    let meta = clamp_text(&*surface, &card.identity_line(" | "), &META_FONT, text_width);
    surface.fill_text(&meta, left, tile.bottom() - 76.0, &meta_style);

    // Type, level and round share the last caption row
    let detail_y = tile.bottom() - 58.0;
    if let Some(card_type) = card.card_type.as_deref().filter(|t| !t.is_empty()) {
        let text = clamp_text(&*surface, &format!("Type: {card_type}"), &META_FONT, detail_width);
        surface.fill_text(&text, tile.x + 60.0, detail_y, &meta_style);
    }
    if let Some(level) = shown(&card.level) {
        let text = clamp_text(&*surface, &format!("Level: {level}"), &META_FONT, text_width);
        surface.fill_text(&text, left, detail_y, &meta_style);
    }
    if let Some(round) = shown(&card.round) {
        let text = clamp_text(&*surface, &format!("Round: {round}"), &META_FONT, text_width);
        surface.fill_text(&text, left, detail_y, &meta_style);
    }
}

fn draw_badge<S: Surface>(surface: &mut S, count: u32, tile: &Rect) {
    let badge = Rect::new(
        tile.right() - BADGE_WIDTH - 10.0,
        tile.y + 10.0,
        BADGE_WIDTH,
        BADGE_HEIGHT,
    );
    surface.fill_round_rect(badge, 8.0, BADGE_FILL);
    surface.stroke_round_rect(badge, 8.0, BADGE_STROKE);
    surface.fill_text(
        &format!("x{count}"),
        badge.x + BADGE_WIDTH / 2.0,
        badge.y + BADGE_HEIGHT / 2.0,
        &TextStyle::new(BADGE_FONT, BADGE_TEXT).centered(),
    );
}

pub fn encode_png(image: &RgbaImage) -> ApiResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// `nebula-deck-<millis>.png`
pub fn image_file_name(now: DateTime<Utc>) -> String {
    format!("{}-deck-{}.png", APP_NAME, now.timestamp_millis())
}

#[cfg(test)]
#[path = "compositor_tests.rs"]
mod tests;
