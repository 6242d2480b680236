//! Deck image rendering

pub mod compositor;
pub mod font;
pub mod raster;
pub mod surface;
pub mod text;

pub use compositor::{encode_png, image_file_name, render_deck, GridLayout};
pub use font::{Font, Typeface};
pub use raster::RasterSurface;
pub use surface::{Color, Rect, Surface, TextStyle};
pub use text::{clamp_text, TextMeasurer};
