//! Caching layer for catalog responses

pub mod card_cache;

pub use card_cache::{fetch_card_cached, CardCache};
