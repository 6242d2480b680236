pub mod api;
pub mod builder;
pub mod cache;
pub mod config;
pub mod deck;
pub mod error;
pub mod errors;
pub mod formatters;
pub mod models;
pub mod render;
pub mod store;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used items
pub use api::{ArtworkLoader, CardFilters, Catalog, CatalogQuery, HttpCatalog, HttpImageLoader};
pub use builder::{DeckBuilder, ExportFile};
pub use cache::{fetch_card_cached, CardCache};
pub use config::{DeckConfig, Features, DECK_CAP, DEFAULT_COPY_LIMIT};
pub use deck::serializer::{export_document, import_document, DeckDocument, ImportOutcome};
pub use deck::{Deck, DeckEntry};
pub use error::{ApiError, ApiResult};
pub use formatters::{format_deck, format_results, FilterOptions};
pub use models::{Card, FieldValue, Status, Tone};
pub use store::{FileStore, KeyValueStore, MemoryStore};
