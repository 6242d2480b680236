//! The deck builder controller.
//!
//! `DeckBuilder` owns everything a session touches: the catalog client, the
//! persistent store, the card cache, the deck and the latest status line.
//! Every deck mutation is written through to the store before returning.

use crate::api::{ArtworkLoader, Catalog, CatalogQuery};
use crate::cache::{fetch_card_cached, CardCache};
use crate::config::DeckConfig;
use crate::deck::serializer::{self, import_document};
use crate::deck::{Deck, LimitViolation};
use crate::error::{ApiError, ApiResult};
use crate::models::{Card, Status, Tone};
use crate::render;
use crate::store::{KeyValueStore, DECK_RECORD};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// A file produced by an export: suggested name plus contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct DeckBuilder<C: Catalog, S: KeyValueStore> {
    catalog: Option<C>,
    store: S,
    config: DeckConfig,
    cache: CardCache,
    deck: Deck,
    results: Vec<Card>,
    status: Status,
}

impl<C: Catalog, S: KeyValueStore> DeckBuilder<C, S> {
    /// Start a session, restoring the saved deck from `store`.
    ///
    /// `catalog` is `None` until a base address is configured. A missing or
    /// unreadable deck record starts an empty deck; a deck over the limits of
    /// `config` is trimmed and saved back.
    pub fn new(catalog: Option<C>, store: S, config: DeckConfig) -> Self {
        let mut deck = restore_deck(&store);
        let trimmed = deck.enforce_limits(&config);
        log::info!(
            "Restored deck with {} cards ({} unique)",
            deck.total_count(),
            deck.unique_count()
        );
        let mut builder = Self {
            catalog,
            store,
            config,
            cache: CardCache::new(),
            deck,
            results: Vec::new(),
            status: Status::default(),
        };
        if trimmed {
            builder.set_status("Saved deck was trimmed to fit deck limits.", Tone::Warn);
            builder.persist();
        }
        builder
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Cards from the latest fetch, after client-side filtering
    pub fn results(&self) -> &[Card] {
        &self.results
    }

    pub fn cache(&self) -> &CardCache {
        &self.cache
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set_catalog(&mut self, catalog: Option<C>) {
        self.catalog = catalog;
    }

    /// Query the catalog and replace the cached result set.
    ///
    /// A text query searches; otherwise the filters are sent as-is. The set
    /// filter is applied locally when enabled. Returns whether the fetch
    /// succeeded.
    pub async fn fetch_cards(&mut self, query: &CatalogQuery) -> bool {
        let Some(catalog) = self.catalog.as_ref() else {
            self.set_status(ApiError::NotConfigured.to_string(), Tone::Warn);
            return false;
        };

        let fetched = match query.search_text() {
            Some(text) => catalog.search(text).await,
            None => catalog.list(&query.filters).await,
        };
        let mut cards = match fetched {
            Ok(cards) => cards,
            Err(e) => {
                log::error!("Card fetch failed: {}", e);
                self.set_status(e.to_string(), Tone::Error);
                return false;
            }
        };

        if self.config.features.set_filter {
            if let Some(set) = query.set_code() {
                cards.retain(|card| card.set_code().as_deref() == Some(set));
            }
        }

        self.cache.replace_all(&cards);
        self.set_status(format!("Loaded {} cards.", cards.len()), Tone::Info);
        self.results = cards;
        true
    }

    /// Add one copy of the card with `key`. Returns whether the deck changed.
    pub async fn add(&mut self, key: &str) -> bool {
        let Some(card) = self.resolve_card(key).await else {
            self.set_status("Card not found. Try refreshing results first.", Tone::Warn);
            return false;
        };

        match self.deck.try_add(key, card, &self.config) {
            Ok(outcome) => {
                let name = self
                    .deck
                    .get(key)
                    .map_or("Card", |entry| entry.card.display_name())
                    .to_string();
                self.persist();
                self.set_status(
                    format!("Added {} ({}/{}).", name, outcome.count, outcome.limit),
                    Tone::Info,
                );
                true
            }
            Err(LimitViolation::DeckFull { cap }) => {
                self.set_status(
                    format!("Deck is full ({} card limit). Remove a card first.", cap),
                    Tone::Warn,
                );
                false
            }
            Err(LimitViolation::CopyLimit { limit }) => {
                self.set_status(
                    format!("You can only run {} copies of this card.", limit),
                    Tone::Warn,
                );
                false
            }
        }
    }

    /// Cache first, then the deck itself, then the catalog
    async fn resolve_card(&mut self, key: &str) -> Option<Card> {
        if let Some(card) = self.cache.get(key) {
            return Some(card.clone());
        }
        if let Some(entry) = self.deck.get(key) {
            return Some(entry.card.clone());
        }
        let catalog = self.catalog.as_ref()?;
        match fetch_card_cached(&mut self.cache, catalog, key).await {
            Ok(card) => card,
            Err(e) => {
                log::warn!("Card fetch failed for {}: {}", key, e);
                None
            }
        }
    }

    /// Shift a deck entry's count; at zero or below the entry is removed.
    /// Returns `false` when `key` is not in the deck.
    pub fn change_count(&mut self, key: &str, delta: i64) -> bool {
        let Some(name) = self
            .deck
            .get(key)
            .map(|entry| entry.card.display_name().to_string())
        else {
            return false;
        };
        self.deck.change_count(key, delta, &self.config);
        match self.deck.get(key) {
            Some(entry) => {
                let limit = self.config.limit_for_card(&entry.card, key);
                let message = format!("{}: {}/{}.", name, entry.count, limit);
                self.set_status(message, Tone::Info);
            }
            None => self.set_status(format!("Removed {}.", name), Tone::Info),
        }
        self.persist();
        true
    }

    pub fn decrement(&mut self, key: &str) -> bool {
        self.change_count(key, -1)
    }

    /// Drop every copy of `key`
    pub fn remove(&mut self, key: &str) -> bool {
        let count = self.deck.get(key).map_or(0, |entry| entry.count);
        self.change_count(key, -i64::from(count))
    }

    pub fn clear(&mut self) {
        self.deck.clear();
        self.persist();
        self.set_status("Deck cleared.", Tone::Info);
    }

    /// Pretty JSON export of the current deck
    pub fn export_json(&mut self, now: DateTime<Utc>) -> ApiResult<ExportFile> {
        let text = serializer::export_json(&self.deck, now)?;
        self.set_status("Deck exported as JSON.", Tone::Info);
        Ok(ExportFile {
            file_name: serializer::export_file_name(now),
            bytes: text.into_bytes(),
        })
    }

    /// Import raw file contents. Returns whether the deck was replaced.
    pub async fn import_bytes(&mut self, bytes: &[u8]) -> bool {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(document) => self.import_value(&document).await,
            Err(e) => {
                log::error!("Deck import failed: {}", e);
                self.set_status("Failed to import deck. Ensure it's valid JSON.", Tone::Error);
                false
            }
        }
    }

    /// Import an already parsed document, replacing the deck on success
    pub async fn import_value(&mut self, document: &Value) -> bool {
        let outcome = match import_document(document, &self.config, self.catalog.as_ref()).await {
            Ok(outcome) => outcome,
            Err(ApiError::InvalidFormat(reason)) => {
                log::warn!("Rejected deck document: {}", reason);
                self.set_status("Invalid deck file format.", Tone::Error);
                return false;
            }
            Err(e) => {
                log::error!("Deck import failed: {}", e);
                self.set_status("Failed to import deck. Ensure it's valid JSON.", Tone::Error);
                return false;
            }
        };

        for (key, card) in outcome.resolved {
            self.cache.insert(&key, card);
        }
        self.deck = outcome.deck;
        self.persist();
        if outcome.truncated {
            self.set_status("Deck imported with truncation to fit limits.", Tone::Info);
        } else {
            self.set_status("Deck imported from JSON.", Tone::Info);
        }
        true
    }

    /// Render the deck as a PNG. `Ok(None)` when the deck is empty.
    pub async fn export_image<L: ArtworkLoader>(
        &mut self,
        loader: &L,
        pixel_ratio: f32,
        now: DateTime<Utc>,
    ) -> ApiResult<Option<ExportFile>> {
        let Some(image) = render::render_deck(&self.deck, loader, pixel_ratio).await? else {
            self.set_status(
                "No cards to export. Add cards to the deck first.",
                Tone::Warn,
            );
            return Ok(None);
        };
        let bytes = render::encode_png(&image)?;
        self.set_status("Deck exported as an image.", Tone::Info);
        Ok(Some(ExportFile {
            file_name: render::image_file_name(now),
            bytes,
        }))
    }

    fn persist(&mut self) {
        let result = self
            .deck
            .to_record()
            .and_then(|record| self.store.set(DECK_RECORD, &record));
        if let Err(e) = result {
            log::error!("Failed to save deck: {}", e);
            self.set_status(format!("Failed to save deck: {}", e), Tone::Error);
        }
    }

    fn set_status(&mut self, message: impl Into<String>, tone: Tone) {
        let status = Status::new(message, tone);
        log::debug!("Status [{}]: {}", status.tone.as_str(), status.message);
        self.status = status;
    }
}

fn restore_deck<S: KeyValueStore>(store: &S) -> Deck {
    let bytes = match store.get(DECK_RECORD) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Deck::new(),
        Err(e) => {
            log::warn!("Failed to read saved deck: {}", e);
            return Deck::new();
        }
    };
    Deck::from_record(&bytes).unwrap_or_else(|e| {
        log::warn!("Saved deck is corrupt, starting empty: {}", e);
        Deck::new()
    })
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
