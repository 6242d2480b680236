use crate::api::Catalog;
use crate::error::ApiResult;
use crate::models::Card;
use std::collections::HashMap;

/// In-memory index of the most recently seen card for each key.
///
/// Filled by catalog results and on-demand lookups; a later result for the
/// same key simply replaces the earlier one.
#[derive(Debug, Default, Clone)]
pub struct CardCache {
    /// Map of card key to card data
    cards: HashMap<String, Card>,
}

impl CardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a card from cache
    pub fn get(&self, key: &str) -> Option<&Card> {
        self.cards.get(key)
    }

    /// Insert a card under an explicit key
    pub fn insert(&mut self, key: &str, card: Card) {
        self.cards.insert(key.to_string(), card);
    }

    /// Insert a card under its own key; cards without identity are ignored
    pub fn remember(&mut self, card: Card) {
        match card.key() {
            Some(key) => {
                self.cards.insert(key, card);
            }
            None => log::debug!("Ignoring card without number or id"),
        }
    }

    /// Replace the whole index with a fresh result set
    pub fn replace_all(&mut self, cards: &[Card]) {
        self.cards.clear();
        for card in cards {
            self.remember(card.clone());
        }
        log::debug!("Card cache now holds {} entries", self.cards.len());
    }

    /// Get card count
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Fetch a card, checking cache first
pub async fn fetch_card_cached<C: Catalog>(
    cache: &mut CardCache,
    catalog: &C,
    key: &str,
) -> ApiResult<Option<Card>> {
    // Check cache first
    if let Some(card) = cache.get(key) {
        log::info!("Cache hit for {}", key);
        return Ok(Some(card.clone()));
    }

    // Fetch from API
    log::info!("Cache miss for {}, fetching from catalog", key);
    let card = catalog.get_by_key(key).await?;

    if let Some(ref card) = card {
        cache.insert(key, card.clone());
    }

    Ok(card)
}
