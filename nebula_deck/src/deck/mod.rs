//! Deck state: entries keyed by card key, bounded by copy limits and the
//! deck cap.
//!
//! Entries live in a `BTreeMap`, so every reader (listing, export, image
//! tiles) sees them sorted by key.

pub mod serializer;

use crate::config::{DeckConfig, DECK_CAP};
use crate::error::ApiResult;
use crate::models::Card;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub card: Card,
    pub count: u32,
}

/// Why an add was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitViolation {
    /// The deck already holds `cap` cards
    DeckFull { cap: u32 },
    /// The card is already at its copy limit
    CopyLimit { limit: u32 },
}

/// Result of a successful add
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    pub count: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    entries: BTreeMap<String, DeckEntry>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a deck from its persisted JSON record.
    ///
    /// Zero-count entries are dropped; a record that fails to parse is an
    /// error for the caller to report.
    pub fn from_record(bytes: &[u8]) -> ApiResult<Self> {
        let mut deck: Deck = serde_json::from_slice(bytes)?;
        deck.entries.retain(|key, entry| {
            if entry.count == 0 {
                log::warn!("Dropping empty deck entry {}", key);
            }
            entry.count > 0
        });
        Ok(deck)
    }

    /// Serialize the whole deck for the persistent store
    pub fn to_record(&self) -> ApiResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn get(&self, key: &str) -> Option<&DeckEntry> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DeckEntry)> {
        self.entries.iter()
    }

    pub fn entries(&self) -> impl Iterator<Item = &DeckEntry> {
        self.entries.values()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry counts
    pub fn total_count(&self) -> u32 {
        self.entries.values().map(|entry| entry.count).sum()
    }

    /// Number of distinct keys
    pub fn unique_count(&self) -> usize {
        self.entries.len()
    }

    /// Add one copy of `card` under `key`, enforcing the deck cap and the
    /// card's copy limit. Nothing changes when the add is refused.
    pub fn try_add(
        &mut self,
        key: &str,
        card: Card,
        config: &DeckConfig,
    ) -> Result<AddOutcome, LimitViolation> {
        if self.total_count() >= DECK_CAP {
            return Err(LimitViolation::DeckFull { cap: DECK_CAP });
        }

        let limit = config.limit_for_card(&card, key);
        let current = self.entries.get(key).map_or(0, |entry| entry.count);
        if current >= limit {
            return Err(LimitViolation::CopyLimit { limit });
        }

        let count = current + 1;
        self.entries
            .insert(key.to_string(), DeckEntry { card, count });
        Ok(AddOutcome { count, limit })
    }

    /// Shift an entry's count by `delta`, removing it at zero or below.
    ///
    /// Growth is clamped to the card's copy limit and the room left under
    /// the deck cap. Returns `false` when the key is not in the deck.
    pub fn change_count(&mut self, key: &str, delta: i64, config: &DeckConfig) -> bool {
        let total = self.total_count();
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        let current = i64::from(entry.count);
        let mut next = current + delta;
        if delta > 0 {
            let limit = i64::from(config.limit_for_card(&entry.card, key));
            let room = i64::from(DECK_CAP.saturating_sub(total));
            next = next.min(limit.max(current)).min(current + room);
        }
        if next <= 0 {
            self.entries.remove(key);
        } else {
            entry.count = u32::try_from(next).unwrap_or(u32::MAX);
        }
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Bring a deck from outside (a saved record, or one saved under other
    /// limits) back within the copy limits and the deck cap.
    ///
    /// Entries are visited in key order against a budget of [`DECK_CAP`]
    /// copies, each keeping `min(limit, count, remaining)`; entries left with
    /// nothing are dropped. Returns whether any copies were removed.
    pub fn enforce_limits(&mut self, config: &DeckConfig) -> bool {
        let mut remaining = DECK_CAP;
        let mut truncated = false;
        self.entries.retain(|key, entry| {
            let limit = config.limit_for_card(&entry.card, key);
            let allowed = entry.count.min(limit).min(remaining);
            if allowed < entry.count {
                log::warn!(
                    "Trimming {} from {} to {} copies to fit deck limits",
                    key,
                    entry.count,
                    allowed
                );
                truncated = true;
            }
            remaining -= allowed;
            entry.count = allowed;
            allowed > 0
        });
        truncated
    }

    /// Store an entry as-is; callers are responsible for the limits
    pub(crate) fn insert_entry(&mut self, key: String, entry: DeckEntry) {
        if entry.count == 0 {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, entry);
        }
    }
}

#[cfg(test)]
#[path = "deck_tests.rs"]
mod tests;
