//! Portable deck documents: JSON export and limit-aware import.
//!
//! Document shape:
//! `{ "version": 1, "generatedAt": "...", "cards": [ { "key", "count", "card" } ] }`

use super::{Deck, DeckEntry};
use crate::api::Catalog;
use crate::config::{DeckConfig, APP_NAME, DECK_CAP};
use crate::error::{ApiError, ApiResult};
use crate::models::{format_number, Card};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version written into every exported document
pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckDocument {
    pub version: u32,
    pub generated_at: String,
    pub cards: Vec<DocumentEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub key: String,
    pub count: u32,
    pub card: Card,
}

/// Build the export document, entries sorted by key
pub fn export_document(deck: &Deck, generated_at: DateTime<Utc>) -> DeckDocument {
    let cards = deck
        .iter()
        .map(|(key, entry)| DocumentEntry {
            key: key.clone(),
            count: entry.count,
            card: entry.card.snapshot(),
        })
        .collect();
    DeckDocument {
        version: EXPORT_VERSION,
        generated_at: generated_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        cards,
    }
}

/// Pretty-printed export document
pub fn export_json(deck: &Deck, generated_at: DateTime<Utc>) -> ApiResult<String> {
    Ok(serde_json::to_string_pretty(&export_document(
        deck,
        generated_at,
    ))?)
}

/// `nebula-deck-<millis>.json`
pub fn export_file_name(now: DateTime<Utc>) -> String {
    format!("{}-deck-{}.json", APP_NAME, now.timestamp_millis())
}

/// Outcome of a well-formed import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Replacement deck contents
    pub deck: Deck,
    /// Whether any requested copies were dropped to fit the limits
    pub truncated: bool,
    /// Cards resolved along the way, for the catalog cache
    pub resolved: Vec<(String, Card)>,
}

/// Rebuild a deck from an arbitrary parsed document.
///
/// Entries are processed in document order against a budget of
/// [`DECK_CAP`] copies. Once the budget is spent, processing stops: later
/// entries are dropped even if they would fit. Entries without an embedded
/// card are looked up through `catalog`; entries that cannot be resolved
/// are skipped without consuming budget.
pub async fn import_document<C: Catalog>(
    document: &Value,
    config: &DeckConfig,
    catalog: Option<&C>,
) -> ApiResult<ImportOutcome> {
    let entries = document
        .get("cards")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::InvalidFormat("missing cards array".to_string()))?;

    match document.get("version") {
        Some(v) if v.as_u64() == Some(u64::from(EXPORT_VERSION)) => {}
        other => log::warn!(
            "Importing deck document with unexpected version {:?}",
            other
        ),
    }

    let mut deck = Deck::new();
    let mut resolved = Vec::new();
    let mut remaining = DECK_CAP;
    let mut truncated = false;

    for entry in entries {
        let Some(key) = entry.get("key").and_then(coerce_key) else {
            continue;
        };
        let desired = entry.get("count").map_or(0, coerce_count);
        if desired == 0 {
            continue;
        }
        if remaining == 0 {
            truncated = true;
            break;
        }

        let Some(card) = resolve_entry_card(&key, entry.get("card"), catalog).await else {
            continue;
        };

        let limit = u64::from(config.limit_for_card(&card, &key));
        let allowed = limit.min(desired).min(u64::from(remaining));
        // allowed <= remaining <= DECK_CAP, so the narrowing is lossless
        let allowed = allowed as u32;
        remaining -= allowed;
        if u64::from(allowed) < desired {
            truncated = true;
        }

        resolved.push((key.clone(), card.clone()));
        deck.insert_entry(
            key,
            DeckEntry {
                card,
                count: allowed,
            },
        );
    }

    Ok(ImportOutcome {
        deck,
        truncated,
        resolved,
    })
}

async fn resolve_entry_card<C: Catalog>(
    key: &str,
    embedded: Option<&Value>,
    catalog: Option<&C>,
) -> Option<Card> {
    if let Some(value @ Value::Object(_)) = embedded {
        match serde_json::from_value::<Card>(value.clone()) {
            Ok(card) => return Some(card),
            Err(e) => log::warn!("Ignoring unreadable embedded card for {}: {}", key, e),
        }
    }

    let catalog = catalog?;
    match catalog.get_by_key(key).await {
        Ok(card) => card,
        Err(e) => {
            log::warn!("Card fetch failed for import {}: {}", key, e);
            None
        }
    }
}

/// Usable entry key: non-empty text, a non-zero number, or `true`
fn coerce_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()) => {
            Some(format_number(n))
        }
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Requested copy count with browser number coercion, floored; anything
/// unusable reads as zero.
fn coerce_count(value: &Value) -> u64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => 0.0,
    };
    if number.is_finite() && number >= 1.0 {
        // float-to-int casts saturate
        number.floor() as u64
    } else if number.is_infinite() && number > 0.0 {
        u64::MAX
    } else {
        0
    }
}

#[cfg(test)]
#[path = "serializer_tests.rs"]
mod tests;
