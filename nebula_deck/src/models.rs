use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

lazy_static! {
    static ref SET_CODE: Regex = Regex::new(r"^([A-Z]+)(\d+)-").unwrap();
}

/// A catalog value that may arrive either as a JSON number or as text
///
/// Keeping both shapes lets `0` and `""` survive as real values instead of
/// collapsing into "absent".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(serde_json::Number),
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Flag(_) => None,
        }
    }

    /// Whether the value is worth displaying: non-zero, non-empty, or `true`
    pub fn is_shown(&self) -> bool {
        match self {
            FieldValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Flag(b) => *b,
        }
    }
}

/// The field's display text when it is worth showing
pub fn shown(value: &Option<FieldValue>) -> Option<String> {
    value
        .as_ref()
        .filter(|v| v.is_shown())
        .map(ToString::to_string)
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => f.write_str(&format_number(n)),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

/// Render a JSON number the way a browser would print it: integral floats
/// lose their trailing `.0`.
pub fn format_number(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 9.0e15 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

/// Card record as returned by the catalog service.
///
/// Every descriptive attribute is optional; fields the model does not name
/// are carried in `extra` so a cached copy round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battle_power_1: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battle_power_2: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battle_power_3: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battle_power_4: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battle_power_ex: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errata_enable: Option<FieldValue>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Card {
    /// Canonical identity: `number`, falling back to `id`, as text.
    pub fn key(&self) -> Option<String> {
        let usable = |value: &Option<FieldValue>| {
            value
                .as_ref()
                .map(|v| v.to_string())
                .filter(|s| !s.is_empty())
        };
        usable(&self.number).or_else(|| usable(&self.id))
    }

    /// Display name with the generic fallback used in listings and tiles
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or("Card")
    }

    /// `number`, `rarity` and `feature` joined by `separator`, with `N/A`
    /// and `?` standing in for missing values
    pub fn identity_line(&self, separator: &str) -> String {
        let or_unknown = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .unwrap_or("?")
                .to_string()
        };
        [
            shown(&self.number).unwrap_or_else(|| "N/A".to_string()),
            or_unknown(&self.rarity),
            or_unknown(&self.feature),
        ]
        .join(separator)
    }

    /// Artwork URL for thumbnails, preferring the small rendition
    pub fn artwork_url(&self) -> Option<&str> {
        self.thumbnail_image_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.image_url.as_deref().filter(|s| !s.is_empty()))
    }

    /// Set code derived from the card number, e.g. `BP1-004` -> `BP01`
    pub fn set_code(&self) -> Option<String> {
        let number = match self.number.as_ref()? {
            FieldValue::Text(s) => s.as_str(),
            _ => return None,
        };
        if number.starts_with("PR") {
            return Some("PR".to_string());
        }
        let caps = SET_CODE.captures(number)?;
        Some(format!("{}{:0>2}", &caps[1], &caps[2]))
    }

    /// Battle power stats that are present, labelled for display
    pub fn battle_power_stats(&self) -> Vec<(&'static str, &FieldValue)> {
        [
            ("BP1", &self.battle_power_1),
            ("BP2", &self.battle_power_2),
            ("BP3", &self.battle_power_3),
            ("BP4", &self.battle_power_4),
            ("BPEX", &self.battle_power_ex),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| (label, v)))
        .collect()
    }

    /// Subset of fields embedded in exported deck files.
    ///
    /// Enough to list and render the card again without a catalog lookup.
    pub fn snapshot(&self) -> Card {
        Card {
            id: self.id.clone(),
            number: self.number.clone(),
            name: self.name.clone(),
            type_name: self.type_name.clone(),
            character_name: self.character_name.clone(),
            rarity: self.rarity.clone(),
            feature: self.feature.clone(),
            card_type: self.card_type.clone(),
            level: self.level.clone(),
            round: self.round.clone(),
            effect: self.effect.clone(),
            battle_power_1: self.battle_power_1.clone(),
            battle_power_2: self.battle_power_2.clone(),
            battle_power_3: self.battle_power_3.clone(),
            battle_power_4: self.battle_power_4.clone(),
            battle_power_ex: self.battle_power_ex.clone(),
            image_url: self.image_url.clone(),
            thumbnail_image_url: self.thumbnail_image_url.clone(),
            publication_year: None,
            errata_enable: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Severity of the most recent status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Info,
    Warn,
    Error,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Info => "info",
            Tone::Warn => "warn",
            Tone::Error => "error",
        }
    }
}

/// Single most-recent status line shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub message: String,
    pub tone: Tone,
}

impl Status {
    pub fn new(message: impl Into<String>, tone: Tone) -> Self {
        Self {
            message: message.into(),
            tone,
        }
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
