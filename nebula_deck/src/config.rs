//! Deck limits, feature flags and catalog address resolution

use crate::errors::Error;
use crate::models::Card;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Maximum number of copies across the whole deck
pub const DECK_CAP: u32 = 50;

/// Copies allowed for a card without an override entry
pub const DEFAULT_COPY_LIMIT: u32 = 4;

/// Prefix for exported file names
pub const APP_NAME: &str = "nebula";

/// Environment variable consulted when no catalog address was saved
pub const API_URL_ENV: &str = "NEBULA_API_URL";

/// Optional behaviour that differed between the two historic front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Features {
    /// Client-side filtering of catalog results by set code
    pub set_filter: bool,
    /// Battle power table plus full effect text for each result
    pub effect_tooltip: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            set_filter: true,
            effect_tooltip: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckConfig {
    pub default_copy_limit: u32,
    /// Per-card copy limits by card key
    pub copy_limits: HashMap<String, u32>,
    pub features: Features,
}

impl Default for DeckConfig {
    fn default() -> Self {
        let copy_limits = [("PR-036", 50), ("PR-107", 8)]
            .into_iter()
            .map(|(key, limit)| (key.to_string(), limit))
            .collect();
        Self {
            default_copy_limit: DEFAULT_COPY_LIMIT,
            copy_limits,
            features: Features::default(),
        }
    }
}

/// On-disk shape of an optional configuration file
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ConfigFile {
    copy_limits: HashMap<String, u32>,
    features: Option<Features>,
}

impl DeckConfig {
    /// Load defaults and merge the overrides found in a JSON config file
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::default();
        config.merge_json(&content)?;
        log::info!(
            "Loaded config from {} ({} copy limit overrides)",
            path.display(),
            config.copy_limits.len()
        );
        Ok(config)
    }

    fn merge_json(&mut self, content: &str) -> Result<(), Error> {
        let file: ConfigFile = serde_json::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid config file: {}", e)))?;
        for (key, limit) in file.copy_limits {
            if limit == 0 {
                return Err(Error::ConfigError(format!(
                    "Copy limit for {} must be positive",
                    key
                )));
            }
            self.copy_limits.insert(key, limit);
        }
        if let Some(features) = file.features {
            self.features = features;
        }
        Ok(())
    }

    /// Copy limit for a card key
    pub fn limit_for_key(&self, key: &str) -> u32 {
        self.copy_limits
            .get(key)
            .copied()
            .filter(|limit| *limit > 0)
            .unwrap_or(self.default_copy_limit)
    }

    /// Copy limit for a card, keyed by the card's own identity when it has one
    pub fn limit_for_card(&self, card: &Card, fallback_key: &str) -> u32 {
        match card.key() {
            Some(key) => self.limit_for_key(&key),
            None => self.limit_for_key(fallback_key),
        }
    }
}

/// Pick the catalog base address: saved value first, then the environment
pub fn resolve_api_base(stored: Option<&str>, env_value: Option<&str>) -> Option<String> {
    [stored, env_value]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Strip one trailing slash so endpoint paths can be appended
pub fn sanitize_base(base: &str) -> &str {
    base.strip_suffix('/').unwrap_or(base)
}
