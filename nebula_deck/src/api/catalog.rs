use crate::error::ApiResult;
use crate::models::Card;

/// Card catalog service: browse, search and fetch-by-key
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Free-text search
    async fn search(&self, query: &str) -> ApiResult<Vec<Card>>;

    /// Filtered listing
    async fn list(&self, filters: &CardFilters) -> ApiResult<Vec<Card>>;

    /// Look up a single card; `Ok(None)` when the catalog reports no match
    async fn get_by_key(&self, key: &str) -> ApiResult<Option<Card>>;
}

/// Loads raw artwork bytes for a card image URL
#[allow(async_fn_in_trait)]
pub trait ArtworkLoader {
    async fn load(&self, url: &str) -> ApiResult<Vec<u8>>;
}

/// Server-side listing filters. Empty strings count as "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFilters {
    pub rarity: Option<String>,
    pub feature: Option<String>,
    pub card_type: Option<String>,
    pub level: Option<String>,
    pub round: Option<String>,
    pub character_name: Option<String>,
    pub number: Option<String>,
    pub publication_year: Option<String>,
    pub errata_enable: bool,
}

impl CardFilters {
    /// Query string pairs in the order the catalog documents them
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let fields = [
            ("rarity", &self.rarity),
            ("feature", &self.feature),
            ("type", &self.card_type),
            ("level", &self.level),
            ("round", &self.round),
            ("character_name", &self.character_name),
            ("number", &self.number),
            ("publication_year", &self.publication_year),
        ];
        for (name, value) in fields {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((name, value.to_string()));
            }
        }
        if self.errata_enable {
            pairs.push(("errata_enable", "true".to_string()));
        }
        pairs
    }
}

/// One browse request: a text query switches to search and ignores filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub text: Option<String>,
    pub filters: CardFilters,
    /// Client-side set code filter, applied after the catalog answers
    pub set: Option<String>,
}

impl CatalogQuery {
    pub fn search_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn set_code(&self) -> Option<&str> {
        self.set.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
