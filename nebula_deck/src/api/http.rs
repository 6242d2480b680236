//! HTTP implementations of the catalog and artwork traits
//!
//! Uses async reqwest for non-blocking requests.

use super::catalog::{ArtworkLoader, CardFilters, Catalog};
use crate::config::sanitize_base;
use crate::error::{ApiError, ApiResult};
use crate::models::Card;
use serde::de::DeserializeOwned;

const USER_AGENT: &str = "Nebula-Deck/1.0";

/// Catalog service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: sanitize_base(base_url.trim()).to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        log::info!("Fetching from catalog: {}", url);

        let response = self
            .client
            .get(url)
            .query(query)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.json::<T>().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body,
            })
        }
    }
}

impl Catalog for HttpCatalog {
    async fn search(&self, query: &str) -> ApiResult<Vec<Card>> {
        let pairs = [("q", query.to_string())];
        self.fetch_json(&self.endpoint("search"), &pairs).await
    }

    async fn list(&self, filters: &CardFilters) -> ApiResult<Vec<Card>> {
        self.fetch_json(&self.endpoint("cards"), &filters.query_pairs())
            .await
    }

    async fn get_by_key(&self, key: &str) -> ApiResult<Option<Card>> {
        let url = self.endpoint(&format!("card/{}", urlencoding::encode(key)));
        let value: serde_json::Value = self.fetch_json(&url, &[]).await?;

        // The catalog answers unknown keys with `{ "error": ... }`
        if value.get("error").is_some_and(|e| !e.is_null()) {
            log::debug!("Catalog has no card for key {}", key);
            return Ok(None);
        }
        match value {
            serde_json::Value::Object(_) => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(None),
        }
    }
}

/// Plain HTTP image downloader for tile artwork
#[derive(Debug, Clone, Default)]
pub struct HttpImageLoader {
    client: reqwest::Client,
}

impl HttpImageLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ArtworkLoader for HttpImageLoader {
    async fn load(&self, url: &str) -> ApiResult<Vec<u8>> {
        log::debug!("Fetching image: {}", url);

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.bytes().await?.to_vec())
        } else {
            Err(ApiError::HttpStatus {
                status: status.as_u16(),
                body: format!("Image fetch failed: {}", url),
            })
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
