//! In-memory collaborators shared by unit tests.

use crate::api::{ArtworkLoader, CardFilters, Catalog};
use crate::error::{ApiError, ApiResult};
use crate::models::Card;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

pub fn card(number: &str, name: &str) -> Card {
    Card {
        number: Some(number.into()),
        name: Some(name.to_string()),
        rarity: Some("C".to_string()),
        feature: Some("Red".to_string()),
        ..Card::default()
    }
}

/// Catalog backed by a fixed card list
#[derive(Default)]
pub struct FakeCatalog {
    cards: Vec<Card>,
    lookups: Cell<usize>,
    fail_lookups: bool,
    listing_error: Option<(u16, String)>,
    requests: RefCell<Vec<String>>,
}

impl FakeCatalog {
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            ..Self::default()
        }
    }

    /// Every `get_by_key` fails with a server error
    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    /// `search` and `list` fail with the given status
    pub fn failing_listing(mut self, status: u16, body: &str) -> Self {
        self.listing_error = Some((status, body.to_string()));
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn listing_result(&self) -> ApiResult<()> {
        match &self.listing_error {
            Some((status, body)) => Err(ApiError::HttpStatus {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Catalog for FakeCatalog {
    async fn search(&self, query: &str) -> ApiResult<Vec<Card>> {
        self.requests.borrow_mut().push(format!("search:{query}"));
        self.listing_result()?;
        let needle = query.to_lowercase();
        Ok(self
            .cards
            .iter()
            .filter(|c| c.display_name().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn list(&self, filters: &CardFilters) -> ApiResult<Vec<Card>> {
        let query: Vec<String> = filters
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        self.requests
            .borrow_mut()
            .push(format!("list:{}", query.join("&")));
        self.listing_result()?;
        Ok(self.cards.clone())
    }

    async fn get_by_key(&self, key: &str) -> ApiResult<Option<Card>> {
        self.lookups.set(self.lookups.get() + 1);
        if self.fail_lookups {
            return Err(ApiError::HttpStatus {
                status: 500,
                body: "lookup failed".to_string(),
            });
        }
        Ok(self
            .cards
            .iter()
            .find(|c| c.key().as_deref() == Some(key))
            .cloned())
    }
}

/// Artwork loader serving canned bytes and recording request order
#[derive(Default)]
pub struct FakeLoader {
    images: HashMap<String, Vec<u8>>,
    requested: RefCell<Vec<String>>,
}

impl FakeLoader {
    pub fn with_image(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.images.insert(url.to_string(), bytes);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl ArtworkLoader for FakeLoader {
    async fn load(&self, url: &str) -> ApiResult<Vec<u8>> {
        self.requested.borrow_mut().push(url.to_string());
        self.images.get(url).cloned().ok_or(ApiError::HttpStatus {
            status: 404,
            body: format!("Image fetch failed: {url}"),
        })
    }
}

/// A small solid-colour PNG
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
