//! Tests for the HTTP catalog client.

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{HttpCatalog, HttpImageLoader};
use crate::api::catalog::{ArtworkLoader, CardFilters, Catalog};
use crate::error::ApiError;

/// Helper: creates a minimal catalog card JSON value for mock responses.
fn card_json(number: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": 101,
        "number": number,
        "name": name,
        "rarity": "C",
        "feature": "Red",
        "thumbnail_image_url": "https://example.com/thumb.png"
    })
}

// ── search / list ────────────────────────────────────────────────────

#[tokio::test]
async fn search_sends_query_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "dragon"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!([
                card_json("BP01-001", "Dragon Pilot"),
                card_json("BP01-002", "Dragon Rider"),
            ])),
        )
        .mount(&mock_server)
        .await;

    let catalog = HttpCatalog::new(&mock_server.uri());
    let cards = catalog.search("dragon").await.unwrap();

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].name.as_deref(), Some("Dragon Pilot"));
    assert_eq!(cards[1].key().as_deref(), Some("BP01-002"));
}

#[tokio::test]
async fn list_sends_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards"))
        .and(query_param("rarity", "SR"))
        .and(query_param("errata_enable", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([card_json("BP01-010", "Rare")])),
        )
        .mount(&mock_server)
        .await;

    let catalog = HttpCatalog::new(&format!("{}/", mock_server.uri()));
    let filters = CardFilters {
        rarity: Some("SR".to_string()),
        errata_enable: true,
        ..Default::default()
    };
    let cards = catalog.list(&filters).await.unwrap();

    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].rarity.as_deref(), Some("C"));
}

#[tokio::test]
async fn list_error_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
        .mount(&mock_server)
        .await;

    let catalog = HttpCatalog::new(&mock_server.uri());
    let result = catalog.list(&CardFilters::default()).await;

    match result {
        Err(ApiError::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "database offline");
        }
        other => panic!("Expected ApiError::HttpStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn list_invalid_json_is_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let catalog = HttpCatalog::new(&mock_server.uri());
    let result = catalog.list(&CardFilters::default()).await;
    assert!(matches!(result, Err(ApiError::Network(_))));
}

// ── get_by_key ───────────────────────────────────────────────────────

#[tokio::test]
async fn get_by_key_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/card/PR-036"))
        .respond_with(ResponseTemplate::new(200).set_body_json(card_json("PR-036", "Promo")))
        .mount(&mock_server)
        .await;

    let catalog = HttpCatalog::new(&mock_server.uri());
    let card = catalog.get_by_key("PR-036").await.unwrap().unwrap();
    assert_eq!(card.name.as_deref(), Some("Promo"));
}

#[tokio::test]
async fn get_by_key_error_body_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/card/XX-999"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "error": "Card not found" })),
        )
        .mount(&mock_server)
        .await;

    let catalog = HttpCatalog::new(&mock_server.uri());
    assert!(catalog.get_by_key("XX-999").await.unwrap().is_none());
}

#[tokio::test]
async fn get_by_key_404_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/card/XX-404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .mount(&mock_server)
        .await;

    let catalog = HttpCatalog::new(&mock_server.uri());
    let result = catalog.get_by_key("XX-404").await;
    assert!(matches!(
        result,
        Err(ApiError::HttpStatus { status: 404, .. })
    ));
}

// ── artwork ──────────────────────────────────────────────────────────

#[tokio::test]
async fn image_loader_returns_bytes() {
    let mock_server = MockServer::start().await;
    let png_magic = vec![0x89, 0x50, 0x4E, 0x47];

    Mock::given(method("GET"))
        .and(path("/art/thumb.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_magic.clone()))
        .mount(&mock_server)
        .await;

    let loader = HttpImageLoader::new();
    let bytes = loader
        .load(&format!("{}/art/thumb.png", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(bytes, png_magic);
}

#[tokio::test]
async fn image_loader_maps_failure_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/art/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let loader = HttpImageLoader::new();
    let result = loader
        .load(&format!("{}/art/missing.png", mock_server.uri()))
        .await;
    assert!(matches!(
        result,
        Err(ApiError::HttpStatus { status: 404, .. })
    ));
}

#[test]
fn base_url_is_sanitized() {
    let catalog = HttpCatalog::new(" http://localhost:8080/ ");
    assert_eq!(catalog.base_url(), "http://localhost:8080");
}
