use nebula_deck::{
    CardFilters, CatalogQuery, Deck, DeckBuilder, DeckConfig, FileStore, HttpCatalog,
    HttpImageLoader, KeyValueStore, Tone,
};
use std::io::Cursor;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Test fixtures - a small catalog served over HTTP

fn card_json(number: &str, name: &str, rarity: &str, thumbnail: &str) -> serde_json::Value {
    serde_json::json!({
        "id": 7,
        "number": number,
        "name": name,
        "rarity": rarity,
        "feature": "Blue",
        "type": "Unit",
        "level": 2,
        "publication_year": 2024,
        "thumbnail_image_url": thumbnail
    })
}

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 40, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

async fn catalog_server() -> MockServer {
    let server = MockServer::start().await;
    let art = format!("{}/art/pilot.png", server.uri());

    Mock::given(method("GET"))
        .and(path("/cards"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            card_json("BP01-001", "Nebula Pilot", "SR", &art),
            card_json("PR-036", "Trooper", "P", &art),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/card/BP02-010"))
        .respond_with(ResponseTemplate::new(200).set_body_json(card_json(
            "BP02-010",
            "Star Warden",
            "C",
            &art,
        )))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/card/XX-999"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error": "not found" })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/art/pilot.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png_fixture(100, 230)))
        .mount(&server)
        .await;

    server
}

fn open_builder(server: &MockServer, dir: &TempDir) -> DeckBuilder<HttpCatalog, FileStore> {
    let store = FileStore::new(dir.path()).unwrap();
    DeckBuilder::new(
        Some(HttpCatalog::new(&server.uri())),
        store,
        DeckConfig::default(),
    )
}

fn listing() -> CatalogQuery {
    CatalogQuery {
        filters: CardFilters::default(),
        ..CatalogQuery::default()
    }
}

fn counts(deck: &Deck) -> Vec<(String, u32)> {
    deck.iter()
        .map(|(key, entry)| (key.clone(), entry.count))
        .collect()
}

#[tokio::test]
async fn test_deck_survives_restart() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();

    {
        let mut builder = open_builder(&server, &dir);
        assert!(builder.fetch_cards(&listing()).await);
        assert_eq!(builder.status().message, "Loaded 2 cards.");

        assert!(builder.add("BP01-001").await);
        assert!(builder.add("BP01-001").await);
        assert!(builder.add("PR-036").await);
        // Not in the result set: looked up by key
        assert!(builder.add("BP02-010").await);
        assert_eq!(builder.status().message, "Added Star Warden (1/4).");
    }

    let reopened = open_builder(&server, &dir);
    assert_eq!(
        counts(reopened.deck()),
        vec![
            ("BP01-001".to_string(), 2),
            ("BP02-010".to_string(), 1),
            ("PR-036".to_string(), 1),
        ]
    );
    assert_eq!(reopened.deck().total_count(), 4);
    assert_eq!(
        reopened.deck().get("BP02-010").unwrap().card.name.as_deref(),
        Some("Star Warden")
    );
}

#[tokio::test]
async fn test_unknown_key_is_reported() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();
    let mut builder = open_builder(&server, &dir);

    assert!(!builder.add("XX-999").await);
    assert_eq!(
        builder.status().message,
        "Card not found. Try refreshing results first."
    );
    assert_eq!(builder.status().tone, Tone::Warn);
    assert!(builder.deck().is_empty());
}

#[tokio::test]
async fn test_copy_limits_hold_across_the_session() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();
    let mut builder = open_builder(&server, &dir);
    builder.fetch_cards(&listing()).await;

    for _ in 0..4 {
        assert!(builder.add("BP01-001").await);
    }
    assert!(!builder.add("BP01-001").await);
    assert_eq!(
        builder.status().message,
        "You can only run 4 copies of this card."
    );

    // The promo runs up to the deck cap
    for _ in 0..46 {
        assert!(builder.add("PR-036").await);
    }
    assert_eq!(builder.deck().total_count(), 50);
    assert!(!builder.add("PR-036").await);
    assert_eq!(
        builder.status().message,
        "Deck is full (50 card limit). Remove a card first."
    );
}

#[tokio::test]
async fn test_export_file_imports_into_fresh_session() {
    let server = catalog_server().await;
    let source_dir = TempDir::new().unwrap();
    let mut source = open_builder(&server, &source_dir);
    source.fetch_cards(&listing()).await;
    source.add("BP01-001").await;
    source.add("PR-036").await;
    source.add("PR-036").await;

    let now = chrono::Utc::now();
    let export = source.export_json(now).unwrap();
    assert_eq!(
        export.file_name,
        format!("nebula-deck-{}.json", now.timestamp_millis())
    );
    let export_path = source_dir.path().join(&export.file_name);
    std::fs::write(&export_path, &export.bytes).unwrap();

    let target_dir = TempDir::new().unwrap();
    let mut target = open_builder(&server, &target_dir);
    let bytes = std::fs::read(&export_path).unwrap();
    assert!(target.import_bytes(&bytes).await);
    assert_eq!(target.status().message, "Deck imported from JSON.");
    assert_eq!(counts(target.deck()), counts(source.deck()));

    // The import was persisted, not only held in memory
    let record = target.store().get("nebula_deck").unwrap().unwrap();
    let stored = Deck::from_record(&record).unwrap();
    assert_eq!(counts(&stored), counts(source.deck()));
}

#[tokio::test]
async fn test_import_resolves_bare_keys_through_catalog() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();
    let mut builder = open_builder(&server, &dir);

    let document = serde_json::json!({
        "version": 1,
        "cards": [
            { "key": "BP02-010", "count": 9 },
            { "key": "XX-999", "count": 2 }
        ]
    });
    let bytes = serde_json::to_vec(&document).unwrap();
    assert!(builder.import_bytes(&bytes).await);

    assert_eq!(counts(builder.deck()), vec![("BP02-010".to_string(), 4)]);
    assert_eq!(
        builder.status().message,
        "Deck imported with truncation to fit limits."
    );
}

#[tokio::test]
async fn test_image_export_fetches_artwork() {
    let server = catalog_server().await;
    let dir = TempDir::new().unwrap();
    let mut builder = open_builder(&server, &dir);
    builder.fetch_cards(&listing()).await;
    builder.add("BP01-001").await;
    builder.add("PR-036").await;

    let now = chrono::Utc::now();
    let export = builder
        .export_image(&HttpImageLoader::new(), 1.0, now)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        export.file_name,
        format!("nebula-deck-{}.png", now.timestamp_millis())
    );

    let image = image::load_from_memory(&export.bytes).unwrap();
    assert_eq!((image.width(), image.height()), (960, 352));
    assert_eq!(builder.status().message, "Deck exported as an image.");
}
