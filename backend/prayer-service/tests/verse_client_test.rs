//! Integration Tests: Bible API client
//!
//! Runs the HTTP verse client against a local mock server.

mod common;

use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::date;
use prayer_service::services::{
    BibleApiClient, ContentFetchError, DailyVerseCache, DailyVerseProvider, ManualClock,
    VerseCatalog, VersePayload, VerseSource,
};

fn client(server: &MockServer) -> BibleApiClient {
    BibleApiClient::new(server.uri(), Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn fetches_text_and_reference() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/John%203%3A16"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "reference": "John 3:16",
            "text": "For God so loved the world...",
            "translation_id": "web"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client(&server).fetch("John 3:16").await.unwrap();

    assert_eq!(
        payload,
        VersePayload {
            text: "For God so loved the world...".to_string(),
            reference: "John 3:16".to_string(),
        }
    );
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client(&server).fetch("Psalm 23:1").await.unwrap_err();
    assert_eq!(err, ContentFetchError::Status(500));
}

#[tokio::test]
async fn not_found_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "not found"
        })))
        .mount(&server)
        .await;

    let err = client(&server).fetch("Hezekiah 1:1").await.unwrap_err();
    assert_eq!(err, ContentFetchError::Status(404));
}

#[tokio::test]
async fn invalid_json_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = client(&server).fetch("Psalm 23:1").await.unwrap_err();
    assert!(matches!(err, ContentFetchError::Malformed(_)));
}

#[tokio::test]
async fn missing_fields_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "reference": "Psalm 23:1" })),
        )
        .mount(&server)
        .await;

    let err = client(&server).fetch("Psalm 23:1").await.unwrap_err();
    assert_eq!(err, ContentFetchError::MissingField("text"));
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "text": "late", "reference": "x" }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = BibleApiClient::new(server.uri(), Duration::from_millis(200)).unwrap();
    let err = client.fetch("Psalm 23:1").await.unwrap_err();
    assert!(matches!(err, ContentFetchError::Transport(_)));
}

#[tokio::test]
async fn provider_over_http_fetches_once_per_day() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Psalm%2023%3A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "reference": "Psalm 23:1",
            "text": "The LORD is my shepherd; I shall not want."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = VerseCatalog::new(["Psalm 23:1"]).unwrap();
    let cache = Arc::new(DailyVerseCache::new());
    let provider = DailyVerseProvider::new(
        catalog,
        Arc::new(client(&server)),
        cache.clone(),
        Arc::new(ManualClock::on_date(date(2025, 9, 1))),
    );

    for _ in 0..3 {
        assert_eq!(
            provider.get_today().await.unwrap(),
            "The LORD is my shepherd; I shall not want. - Psalm 23:1"
        );
    }
    assert_eq!(cache.peek().unwrap().cached_for, date(2025, 9, 1));

    server.verify().await;
}

#[tokio::test]
async fn provider_over_http_does_not_cache_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let cache = Arc::new(DailyVerseCache::new());
    let provider = DailyVerseProvider::new(
        VerseCatalog::default(),
        Arc::new(client(&server)),
        cache.clone(),
        Arc::new(ManualClock::on_date(date(2025, 9, 1))),
    );

    assert!(provider.get_today().await.is_err());
    assert!(provider.get_today().await.is_err());
    assert!(cache.peek().is_none());
}
