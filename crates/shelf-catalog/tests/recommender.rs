//! Integration tests for `RecommenderClient` using wiremock HTTP mocks.

use rust_decimal::Decimal;
use shelf_catalog::{CatalogError, RecommenderClient};
use shelf_core::{Origin, PurchaseHistoryEntry};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> RecommenderClient {
    RecommenderClient::new(base_url, 30, "shelf-test/0.1")
        .expect("client construction should not fail")
}

fn history() -> Vec<PurchaseHistoryEntry> {
    vec![PurchaseHistoryEntry {
        product_id: 5,
        category: "Electronics".to_string(),
        price: Decimal::from(2000),
        name: "Phone".to_string(),
    }]
}

#[tokio::test]
async fn recommend_parses_enveloped_response() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "recommendations": [
            { "id": 1042, "name": "Headphones", "price": 1800, "category": "Electronics" },
            { "id": 7, "name": "Notebook", "price": 120, "category": "Stationery" }
        ],
        "total_products": 2
    });

    Mock::given(method("POST"))
        .and(path("/recommend"))
        .and(body_partial_json(serde_json::json!({ "limit": 6 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let products = client
        .recommend(&history(), 6)
        .await
        .expect("should parse recommendations");

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].unified_id, 1042);
    assert_eq!(products[0].origin, Origin::External);
    assert_eq!(products[1].unified_id, 7);
    assert_eq!(products[1].origin, Origin::Owned);
}

#[tokio::test]
async fn recommend_accepts_bare_array_response() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "id": 12, "name": "Mug", "price": 9.5 }
    ]);

    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let products = client.recommend(&history(), 6).await.expect("should parse");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Mug");
}

#[tokio::test]
async fn recommend_drops_malformed_items_and_truncates_to_limit() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "recommendations": [
            { "id": 1, "name": "Valid", "price": 10 },
            { "id": 2, "price": 10 },
            { "name": "no id", "price": 10 },
            { "id": 3, "name": "Also valid", "price": 20 },
            { "id": 4, "name": "Third", "price": 30 }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let products = client.recommend(&history(), 2).await.expect("should parse");
    let ids: Vec<i64> = products.iter().map(|p| p.unified_id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn recommend_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.recommend(&history(), 6).await.unwrap_err();
    assert!(matches!(
        err,
        CatalogError::UnexpectedStatus { status: 500, .. }
    ));
}

#[tokio::test]
async fn recommend_rejects_bodies_without_an_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.recommend(&history(), 6).await.unwrap_err();
    assert!(matches!(err, CatalogError::Deserialize { .. }));
}

#[tokio::test]
async fn warm_succeeds_on_2xx() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    client.warm().await.expect("liveness probe should succeed");
}

#[tokio::test]
async fn warm_surfaces_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.warm().await.is_err());
}
