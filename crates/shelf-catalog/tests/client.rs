//! Integration tests for `CatalogClient` using wiremock HTTP mocks.

use shelf_catalog::{CatalogClient, CatalogError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> CatalogClient {
    CatalogClient::new(base_url, 30, "shelf-test/0.1", 1, 0)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn fetch_products_parses_page_and_skips_malformed_items() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "products": [
            { "id": 1, "title": "Essence Mascara", "price": 9.99,
              "thumbnail": "https://cdn.example.com/1.jpg",
              "description": "Lash mascara", "category": "beauty" },
            { "title": "item without an id", "price": 5 },
            { "id": 2, "title": "Eyeshadow Palette", "price": 19.99, "category": "beauty" }
        ],
        "total": 3,
        "skip": 0,
        "limit": 100
    });

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("limit", "100"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client.fetch_products(100, 0).await.expect("should parse page");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, 1);
    assert_eq!(records[0].title.as_deref(), Some("Essence Mascara"));
    assert_eq!(records[1].id, 2);
}

#[tokio::test]
async fn fetch_by_category_hits_category_endpoint() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "products": [
            { "id": 7, "title": "Bookshelf", "price": 120, "category": "furniture" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/products/category/furniture"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client
        .fetch_by_category("furniture")
        .await
        .expect("should parse category page");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category.as_deref(), Some("furniture"));
}

#[tokio::test]
async fn fetch_product_returns_single_item() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "id": 42, "title": "Desk Lamp", "price": 34.5, "category": "lighting"
    });

    Mock::given(method("GET"))
        .and(path("/products/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let record = client.fetch_product(42).await.expect("should parse item");
    assert_eq!(record.id, 42);
    assert_eq!(record.title.as_deref(), Some("Desk Lamp"));
}

#[tokio::test]
async fn fetch_product_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/9999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.fetch_product(9999).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

#[tokio::test]
async fn fetch_categories_accepts_string_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!(["beauty", "furniture"])),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let categories = client.fetch_categories().await.expect("should parse");
    assert_eq!(categories, vec!["beauty", "furniture"]);
}

#[tokio::test]
async fn fetch_categories_accepts_object_array() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        { "slug": "beauty", "name": "Beauty", "url": "https://example.com/beauty" },
        { "slug": "home-decoration" },
        42
    ]);

    Mock::given(method("GET"))
        .and(path("/products/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let categories = client.fetch_categories().await.expect("should parse");
    assert_eq!(categories, vec!["Beauty", "home-decoration"]);
}

#[tokio::test]
async fn transient_server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "products": [{ "id": 1, "title": "Pen", "price": 2.5 }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let records = client
        .fetch_products(100, 0)
        .await
        .expect("second attempt should succeed");
    assert_eq!(records.len(), 1);
}
