use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shelf_core::Product;
use shelf_store::StoreError;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub category: Option<String>,
}

/// Request body for adding a product to the owned catalog. All fields are
/// required; partial documents are rejected rather than stored.
#[derive(Debug, Deserialize)]
pub(super) struct NewProduct {
    name: String,
    price: Decimal,
    image: String,
    description: String,
    category: String,
}

#[derive(Debug, Serialize)]
pub(super) struct CreatedProduct {
    id: i64,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<Product>> {
    Json(state.shelf.list_products(query.category.as_deref()).await)
}

pub(super) async fn list_categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.shelf.list_categories().await)
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<NewProduct>,
) -> Result<Json<CreatedProduct>, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::new("validation_error", "name must not be empty"));
    }
    if body.price < Decimal::ZERO {
        return Err(ApiError::new("validation_error", "price must not be negative"));
    }
    if body.category.trim().is_empty() {
        return Err(ApiError::new("validation_error", "category must not be empty"));
    }

    let doc = serde_json::json!({
        "name": body.name,
        "price": body.price,
        "image": body.image,
        "description": body.description,
        "category": body.category,
    });

    let id = shelf_store::insert_product(state.shelf.pool(), &doc)
        .await
        .map_err(map_store_error)?;
    Ok(Json(CreatedProduct { id }))
}

pub(super) async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<axum::http::StatusCode, ApiError> {
    match shelf_store::delete_product(state.shelf.pool(), id).await {
        Ok(()) => Ok(axum::http::StatusCode::NO_CONTENT),
        Err(StoreError::NotFound) => Err(ApiError::new("not_found", "no such product")),
        Err(error) => Err(map_store_error(error)),
    }
}

fn map_store_error(error: StoreError) -> ApiError {
    tracing::error!(%error, "owned catalog write failed");
    ApiError::new("internal_error", "owned catalog unavailable")
}
