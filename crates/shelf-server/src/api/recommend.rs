use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use shelf_core::{Product, PurchaseHistoryEntry, Tier};
use shelf_recommend::CancelToken;

use super::{ApiError, AppState};

/// Request body. Both fields are optional: an omitted history is resolved
/// from the stored purchase state, an omitted limit uses the default.
#[derive(Debug, Deserialize)]
pub(super) struct RecommendRequest {
    #[serde(default)]
    history: Option<Vec<PurchaseHistoryEntry>>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct RecommendResponse {
    recommendations: Vec<Product>,
    tier: Tier,
}

pub(super) async fn recommend(
    State(state): State<AppState>,
    Json(body): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    // HTTP requests carry no explicit abandonment signal; a disconnected
    // client drops this future, which cancels all in-flight tier work.
    let cancel = CancelToken::never();
    let Some(result) = state.shelf.recommend(body.history, body.limit, &cancel).await else {
        return Err(ApiError::new("internal_error", "recommendation cancelled"));
    };

    Ok(Json(RecommendResponse {
        recommendations: result.products,
        tier: result.tier,
    }))
}
