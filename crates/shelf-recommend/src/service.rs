//! High-level facade tying the merged catalog, the stored purchase
//! history, and the fallback cascade together for the server layer.

use sqlx::PgPool;

use shelf_core::{Product, PurchaseHistoryEntry, RecommendationResult};

use crate::cancel::CancelToken;
use crate::cascade::Cascade;

/// Application service over the catalog and recommendation pipeline.
pub struct Shelf {
    pool: PgPool,
    cascade: Cascade,
    default_limit: usize,
}

impl Shelf {
    #[must_use]
    pub fn new(pool: PgPool, cascade: Cascade, default_limit: usize) -> Self {
        Self {
            pool,
            cascade,
            default_limit,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Merged product list from both catalog sources.
    ///
    /// `category` of `None` or `"All"` (case-insensitive) means no filter.
    pub async fn list_products(&self, category: Option<&str>) -> Vec<Product> {
        let filter = category.filter(|c| !c.trim().is_empty() && !c.eq_ignore_ascii_case("all"));
        self.cascade.sources().list(filter).await
    }

    /// Sorted union of both sources' categories.
    pub async fn list_categories(&self) -> Vec<String> {
        self.cascade.sources().list_categories().await
    }

    /// Runs the recommendation cascade.
    ///
    /// When `history` is absent the stored purchase history is resolved
    /// from the database; a resolution failure degrades to an empty
    /// history (cold start) rather than failing the request. Returns
    /// `None` only on cancellation.
    pub async fn recommend(
        &self,
        history: Option<Vec<PurchaseHistoryEntry>>,
        limit: Option<usize>,
        cancel: &CancelToken,
    ) -> Option<RecommendationResult> {
        let history = match history {
            Some(entries) => entries,
            None => match shelf_store::resolve_history(&self.pool).await {
                Ok(entries) => entries,
                Err(error) => {
                    tracing::warn!(%error, "history resolution failed; using empty history");
                    Vec::new()
                }
            },
        };
        let limit = limit.unwrap_or(self.default_limit);
        self.cascade.recommend(&history, limit, cancel).await
    }
}
