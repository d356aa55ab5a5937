use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which catalog a product came from.
///
/// The two origins occupy disjoint unified-id ranges: owned ids pass through
/// unchanged, external ids are offset by [`crate::EXTERNAL_ID_OFFSET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Owned,
    External,
}

/// A product in the unified id space, validated at the normalization boundary.
///
/// No unvalidated upstream shape flows past [`crate::normalize`]; anything
/// holding a `Product` may assume a non-empty name and a non-negative price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub unified_id: i64,
    pub origin: Origin,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    pub description: String,
    pub category: String,
}

/// One previously acquired product, as persisted in the purchase-history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseHistoryEntry {
    pub product_id: i64,
    pub category: String,
    pub price: Decimal,
    pub name: String,
}

/// The cascade tier that produced a recommendation set.
///
/// Recorded for observability only; callers never see a tier as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Remote recommender service.
    Remote,
    /// Local scoring over the owned + external merge.
    LocalFull,
    /// Local scoring over external data alone.
    LocalExternal,
    /// Static curated list; cannot fail.
    Curated,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Remote => write!(f, "remote"),
            Tier::LocalFull => write!(f, "local_full"),
            Tier::LocalExternal => write!(f, "local_external"),
            Tier::Curated => write!(f, "curated"),
        }
    }
}

/// An ordered recommendation set, annotated with the tier that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub products: Vec<Product>,
    pub tier: Tier,
}

impl RecommendationResult {
    #[must_use]
    pub fn new(products: Vec<Product>, tier: Tier) -> Self {
        Self { products, tier }
    }
}
