//! Best-effort multi-source catalog fetch and merge.
//!
//! The owned store and the external catalog are fetched concurrently and
//! independently: either source failing yields an empty set from that
//! source, never a propagated error. Per-source success flags are kept for
//! the cascade, which distinguishes "owned failed" from "owned empty" when
//! choosing between the full-pool and external-only scoring tiers.

use std::collections::BTreeSet;

use sqlx::PgPool;

use shelf_catalog::CatalogClient;
use shelf_core::{normalize_external, normalize_owned, OwnedDoc, Product};
use shelf_store::{distinct_categories, find_products, OwnedRow};

/// Result of fetching one source.
#[derive(Debug)]
pub struct SourceFetch {
    pub products: Vec<Product>,
    /// `false` when the source could not be reached at all.
    pub ok: bool,
}

/// Result of the concurrent two-source fetch.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Owned products first, then external; the two id bands are disjoint.
    pub products: Vec<Product>,
    pub owned_ok: bool,
    pub external_ok: bool,
}

/// The two catalog sources behind the merged Read API.
pub struct CatalogSources {
    pool: PgPool,
    external: CatalogClient,
    page_limit: u32,
}

impl CatalogSources {
    #[must_use]
    pub fn new(pool: PgPool, external: CatalogClient, page_limit: u32) -> Self {
        Self {
            pool,
            external,
            page_limit,
        }
    }

    /// Fetches both sources concurrently and merges them.
    ///
    /// `category` is already in native terms; `None` means no filter.
    pub async fn merged(&self, category: Option<&str>) -> MergeOutcome {
        let (owned, external) = tokio::join!(
            self.fetch_owned(category),
            self.fetch_external(category)
        );

        let mut products = owned.products;
        products.extend(external.products);
        MergeOutcome {
            products,
            owned_ok: owned.ok,
            external_ok: external.ok,
        }
    }

    /// Merged product list; source failures degrade to empty sets.
    pub async fn list(&self, category: Option<&str>) -> Vec<Product> {
        self.merged(category).await.products
    }

    /// Set union of both sources' distinct categories, empty values
    /// excluded, sorted for stable output.
    pub async fn list_categories(&self) -> Vec<String> {
        let (owned, external) = tokio::join!(self.owned_categories(), self.external_categories());

        let mut union: BTreeSet<String> = BTreeSet::new();
        union.extend(owned);
        union.extend(external);
        union.retain(|c| !c.trim().is_empty());
        union.into_iter().collect()
    }

    /// Fetches and normalizes the owned catalog; two attempts, failure
    /// yields an empty set.
    pub async fn fetch_owned(&self, category: Option<&str>) -> SourceFetch {
        match self.owned_rows(category).await {
            Ok(rows) => SourceFetch {
                products: normalize_owned_rows(rows),
                ok: true,
            },
            Err(error) => {
                tracing::warn!(%error, "owned catalog unavailable; treating as empty");
                SourceFetch {
                    products: Vec::new(),
                    ok: false,
                }
            }
        }
    }

    /// Fetches and normalizes the external catalog; client-level retries,
    /// failure yields an empty set.
    pub async fn fetch_external(&self, category: Option<&str>) -> SourceFetch {
        let fetched = match category {
            Some(c) => self.external.fetch_by_category(c).await,
            None => self.external.fetch_products(self.page_limit, 0).await,
        };
        match fetched {
            Ok(records) => {
                let products = records
                    .iter()
                    .filter_map(|record| {
                        let product = normalize_external(record);
                        if product.is_none() {
                            tracing::warn!(
                                id = record.id,
                                "dropping external record without name or price"
                            );
                        }
                        product
                    })
                    .collect();
                SourceFetch { products, ok: true }
            }
            Err(error) => {
                tracing::warn!(%error, "external catalog unavailable; treating as empty");
                SourceFetch {
                    products: Vec::new(),
                    ok: false,
                }
            }
        }
    }

    async fn owned_rows(&self, category: Option<&str>) -> Result<Vec<OwnedRow>, shelf_store::StoreError> {
        match find_products(&self.pool, category).await {
            Ok(rows) => Ok(rows),
            Err(error) => {
                tracing::warn!(%error, "owned catalog read failed; retrying once");
                find_products(&self.pool, category).await
            }
        }
    }

    async fn owned_categories(&self) -> Vec<String> {
        match distinct_categories(&self.pool).await {
            Ok(categories) => categories,
            Err(error) => {
                tracing::warn!(%error, "owned category read failed; treating as empty");
                Vec::new()
            }
        }
    }

    async fn external_categories(&self) -> Vec<String> {
        match self.external.fetch_categories().await {
            Ok(categories) => categories,
            Err(error) => {
                tracing::warn!(%error, "external category read failed; treating as empty");
                Vec::new()
            }
        }
    }
}

/// Parses and normalizes owned documents, skipping malformed ones.
fn normalize_owned_rows(rows: Vec<OwnedRow>) -> Vec<Product> {
    rows.into_iter()
        .filter_map(|row| {
            let doc = match serde_json::from_value::<OwnedDoc>(row.doc) {
                Ok(doc) => doc,
                Err(error) => {
                    tracing::warn!(id = row.id, %error, "skipping malformed owned document");
                    return None;
                }
            };
            let product = normalize_owned(row.id, &doc);
            if product.is_none() {
                tracing::warn!(id = row.id, "dropping owned document without name or price");
            }
            product
        })
        .collect()
}
