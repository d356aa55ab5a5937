//! HTTP client for the external read-only product catalog.
//!
//! The external source exposes a paginated collection endpoint
//! (`/products?limit=&skip=`), a category-filtered list
//! (`/products/category/{category}`), a single-item endpoint
//! (`/products/{id}`), and a distinct-category listing
//! (`/products/categories`). Payload items are loosely typed; each one is
//! parsed individually and skipped on failure rather than failing the whole
//! page.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use shelf_core::ExternalRecord;

use crate::error::CatalogError;
use crate::retry::retry_with_backoff;

/// One page of the external collection endpoint.
#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Vec<serde_json::Value>,
}

/// Client for the external catalog.
///
/// Transient errors (network failures, 5xx) are retried with exponential
/// backoff up to `max_retries` additional attempts. Use
/// [`CatalogClient::new`] with a mock server base URL in tests.
pub struct CatalogClient {
    client: Client,
    base_url: Url,
    /// Additional attempts after the first failure.
    max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    backoff_base_ms: u64,
}

impl CatalogClient {
    /// Creates a client with configured timeout, `User-Agent`, and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`CatalogError::InvalidBaseUrl`] if
    /// `base_url` is not a valid hierarchical URL.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // joined path segments land under the root rather than replacing the
        // last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| CatalogError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot serve as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Fetches one page of the collection endpoint.
    ///
    /// Items that fail to deserialize (e.g. a non-numeric price) are skipped
    /// with a logged warning, not propagated.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Http`] on network failure after all retries.
    /// - [`CatalogError::UnexpectedStatus`] on a non-2xx response (5xx retried).
    /// - [`CatalogError::Deserialize`] if the envelope is not valid JSON.
    pub async fn fetch_products(
        &self,
        limit: u32,
        skip: u32,
    ) -> Result<Vec<ExternalRecord>, CatalogError> {
        let mut url = self.endpoint(&["products"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("skip", &skip.to_string());

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let body = self.request_json(&url).await?;
                let envelope: ProductsEnvelope =
                    serde_json::from_value(body).map_err(|e| CatalogError::Deserialize {
                        context: format!("products page (limit={limit}, skip={skip})"),
                        source: e,
                    })?;
                Ok(parse_records(envelope.products))
            }
        })
        .await
    }

    /// Fetches the category-filtered list endpoint.
    ///
    /// The filter is applied in the source's native terms; callers decide
    /// what "All" means.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_products`].
    pub async fn fetch_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ExternalRecord>, CatalogError> {
        let url = self.endpoint(&["products", "category", category]);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let body = self.request_json(&url).await?;
                let envelope: ProductsEnvelope =
                    serde_json::from_value(body).map_err(|e| CatalogError::Deserialize {
                        context: format!("products for category \"{category}\""),
                        source: e,
                    })?;
                Ok(parse_records(envelope.products))
            }
        })
        .await
    }

    /// Fetches a single item by its native id.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::NotFound`] if the source has no such item.
    /// - [`CatalogError::Deserialize`] if the item does not match the
    ///   expected shape.
    /// - [`CatalogError::Http`] / [`CatalogError::UnexpectedStatus`] as for
    ///   the other endpoints.
    pub async fn fetch_product(&self, native_id: i64) -> Result<ExternalRecord, CatalogError> {
        let url = self.endpoint(&["products", &native_id.to_string()]);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let body = self.request_json(&url).await?;
                serde_json::from_value(body).map_err(|e| CatalogError::Deserialize {
                    context: format!("product (id={native_id})"),
                    source: e,
                })
            }
        })
        .await
    }

    /// Fetches the source's distinct category list.
    ///
    /// Tolerates both payload shapes the source has used: a bare array of
    /// strings, or an array of objects carrying `name`/`slug`. Entries with
    /// neither are skipped.
    ///
    /// # Errors
    ///
    /// Same as [`CatalogClient::fetch_products`].
    pub async fn fetch_categories(&self) -> Result<Vec<String>, CatalogError> {
        let url = self.endpoint(&["products", "categories"]);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let body = self.request_json(&url).await?;
                let entries: Vec<serde_json::Value> =
                    serde_json::from_value(body).map_err(|e| CatalogError::Deserialize {
                        context: "category list".to_owned(),
                        source: e,
                    })?;

                Ok(entries
                    .iter()
                    .filter_map(category_name)
                    .filter(|c| !c.is_empty())
                    .collect())
            }
        })
        .await
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            // Validated as hierarchical at construction, so this cannot fail.
            let Ok(mut parts) = url.path_segments_mut() else {
                return url;
            };
            parts.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends a GET request, triages the status code, and parses the body as JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, CatalogError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}

/// Parses collection items individually, skipping any that fail.
fn parse_records(items: Vec<serde_json::Value>) -> Vec<ExternalRecord> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<ExternalRecord>(item) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::warn!(%error, "skipping malformed external catalog item");
                None
            }
        })
        .collect()
}

fn category_name(value: &serde_json::Value) -> Option<String> {
    if let Some(s) = value.as_str() {
        return Some(s.to_owned());
    }
    value
        .get("name")
        .or_else(|| value.get("slug"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
}
