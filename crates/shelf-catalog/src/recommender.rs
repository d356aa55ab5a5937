//! HTTP client for the remote recommender service.
//!
//! The recommender accepts `{history, limit}` and answers with either
//! `{"recommendations": [...]}` or a bare array — both shapes have been
//! observed and both are accepted. Retry and timeout policy for this
//! service live in the fallback cascade, not here: one call, one attempt.

use std::time::Duration;

use reqwest::{Client, Url};

use shelf_core::{normalize_recommended, Product, PurchaseHistoryEntry, RecommendedRecord};

use crate::error::CatalogError;

/// Client for the remote recommender service.
pub struct RecommenderClient {
    client: Client,
    base_url: Url,
}

impl RecommenderClient {
    /// Creates a client with the given request timeout and `User-Agent`.
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
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| CatalogError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    /// Requests recommendations for the given purchase history.
    ///
    /// Items in the response are parsed and validated individually; malformed
    /// ones are skipped with a logged warning. An empty result is not an
    /// error here — the cascade treats it as a tier failure.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Http`] on network failure or timeout.
    /// - [`CatalogError::UnexpectedStatus`] on a non-2xx response.
    /// - [`CatalogError::Deserialize`] if the body is not JSON or carries no
    ///   recommendation array in either accepted shape.
    pub async fn recommend(
        &self,
        history: &[PurchaseHistoryEntry],
        limit: usize,
    ) -> Result<Vec<Product>, CatalogError> {
        let url = self
            .base_url
            .join("recommend")
            .map_err(|e| CatalogError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .post(url.clone())
            .json(&serde_json::json!({ "history": history, "limit": limit }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body: serde_json::Value = {
            let text = response.text().await?;
            serde_json::from_str(&text).map_err(|e| CatalogError::Deserialize {
                context: url.to_string(),
                source: e,
            })?
        };

        let items = body
            .get("recommendations")
            .and_then(serde_json::Value::as_array)
            .or_else(|| body.as_array())
            .ok_or_else(|| CatalogError::Deserialize {
                context: format!("{url}: no recommendation array in response"),
                source: <serde_json::Error as serde::de::Error>::custom(
                    "expected an array or a recommendations field",
                ),
            })?
            .clone();

        Ok(items
            .into_iter()
            .filter_map(|item| {
                let record = match serde_json::from_value::<RecommendedRecord>(item) {
                    Ok(record) => record,
                    Err(error) => {
                        tracing::warn!(%error, "skipping malformed recommender item");
                        return None;
                    }
                };
                let product = normalize_recommended(&record);
                if product.is_none() {
                    tracing::warn!(id = record.id, "dropping recommender item without name or price");
                }
                product
            })
            .take(limit)
            .collect())
    }

    /// Best-effort liveness probe, used to pre-warm a cold instance before
    /// the real call.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Http`] on network failure or
    /// [`CatalogError::UnexpectedStatus`] if the service answers non-2xx.
    pub async fn warm(&self) -> Result<(), CatalogError> {
        let response = self.client.get(self.base_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.base_url.to_string(),
            });
        }
        Ok(())
    }
}
