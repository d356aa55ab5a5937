//! The four-tier recommendation fallback cascade.
//!
//! Tiers are tried in order until one yields a non-empty product list:
//!
//! 1. remote recommender service, scored server-side;
//! 2. local scoring over the merged owned + external pool;
//! 3. local scoring over the external catalog alone, when the owned
//!    source itself is down;
//! 4. the static curated list, which cannot fail.
//!
//! Each tier runs under its own timeout and attempt budget; a cancelled
//! request stops where it is and produces nothing rather than advancing.

use std::time::Duration;

use shelf_catalog::RecommenderClient;
use shelf_core::{score, Product, PurchaseHistoryEntry, RecommendationResult, Tier};

use crate::cancel::CancelToken;
use crate::curated::curated_products;
use crate::merge::CatalogSources;

/// Timeout and retry budget for one tier.
#[derive(Debug, Clone, Copy)]
pub struct TierPolicy {
    pub timeout: Duration,
    /// Total attempts, including the first. Never zero.
    pub max_attempts: u32,
    pub backoff_base_ms: u64,
}

/// Per-tier policies for the cascade.
#[derive(Debug, Clone, Copy)]
pub struct CascadeConfig {
    pub remote: TierPolicy,
    pub local_full: TierPolicy,
    pub local_external: TierPolicy,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            remote: TierPolicy {
                timeout: Duration::from_secs(2),
                max_attempts: 3,
                backoff_base_ms: 1000,
            },
            local_full: TierPolicy {
                timeout: Duration::from_secs(6),
                max_attempts: 1,
                backoff_base_ms: 1000,
            },
            local_external: TierPolicy {
                timeout: Duration::from_secs(6),
                max_attempts: 1,
                backoff_base_ms: 1000,
            },
        }
    }
}

enum TierOutcome {
    Delivered(Vec<Product>),
    Advance,
    Cancelled,
}

/// Drives the fallback cascade over the configured sources.
pub struct Cascade {
    sources: CatalogSources,
    remote: Option<RecommenderClient>,
    config: CascadeConfig,
}

impl Cascade {
    #[must_use]
    pub fn new(
        sources: CatalogSources,
        remote: Option<RecommenderClient>,
        config: CascadeConfig,
    ) -> Self {
        Self {
            sources,
            remote,
            config,
        }
    }

    #[must_use]
    pub fn sources(&self) -> &CatalogSources {
        &self.sources
    }

    /// Produces recommendations, falling through the tiers as needed.
    ///
    /// Returns `None` only when `cancel` fires; every other failure mode
    /// falls through to the curated tier, which always delivers.
    pub async fn recommend(
        &self,
        history: &[PurchaseHistoryEntry],
        limit: usize,
        cancel: &CancelToken,
    ) -> Option<RecommendationResult> {
        if let Some(client) = &self.remote {
            // Best effort: give a cold recommender a chance to come up
            // before the scored attempts begin.
            if let Err(error) = client.warm().await {
                tracing::debug!(%error, "recommender warm-up probe failed");
            }
            let op = || async move { remote_recommendations(client, history, limit).await };
            match attempt_tier(Tier::Remote, self.config.remote, cancel, op).await {
                TierOutcome::Delivered(products) => {
                    return Some(RecommendationResult::new(products, Tier::Remote));
                }
                TierOutcome::Cancelled => return None,
                TierOutcome::Advance => {}
            }
        } else {
            tracing::debug!("no recommender configured; skipping remote tier");
        }

        let sources = &self.sources;
        let op = || async move {
            let outcome = sources.merged(None).await;
            if outcome.owned_ok {
                Some(score(history, &outcome.products, limit))
            } else {
                None
            }
        };
        match attempt_tier(Tier::LocalFull, self.config.local_full, cancel, op).await {
            TierOutcome::Delivered(products) => {
                return Some(RecommendationResult::new(products, Tier::LocalFull));
            }
            TierOutcome::Cancelled => return None,
            TierOutcome::Advance => {}
        }

        let op = || async move {
            let fetched = sources.fetch_external(None).await;
            if fetched.ok {
                Some(score(history, &fetched.products, limit))
            } else {
                None
            }
        };
        match attempt_tier(Tier::LocalExternal, self.config.local_external, cancel, op).await {
            TierOutcome::Delivered(products) => {
                return Some(RecommendationResult::new(products, Tier::LocalExternal));
            }
            TierOutcome::Cancelled => return None,
            TierOutcome::Advance => {}
        }

        tracing::info!("all live tiers exhausted; serving curated fallback");
        Some(RecommendationResult::new(curated_products(), Tier::Curated))
    }
}

/// Fetches remote recommendations; `None` on transport or protocol failure,
/// so the tier machinery retries or advances.
async fn remote_recommendations(
    client: &RecommenderClient,
    history: &[PurchaseHistoryEntry],
    limit: usize,
) -> Option<Vec<Product>> {
    match client.recommend(history, limit).await {
        Ok(products) => Some(products),
        Err(error) => {
            tracing::warn!(%error, "remote recommender attempt failed");
            None
        }
    }
}

/// Runs one tier: up to `max_attempts` executions of `op`, each bounded by
/// the tier timeout and raced against cancellation.
///
/// An attempt succeeds when `op` resolves to a non-empty `Some`; an empty
/// result set is treated as a miss, not a failure worth retrying.
async fn attempt_tier<F, Fut>(
    tier: Tier,
    policy: TierPolicy,
    cancel: &CancelToken,
    mut op: F,
) -> TierOutcome
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Option<Vec<Product>>>,
{
    for attempt in 1..=policy.max_attempts.max(1) {
        if cancel.is_cancelled() {
            tracing::info!(%tier, "request cancelled before tier attempt");
            return TierOutcome::Cancelled;
        }

        let attempted = tokio::select! {
            () = cancel.cancelled() => {
                tracing::info!(%tier, attempt, "request cancelled mid-attempt");
                return TierOutcome::Cancelled;
            }
            attempted = tokio::time::timeout(policy.timeout, op()) => attempted,
        };

        match attempted {
            Ok(Some(products)) if !products.is_empty() => {
                tracing::debug!(%tier, attempt, count = products.len(), "tier delivered");
                return TierOutcome::Delivered(products);
            }
            Ok(Some(_)) => {
                tracing::debug!(%tier, attempt, "tier produced no candidates; advancing");
                return TierOutcome::Advance;
            }
            Ok(None) => {
                tracing::warn!(%tier, attempt, "tier attempt failed");
            }
            Err(_) => {
                tracing::warn!(
                    %tier,
                    attempt,
                    timeout_ms = policy.timeout.as_millis() as u64,
                    "tier attempt timed out"
                );
            }
        }

        if attempt < policy.max_attempts {
            let backoff = Duration::from_millis(
                policy
                    .backoff_base_ms
                    .saturating_mul(1u64 << (attempt - 1).min(10)),
            );
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::info!(%tier, "request cancelled during backoff");
                    return TierOutcome::Cancelled;
                }
                () = tokio::time::sleep(backoff) => {}
            }
        }
    }

    TierOutcome::Advance
}
