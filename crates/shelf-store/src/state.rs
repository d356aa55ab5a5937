//! Persisted client state and the purchase-history resolver.
//!
//! Three fixed keys in the `client_state` table: the append-only
//! purchase-history log, the last-acquired-batch snapshot (overwritten at
//! every checkout), and the pending selection (cart). The resolver enforces
//! the precedence pending > log > snapshot > empty: a non-empty pending
//! selection means a transaction just completed, so it is appended to the
//! log, snapshotted, cleared, and used as the immediate recommendation
//! context — it is the freshest signal of what the user just bought.

use sqlx::PgPool;

use shelf_core::PurchaseHistoryEntry;

use crate::StoreError;

/// Append-only log of every completed checkout.
pub const HISTORY_KEY: &str = "purchase_history";
/// Snapshot of the most recent checkout batch; overwritten, never appended.
pub const LAST_BATCH_KEY: &str = "last_purchased_items";
/// The in-progress, not-yet-finalized selection.
pub const PENDING_KEY: &str = "cart";

/// Outcome of reconciling the three state lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    /// The history to use as recommendation context for this call.
    pub context: Vec<PurchaseHistoryEntry>,
    /// When set, a checkout just completed: this batch must be appended to
    /// the log and must overwrite the snapshot.
    pub checkout: Option<Vec<PurchaseHistoryEntry>>,
}

/// Pure precedence rule over the three persisted lists.
///
/// - Non-empty pending selection wins outright and marks a checkout.
/// - Otherwise the log, if non-empty.
/// - Otherwise the snapshot stands in for a missing log.
#[must_use]
pub fn reconcile(
    log: Vec<PurchaseHistoryEntry>,
    snapshot: Vec<PurchaseHistoryEntry>,
    pending: Vec<PurchaseHistoryEntry>,
) -> Reconciled {
    if !pending.is_empty() {
        return Reconciled {
            context: pending.clone(),
            checkout: Some(pending),
        };
    }
    if !log.is_empty() {
        return Reconciled {
            context: log,
            checkout: None,
        };
    }
    Reconciled {
        context: snapshot,
        checkout: None,
    }
}

/// Reconstructs the purchase history and reconciles any pending selection
/// into it.
///
/// Reads all three keys, applies [`reconcile`], and on a completed checkout
/// appends the batch to the log, overwrites the snapshot, and clears the
/// pending selection before returning the batch as the context.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if any read or write fails. A stored value
/// that fails to parse is treated as empty (logged), not as an error.
pub async fn resolve_history(pool: &PgPool) -> Result<Vec<PurchaseHistoryEntry>, StoreError> {
    let log = get_entries(pool, HISTORY_KEY).await?;
    let snapshot = get_entries(pool, LAST_BATCH_KEY).await?;
    let pending = get_entries(pool, PENDING_KEY).await?;

    let outcome = reconcile(log.clone(), snapshot, pending);

    if let Some(batch) = &outcome.checkout {
        let mut updated = log;
        updated.extend(batch.iter().cloned());
        set_entries(pool, HISTORY_KEY, &updated).await?;
        set_entries(pool, LAST_BATCH_KEY, batch).await?;
        delete_key(pool, PENDING_KEY).await?;
        tracing::info!(
            batch_len = batch.len(),
            log_len = updated.len(),
            "reconciled pending selection into purchase history"
        );
    }

    Ok(outcome.context)
}

/// Reads one state key as a list of history entries.
///
/// Absent keys and unparseable stored values both yield an empty list; the
/// latter is logged.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the read fails.
pub async fn get_entries(
    pool: &PgPool,
    key: &str,
) -> Result<Vec<PurchaseHistoryEntry>, StoreError> {
    let value = sqlx::query_scalar::<_, serde_json::Value>(
        "SELECT value FROM client_state WHERE key = $1",
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    let Some(value) = value else {
        return Ok(Vec::new());
    };

    match serde_json::from_value(value) {
        Ok(entries) => Ok(entries),
        Err(error) => {
            tracing::warn!(key, %error, "stored client state is unparseable; treating as empty");
            Ok(Vec::new())
        }
    }
}

/// Writes one state key, replacing any previous value.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the write fails.
pub async fn set_entries(
    pool: &PgPool,
    key: &str,
    entries: &[PurchaseHistoryEntry],
) -> Result<(), StoreError> {
    let value = serde_json::to_value(entries)
        .map_err(|e| StoreError::Sqlx(sqlx::Error::Encode(Box::new(e))))?;
    sqlx::query(
        "INSERT INTO client_state (key, value) VALUES ($1, $2) \
         ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = now()",
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

async fn delete_key(pool: &PgPool, key: &str) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM client_state WHERE key = $1")
        .bind(key)
        .execute(pool)
        .await?;
    Ok(())
}
