//! CRUD over the owned catalog's document collection.
//!
//! The store is deliberately schemaless: each row holds one JSONB document.
//! Shape validation happens downstream at the normalization boundary, so
//! these functions neither inspect nor repair documents.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::StoreError;

/// A row from the `owned_products` table. The row id doubles as the
/// product's unified id.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedRow {
    pub id: i64,
    pub doc: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Inserts a product document and returns its generated id.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the insert fails.
pub async fn insert_product(pool: &PgPool, doc: &serde_json::Value) -> Result<i64, StoreError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO owned_products (doc) VALUES ($1) RETURNING id",
    )
    .bind(doc.clone())
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Lists product documents, optionally filtered by the document's category
/// field in the store's native terms.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the query fails.
pub async fn find_products(
    pool: &PgPool,
    category: Option<&str>,
) -> Result<Vec<OwnedRow>, StoreError> {
    let rows = sqlx::query_as::<_, OwnedRow>(
        "SELECT id, doc, created_at FROM owned_products \
         WHERE $1::text IS NULL OR doc->>'category' = $1 \
         ORDER BY id",
    )
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Deletes a product document by id.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] if no row matched, or
/// [`StoreError::Sqlx`] if the delete fails.
pub async fn delete_product(pool: &PgPool, id: i64) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM owned_products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Distinct non-empty category values across all documents.
///
/// # Errors
///
/// Returns [`StoreError::Sqlx`] if the query fails.
pub async fn distinct_categories(pool: &PgPool) -> Result<Vec<String>, StoreError> {
    let categories = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT doc->>'category' FROM owned_products \
         WHERE doc->>'category' IS NOT NULL AND doc->>'category' <> '' \
         ORDER BY 1",
    )
    .fetch_all(pool)
    .await?;
    Ok(categories)
}
