//! Purchase-aware recommendation scoring.
//!
//! One scoring pass over a merged candidate pool: previously acquired items
//! are excluded, the remainder ranked by category affinity and price
//! similarity with a deterministic id-based tiebreak. Pure and deterministic
//! — repeated calls with the same inputs yield the same ordered result.

use std::collections::HashSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::types::{Product, PurchaseHistoryEntry};

/// Default recommendation set size.
pub const DEFAULT_LIMIT: usize = 6;

/// Weight awarded when a candidate's category was previously purchased.
const CATEGORY_WEIGHT: f64 = 50.0;

/// Maximum weight for price similarity; decays linearly to zero at 100%
/// relative deviation from the history's average price.
const PRICE_WEIGHT: f64 = 30.0;

/// Transient scored candidate; lives only inside one scoring pass.
struct ScoredCandidate<'a> {
    product: &'a Product,
    score: f64,
}

/// Ranks `pool` against `history` and returns the top `limit` products.
///
/// With an empty history this is the cold-start policy: the first `limit`
/// items of the pool in pool order, unmodified. Otherwise candidates whose
/// unified id appears in the history are excluded, malformed candidates
/// (blank name, negative price) are silently skipped, and the rest are
/// scored:
///
/// - `+50` if the candidate's category appears in the history;
/// - up to `+30` for price proximity to the mean of the history's positive
///   prices (entries without a positive price are excluded from the mean);
/// - `+(unified_id mod 100) / 100` as a stable order-breaking term.
#[must_use]
pub fn score(history: &[PurchaseHistoryEntry], pool: &[Product], limit: usize) -> Vec<Product> {
    if history.is_empty() {
        return pool.iter().take(limit).cloned().collect();
    }

    let exclude_ids: HashSet<i64> = history.iter().map(|h| h.product_id).collect();
    let purchased_categories: HashSet<&str> =
        history.iter().map(|h| h.category.as_str()).collect();

    let positive_prices: Vec<f64> = history
        .iter()
        .filter(|h| h.price > Decimal::ZERO)
        .filter_map(|h| h.price.to_f64())
        .collect();
    let avg_price = if positive_prices.is_empty() {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let count = positive_prices.len() as f64;
        positive_prices.iter().sum::<f64>() / count
    };

    let mut scored: Vec<ScoredCandidate<'_>> = pool
        .iter()
        .filter(|p| !exclude_ids.contains(&p.unified_id))
        .filter(|p| !p.name.trim().is_empty() && p.price >= Decimal::ZERO)
        .map(|product| {
            let mut total = 0.0;

            if purchased_categories.contains(product.category.as_str()) {
                total += CATEGORY_WEIGHT;
            }

            if avg_price > 0.0 {
                let price = product.price.to_f64().unwrap_or(0.0);
                let deviation = (price - avg_price).abs() / avg_price;
                total += (PRICE_WEIGHT - PRICE_WEIGHT * deviation).max(0.0);
            }

            // Injective modulo 100 for any 100 consecutive ids; enough for
            // stable ordering across repeated calls.
            #[allow(clippy::cast_precision_loss)]
            let tiebreak = (product.unified_id.rem_euclid(100)) as f64 / 100.0;
            total += tiebreak;

            ScoredCandidate {
                product,
                score: total,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
        .into_iter()
        .take(limit)
        .map(|c| c.product.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Origin;

    fn product(id: i64, category: &str, price: i64) -> Product {
        Product {
            unified_id: id,
            origin: if id >= 1000 {
                Origin::External
            } else {
                Origin::Owned
            },
            name: format!("Product {id}"),
            price: Decimal::from(price),
            image_url: String::new(),
            description: String::new(),
            category: category.to_string(),
        }
    }

    fn entry(id: i64, category: &str, price: i64) -> PurchaseHistoryEntry {
        PurchaseHistoryEntry {
            product_id: id,
            category: category.to_string(),
            price: Decimal::from(price),
            name: format!("Bought {id}"),
        }
    }

    #[test]
    fn cold_start_returns_pool_prefix_in_order() {
        let pool: Vec<Product> = (1..=10).map(|i| product(i, "Books", 100)).collect();
        let result = score(&[], &pool, DEFAULT_LIMIT);
        assert_eq!(result.len(), 6);
        let ids: Vec<i64> = result.iter().map(|p| p.unified_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn purchased_ids_never_appear_in_result() {
        let history = vec![entry(2, "Books", 100), entry(4, "Books", 100)];
        let pool: Vec<Product> = (1..=6).map(|i| product(i, "Books", 100)).collect();
        let result = score(&history, &pool, 10);
        assert!(result.iter().all(|p| p.unified_id != 2 && p.unified_id != 4));
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn scoring_is_idempotent() {
        let history = vec![entry(1, "Electronics", 500)];
        let pool: Vec<Product> = vec![
            product(10, "Electronics", 450),
            product(11, "Books", 200),
            product(12, "Electronics", 900),
            product(13, "Home", 520),
        ];
        let first = score(&history, &pool, 3);
        let second = score(&history, &pool, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn category_match_outranks_price_proximity_alone() {
        let history = vec![entry(1, "Electronics", 500)];
        let pool = vec![
            // Exact price match, wrong category.
            product(10, "Books", 500),
            // Worse price, matching category.
            product(11, "Electronics", 800),
        ];
        let result = score(&history, &pool, 2);
        assert_eq!(result[0].unified_id, 11);
    }

    #[test]
    fn worked_scenario_excludes_bought_and_returns_remaining() {
        let history = vec![entry(5, "Electronics", 2000)];
        let pool = vec![product(5, "Electronics", 1900), product(7, "Books", 500)];
        let result = score(&history, &pool, DEFAULT_LIMIT);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].unified_id, 7);
    }

    #[test]
    fn price_decay_reaches_zero_beyond_full_deviation() {
        // avg = 100; candidate at 250 deviates 150%, so the price term is 0
        // and only the tiebreak separates it from a same-category candidate
        // at 100 (full price weight).
        let history = vec![entry(1, "Books", 100)];
        let pool = vec![product(50, "Books", 250), product(51, "Books", 100)];
        let result = score(&history, &pool, 2);
        assert_eq!(result[0].unified_id, 51);
    }

    #[test]
    fn non_positive_history_prices_are_excluded_from_average() {
        // Only the 300 entry counts toward the average, so the candidate at
        // 300 gets the full price term and wins over the one at 150 (which
        // would win if zero-price entries dragged the average to 150).
        let history = vec![entry(1, "Books", 0), entry(2, "Books", 300)];
        let pool = vec![product(50, "Books", 150), product(51, "Books", 300)];
        let result = score(&history, &pool, 2);
        assert_eq!(result[0].unified_id, 51);
    }

    #[test]
    fn result_is_truncated_to_limit() {
        let history = vec![entry(999, "Misc", 10)];
        let pool: Vec<Product> = (1..=20).map(|i| product(i, "Books", 100)).collect();
        assert_eq!(score(&history, &pool, 6).len(), 6);
    }
}
