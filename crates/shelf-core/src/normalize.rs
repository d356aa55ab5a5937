//! Identity normalization: maps each catalog's native records into the
//! unified id space and one strict [`Product`] shape.
//!
//! Both catalogs return loosely-typed payloads, modeled here as serde structs
//! with optional fields. Validation happens at this boundary and nowhere
//! else: a record without a numeric price or a non-empty name yields `None`
//! and is dropped by the caller (with a logged warning), never propagated as
//! a malformed `Product`. All functions are pure.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::{Origin, Product};

/// Fixed offset added to external-catalog native ids.
///
/// Owned ids pass through unchanged, so the two id spaces never collide for
/// native ids below the offset.
pub const EXTERNAL_ID_OFFSET: i64 = 1000;

/// Category assigned to records that carry none.
pub const DEFAULT_CATEGORY: &str = "Others";

/// A raw document from the owned catalog's document store.
///
/// The store is schemaless; every field may be absent. The document id lives
/// outside the document itself (it is the store's row id).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OwnedDoc {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// A raw item from the external read-only catalog.
///
/// The external source names its title field `title` and its image field
/// `thumbnail`; the native `id` is required (an item without one cannot be
/// placed in the unified id space and fails deserialization outright).
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalRecord {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// A raw item returned by the remote recommender service.
///
/// Recommender output is already in the unified id space.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendedRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Validates a required name field: present, non-empty after trimming.
fn valid_name(name: Option<&str>) -> Option<String> {
    let name = name?.trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Validates a required price field: present and non-negative.
fn valid_price(price: Option<Decimal>) -> Option<Decimal> {
    price.filter(|p| *p >= Decimal::ZERO)
}

fn category_or_default(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

/// Converts an owned-store document into a [`Product`]. The store id passes
/// through unchanged as the unified id.
///
/// Returns `None` for documents missing a name or a numeric price.
#[must_use]
pub fn normalize_owned(id: i64, doc: &OwnedDoc) -> Option<Product> {
    Some(Product {
        unified_id: id,
        origin: Origin::Owned,
        name: valid_name(doc.name.as_deref())?,
        price: valid_price(doc.price)?,
        image_url: doc.image.clone().unwrap_or_default(),
        description: doc.description.clone().unwrap_or_default(),
        category: category_or_default(doc.category.as_deref()),
    })
}

/// Converts an external-catalog item into a [`Product`], offsetting its
/// native id into the external band of the unified id space.
///
/// Returns `None` for items missing a title or a numeric price.
#[must_use]
pub fn normalize_external(record: &ExternalRecord) -> Option<Product> {
    Some(Product {
        unified_id: record.id + EXTERNAL_ID_OFFSET,
        origin: Origin::External,
        name: valid_name(record.title.as_deref())?,
        price: valid_price(record.price)?,
        image_url: record.thumbnail.clone().unwrap_or_default(),
        description: record.description.clone().unwrap_or_default(),
        category: category_or_default(record.category.as_deref()),
    })
}

/// Converts a remote-recommender item into a [`Product`].
///
/// Ids are already unified, so the origin is inferred from the id band.
/// Returns `None` for items missing a name or a numeric price.
#[must_use]
pub fn normalize_recommended(record: &RecommendedRecord) -> Option<Product> {
    let origin = if record.id >= EXTERNAL_ID_OFFSET {
        Origin::External
    } else {
        Origin::Owned
    };
    Some(Product {
        unified_id: record.id,
        origin,
        name: valid_name(record.name.as_deref())?,
        price: valid_price(record.price)?,
        image_url: record.image.clone().unwrap_or_default(),
        description: record.description.clone().unwrap_or_default(),
        category: category_or_default(record.category.as_deref()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned_doc(name: &str, price: i64) -> OwnedDoc {
        OwnedDoc {
            name: Some(name.to_string()),
            price: Some(Decimal::from(price)),
            image: Some("https://example.com/p.jpg".to_string()),
            description: Some("desc".to_string()),
            category: Some("Electronics".to_string()),
        }
    }

    fn external_record(id: i64, title: &str, price: i64) -> ExternalRecord {
        ExternalRecord {
            id,
            title: Some(title.to_string()),
            price: Some(Decimal::from(price)),
            thumbnail: None,
            description: None,
            category: None,
        }
    }

    #[test]
    fn owned_id_passes_through() {
        let product = normalize_owned(7, &owned_doc("Mug", 12)).expect("valid doc");
        assert_eq!(product.unified_id, 7);
        assert_eq!(product.origin, Origin::Owned);
    }

    #[test]
    fn external_id_is_offset() {
        let product = normalize_external(&external_record(42, "Pen", 3)).expect("valid record");
        assert_eq!(product.unified_id, 1042);
        assert_eq!(product.origin, Origin::External);
    }

    #[test]
    fn id_bands_never_intersect_for_native_ids_below_offset() {
        for native in [0i64, 1, 500, 999] {
            let owned = normalize_owned(native, &owned_doc("A", 1)).unwrap();
            let external = normalize_external(&external_record(native, "B", 1)).unwrap();
            assert!(owned.unified_id < EXTERNAL_ID_OFFSET);
            assert!(external.unified_id >= EXTERNAL_ID_OFFSET);
        }
    }

    #[test]
    fn missing_price_is_rejected() {
        let mut doc = owned_doc("Mug", 12);
        doc.price = None;
        assert!(normalize_owned(1, &doc).is_none());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut doc = owned_doc("Mug", 12);
        doc.price = Some(Decimal::from(-1));
        assert!(normalize_owned(1, &doc).is_none());
    }

    #[test]
    fn missing_or_blank_name_is_rejected() {
        let mut doc = owned_doc("Mug", 12);
        doc.name = None;
        assert!(normalize_owned(1, &doc).is_none());
        doc.name = Some("   ".to_string());
        assert!(normalize_owned(1, &doc).is_none());
    }

    #[test]
    fn missing_category_defaults_to_others() {
        let mut record = external_record(5, "Pen", 3);
        record.category = None;
        let product = normalize_external(&record).unwrap();
        assert_eq!(product.category, DEFAULT_CATEGORY);

        record.category = Some(String::new());
        let product = normalize_external(&record).unwrap();
        assert_eq!(product.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn non_numeric_price_fails_deserialization() {
        let result = serde_json::from_value::<OwnedDoc>(serde_json::json!({
            "name": "Mug",
            "price": "not-a-number"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn recommended_origin_follows_id_band() {
        let record = |id: i64| RecommendedRecord {
            id,
            name: Some("X".to_string()),
            price: Some(Decimal::ONE),
            image: None,
            description: None,
            category: None,
        };
        assert_eq!(
            normalize_recommended(&record(12)).unwrap().origin,
            Origin::Owned
        );
        assert_eq!(
            normalize_recommended(&record(1012)).unwrap().origin,
            Origin::External
        );
    }
}
