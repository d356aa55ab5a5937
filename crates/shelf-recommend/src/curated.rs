//! The terminal fallback: a fixed, generic recommendation set that cannot
//! fail. Ids sit far above both catalog bands so they never collide with
//! real products.

use rust_decimal::Decimal;

use shelf_core::{Origin, Product};

/// Returns the static curated list, length 6.
#[must_use]
pub fn curated_products() -> Vec<Product> {
    let item = |id: i64, name: &str, price: i64, image: &str, description: &str, category: &str| {
        Product {
            unified_id: id,
            origin: Origin::Owned,
            name: name.to_string(),
            price: Decimal::from(price),
            image_url: image.to_string(),
            description: description.to_string(),
            category: category.to_string(),
        }
    };

    vec![
        item(
            9001,
            "Premium Wireless Headphones",
            2999,
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=300&h=300&fit=crop",
            "High-quality wireless headphones with noise cancellation",
            "Electronics",
        ),
        item(
            9002,
            "Smart Fitness Watch",
            1999,
            "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=300&h=300&fit=crop",
            "Track your health and fitness goals with this smart watch",
            "Electronics",
        ),
        item(
            9003,
            "Portable Bluetooth Speaker",
            1499,
            "https://images.unsplash.com/photo-1608043152269-423dbba4e7e1?w=300&h=300&fit=crop",
            "Compact speaker with premium sound quality",
            "Electronics",
        ),
        item(
            9004,
            "Wireless Phone Charger",
            899,
            "https://images.unsplash.com/photo-1609592424916-9a4853aeb811?w=300&h=300&fit=crop",
            "Fast wireless charging pad for all compatible devices",
            "Electronics",
        ),
        item(
            9005,
            "USB-C Cable Set",
            599,
            "https://images.unsplash.com/photo-1574944985070-8f3ebc6b79d2?w=300&h=300&fit=crop",
            "Durable USB-C cables for all your devices",
            "Accessories",
        ),
        item(
            9006,
            "Phone Case Premium",
            799,
            "https://images.unsplash.com/photo-1556656793-08538906a9f8?w=300&h=300&fit=crop",
            "Protective case with elegant design",
            "Accessories",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn curated_list_has_six_unique_well_formed_items() {
        let products = curated_products();
        assert_eq!(products.len(), 6);
        let ids: HashSet<i64> = products.iter().map(|p| p.unified_id).collect();
        assert_eq!(ids.len(), 6);
        for product in &products {
            assert!(!product.name.is_empty());
            assert!(product.price > Decimal::ZERO);
            assert!(!product.category.is_empty());
        }
    }

    #[test]
    fn curated_ids_sit_above_both_catalog_bands() {
        assert!(curated_products().iter().all(|p| p.unified_id >= 9000));
    }
}
