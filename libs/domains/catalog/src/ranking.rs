//! Price-similarity ranking for related products.

use rust_decimal::Decimal;

use crate::models::Product;

/// Order candidates by how close their price is to `base_price`.
///
/// Ties on distance go to the more recently created product, then to the
/// higher id, so the ordering is fully deterministic. The result is
/// truncated to `limit`.
pub fn rank_by_price_similarity(
    base_price: Decimal,
    mut candidates: Vec<Product>,
    limit: usize,
) -> Vec<Product> {
    candidates.sort_by(|a, b| {
        let da = (a.price - base_price).abs();
        let db = (b.price - base_price).abs();
        da.cmp(&db)
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| b.id.cmp(&a.id))
    });
    candidates.truncate(limit);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn product(id: i32, price: &str, created_at: &str) -> Product {
        Product {
            id,
            name: format!("product-{id}"),
            description: String::new(),
            slug: format!("product-{id}"),
            price: price.parse().unwrap(),
            rating: None,
            images: Vec::new(),
            brand_id: None,
            category_id: Some(1),
            created_at: created_at.parse::<DateTime<Utc>>().unwrap(),
            brand: None,
            category: None,
            collections: Vec::new(),
        }
    }

    #[test]
    fn orders_by_absolute_price_distance() {
        let candidates = vec![
            product(1, "102", "2024-01-01T00:00:00Z"),
            product(2, "95", "2024-01-02T00:00:00Z"),
            product(3, "300", "2024-01-03T00:00:00Z"),
            product(4, "99", "2024-01-04T00:00:00Z"),
        ];
        let ranked = rank_by_price_similarity("100".parse().unwrap(), candidates, 12);
        let prices: Vec<String> = ranked.iter().map(|p| p.price.to_string()).collect();
        assert_eq!(prices, vec!["99", "102", "95", "300"]);
    }

    #[test]
    fn equal_distance_prefers_newer_product() {
        let candidates = vec![
            product(1, "90", "2024-01-01T00:00:00Z"),
            product(2, "110", "2024-03-01T00:00:00Z"),
        ];
        let ranked = rank_by_price_similarity("100".parse().unwrap(), candidates, 12);
        assert_eq!(ranked[0].id, 2);
        assert_eq!(ranked[1].id, 1);
    }

    #[test]
    fn equal_distance_and_timestamp_prefers_higher_id() {
        let candidates = vec![
            product(5, "100", "2024-01-01T00:00:00Z"),
            product(9, "100", "2024-01-01T00:00:00Z"),
        ];
        let ranked = rank_by_price_similarity("100".parse().unwrap(), candidates, 12);
        assert_eq!(ranked[0].id, 9);
    }

    #[test]
    fn truncates_to_limit() {
        let candidates = (1..=5)
            .map(|id| product(id, "100", "2024-01-01T00:00:00Z"))
            .collect();
        let ranked = rank_by_price_similarity("100".parse().unwrap(), candidates, 3);
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn empty_candidates_stay_empty() {
        let ranked = rank_by_price_similarity("100".parse().unwrap(), Vec::new(), 12);
        assert!(ranked.is_empty());
    }
}
