//! Lenient query-string parsing for product listings.
//!
//! Storefront URLs are shared, bookmarked and mangled by crawlers, so
//! malformed parameters are dropped instead of rejected. This module never
//! returns an error.

use rust_decimal::Decimal;

use crate::models::{FilterCriteria, MAX_PRICE, RawProductQuery, SelectorSet};

/// Parse raw query parameters into [`FilterCriteria`].
///
/// `default_limit` distinguishes the storefront and admin surfaces.
pub fn parse_criteria(raw: &RawProductQuery, default_limit: u64) -> FilterCriteria {
    let price_ceiling = Decimal::from(MAX_PRICE);

    let q = raw
        .q
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    let min_price = parse_decimal(raw.min_price.as_deref());
    let max_price = parse_decimal(raw.max_price.as_deref()).map(|p| p.min(price_ceiling));

    // min_rating wins over its alias; zero or negative means no filter
    let min_rating = parse_f32(raw.min_rating.as_deref())
        .or_else(|| parse_f32(raw.rating.as_deref()))
        .filter(|r| *r > 0.0);

    FilterCriteria {
        q,
        min_price,
        max_price,
        min_rating,
        page: parse_positive(raw.page.as_deref(), 1),
        limit: parse_positive(raw.limit.as_deref(), default_limit),
        brands: parse_selectors(raw.brands.as_deref(), raw.brand.as_deref()),
        categories: parse_selectors(raw.categories.as_deref(), raw.category.as_deref()),
        collections: parse_selectors(raw.collections.as_deref(), raw.collection.as_deref()),
    }
}

fn parse_decimal(value: Option<&str>) -> Option<Decimal> {
    value.and_then(|s| s.trim().parse::<Decimal>().ok())
}

fn parse_f32(value: Option<&str>) -> Option<f32> {
    value
        .and_then(|s| s.trim().parse::<f32>().ok())
        .filter(|v| v.is_finite())
}

fn parse_positive(value: Option<&str>, default: u64) -> u64 {
    match value.and_then(|s| s.trim().parse::<u64>().ok()) {
        Some(n) if n >= 1 => n,
        _ => default,
    }
}

/// Merge both spellings of a selector parameter and split the CSV into
/// numeric ids and slugs. Empty tokens are dropped.
fn parse_selectors(plural: Option<&str>, singular: Option<&str>) -> SelectorSet {
    let mut set = SelectorSet::default();
    for source in [plural, singular].into_iter().flatten() {
        for token in source.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match token.parse::<i32>() {
                Ok(id) => set.ids.push(id),
                Err(_) => set.slugs.push(token.to_owned()),
            }
        }
    }
    set
}
