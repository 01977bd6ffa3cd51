use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entity;

/// Default page size for storefront listings.
pub const STOREFRONT_PAGE_SIZE: u64 = 20;

/// Default page size for admin listings.
pub const ADMIN_PAGE_SIZE: u64 = 50;

/// Upper bound applied to the max_price filter.
pub const MAX_PRICE: i64 = 200_000;

/// Default number of related products returned.
pub const RELATED_DEFAULT_LIMIT: usize = 12;

/// How many same-category candidates are fetched before ranking.
pub const RELATED_CANDIDATE_POOL: u64 = 100;

/// Raw query-string parameters for product listings.
///
/// Every field is an optional string so extraction never fails; parsing
/// and validation happen in [`crate::filter::parse_criteria`], which
/// silently drops anything malformed.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct RawProductQuery {
    /// Free-text search over product name and description
    pub q: Option<String>,
    /// Minimum price, inclusive
    pub min_price: Option<String>,
    /// Maximum price, inclusive
    pub max_price: Option<String>,
    /// Minimum rating, excludes unrated products
    pub min_rating: Option<String>,
    /// Alias for min_rating
    pub rating: Option<String>,
    /// Comma-separated brand ids or slugs
    pub brands: Option<String>,
    /// Alias for brands
    pub brand: Option<String>,
    /// Comma-separated category ids or slugs
    pub categories: Option<String>,
    /// Alias for categories
    pub category: Option<String>,
    /// Comma-separated collection ids or slugs
    pub collections: Option<String>,
    /// Alias for collections
    pub collection: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
    /// Page size
    pub limit: Option<String>,
}

/// Query-string parameters for the related-products endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct RelatedQuery {
    /// Maximum number of related products to return
    pub limit: Option<String>,
}

/// Entity selectors split into numeric ids and slugs awaiting resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorSet {
    pub ids: Vec<i32>,
    pub slugs: Vec<String>,
}

impl SelectorSet {
    /// True when the caller supplied no selectors at all.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.slugs.is_empty()
    }
}

/// Parsed filters with slugs not yet resolved against the database.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub q: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<f32>,
    pub page: u64,
    pub limit: u64,
    pub brands: SelectorSet,
    pub categories: SelectorSet,
    pub collections: SelectorSet,
}

/// Collection membership scope for a product query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionScope {
    /// No collection filter; products without memberships are included.
    Any,
    /// Restrict to products belonging to at least one of these collections.
    Within(Vec<i32>),
}

/// Fully resolved filters, ready to be turned into a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFilters {
    pub q: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<f32>,
    pub page: u64,
    pub limit: u64,
    pub brand_ids: Vec<i32>,
    pub category_ids: Vec<i32>,
    pub collections: CollectionScope,
}

/// Compact view of a brand, category or collection attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntitySummary {
    pub id: i32,
    pub slug: String,
    pub name: String,
}

impl From<entity::brand::Model> for EntitySummary {
    fn from(model: entity::brand::Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            name: model.name,
        }
    }
}

impl From<entity::category::Model> for EntitySummary {
    fn from(model: entity::category::Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            name: model.name,
        }
    }
}

impl From<entity::collection::Model> for EntitySummary {
    fn from(model: entity::collection::Model) -> Self {
        Self {
            id: model.id,
            slug: model.slug,
            name: model.name,
        }
    }
}

/// Product as exposed over the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub slug: String,
    #[schema(value_type = String, example = "199.99")]
    pub price: Decimal,
    pub rating: Option<f32>,
    pub images: Vec<String>,
    pub brand_id: Option<i32>,
    pub category_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub brand: Option<EntitySummary>,
    pub category: Option<EntitySummary>,
    pub collections: Vec<EntitySummary>,
}

impl From<entity::product::Model> for Product {
    fn from(model: entity::product::Model) -> Self {
        let images = serde_json::from_value(model.images).unwrap_or_default();
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            slug: model.slug,
            price: model.price,
            rating: model.rating,
            images,
            brand_id: model.brand_id,
            category_id: model.category_id,
            created_at: to_utc(model.created_at),
            brand: None,
            category: None,
            collections: Vec::new(),
        }
    }
}

fn to_utc(value: DateTimeWithTimeZone) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}

/// One page of products with the exact total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl ProductPage {
    /// Empty page, used when collection selectors resolve to nothing.
    pub fn empty(page: u64, limit: u64) -> Self {
        Self {
            products: Vec::new(),
            total: 0,
            page,
            limit,
        }
    }
}

/// Body of `GET /products` and `GET /admin/products`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total: u64,
}

impl From<ProductPage> for ProductListResponse {
    fn from(page: ProductPage) -> Self {
        Self {
            products: page.products,
            total: page.total,
        }
    }
}

/// Envelope for single-product responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub success: bool,
    pub data: Product,
}

/// Envelope for related-product responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RelatedProductsResponse {
    pub success: bool,
    pub data: Vec<Product>,
}
