use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::{Product, ProductPage, ResolvedFilters};

/// Data access seam for the catalog. Mocked in service and handler tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Resolve brand slugs to ids in one batched lookup. Unknown slugs
    /// are silently absent from the result.
    async fn brand_ids_by_slugs(&self, slugs: &[String]) -> CatalogResult<Vec<i32>>;

    /// Resolve category slugs to ids in one batched lookup.
    async fn category_ids_by_slugs(&self, slugs: &[String]) -> CatalogResult<Vec<i32>>;

    /// Resolve collection slugs to ids in one batched lookup.
    async fn collection_ids_by_slugs(&self, slugs: &[String]) -> CatalogResult<Vec<i32>>;

    /// Run the filtered, paginated product query and the exact count.
    async fn search_products(&self, filters: &ResolvedFilters) -> CatalogResult<ProductPage>;

    /// Fetch a single product with its brand, category and collections.
    async fn get_product(&self, id: i32) -> CatalogResult<Option<Product>>;

    /// Fetch up to [`crate::models::RELATED_CANDIDATE_POOL`] products in
    /// the given category, excluding the base product.
    async fn related_candidates(&self, category_id: i32, exclude_id: i32)
    -> CatalogResult<Vec<Product>>;
}
