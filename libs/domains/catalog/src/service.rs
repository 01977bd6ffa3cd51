use std::sync::Arc;

use tracing::{instrument, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::filter::parse_criteria;
use crate::models::{
    CollectionScope, FilterCriteria, Product, ProductPage, RawProductQuery, ResolvedFilters,
    SelectorSet,
};
use crate::ranking::rank_by_price_similarity;
use crate::repository::CatalogRepository;

/// Catalog business logic, generic over the repository for testability.
#[derive(Debug, Clone)]
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// List products matching the raw query parameters.
    ///
    /// Collection selectors that resolve to no known collection short-circuit
    /// to an empty page without touching the products table.
    #[instrument(skip(self, raw))]
    pub async fn list_products(
        &self,
        raw: &RawProductQuery,
        default_limit: u64,
    ) -> CatalogResult<ProductPage> {
        let criteria = parse_criteria(raw, default_limit);
        let page = criteria.page;
        let limit = criteria.limit;

        let Some(filters) = self.resolve(criteria).await? else {
            return Ok(ProductPage::empty(page, limit));
        };

        match self.repository.search_products(&filters).await {
            Ok(page) => Ok(page),
            // A degraded schema without the rating column gets one retry
            // with the rating predicate stripped.
            Err(CatalogError::UnknownColumn { ref column })
                if column == "rating" && filters.min_rating.is_some() =>
            {
                warn!("rating column missing, retrying without rating filter");
                let mut fallback = filters.clone();
                fallback.min_rating = None;
                self.repository.search_products(&fallback).await
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch a single product or fail with [`CatalogError::NotFound`].
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> CatalogResult<Product> {
        self.repository
            .get_product(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Products from the same category as `id`, ranked by price similarity.
    #[instrument(skip(self))]
    pub async fn related_products(&self, id: i32, limit: usize) -> CatalogResult<Vec<Product>> {
        let base = self.get_product(id).await?;
        let Some(category_id) = base.category_id else {
            return Ok(Vec::new());
        };
        let candidates = self.repository.related_candidates(category_id, id).await?;
        Ok(rank_by_price_similarity(base.price, candidates, limit))
    }

    /// Resolve slug selectors to ids. Returns `None` when collection
    /// selectors were supplied but none resolved.
    async fn resolve(&self, criteria: FilterCriteria) -> CatalogResult<Option<ResolvedFilters>> {
        let brand_ids = self
            .resolve_selectors(&criteria.brands, |slugs| {
                self.repository.brand_ids_by_slugs(slugs)
            })
            .await?;
        let category_ids = self
            .resolve_selectors(&criteria.categories, |slugs| {
                self.repository.category_ids_by_slugs(slugs)
            })
            .await?;

        let collections = if criteria.collections.is_empty() {
            CollectionScope::Any
        } else {
            let ids = self
                .resolve_selectors(&criteria.collections, |slugs| {
                    self.repository.collection_ids_by_slugs(slugs)
                })
                .await?;
            if ids.is_empty() {
                return Ok(None);
            }
            CollectionScope::Within(ids)
        };

        Ok(Some(ResolvedFilters {
            q: criteria.q,
            min_price: criteria.min_price,
            max_price: criteria.max_price,
            min_rating: criteria.min_rating,
            page: criteria.page,
            limit: criteria.limit,
            brand_ids,
            category_ids,
            collections,
        }))
    }

    /// Union of numeric ids and resolved slug ids, deduplicated. The slug
    /// lookup is skipped entirely when no slugs were supplied.
    async fn resolve_selectors<'a, F, Fut>(
        &self,
        set: &'a SelectorSet,
        lookup: F,
    ) -> CatalogResult<Vec<i32>>
    where
        F: FnOnce(&'a [String]) -> Fut,
        Fut: Future<Output = CatalogResult<Vec<i32>>>,
    {
        let mut ids = set.ids.clone();
        if !set.slugs.is_empty() {
            ids.extend(lookup(&set.slugs).await?);
        }
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntitySummary, STOREFRONT_PAGE_SIZE};
    use crate::repository::MockCatalogRepository;
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    fn product(id: i32, price: &str, created_at: &str) -> Product {
        Product {
            id,
            name: format!("product-{id}"),
            description: String::new(),
            slug: format!("product-{id}"),
            price: price.parse().unwrap(),
            rating: Some(4.0),
            images: Vec::new(),
            brand_id: None,
            category_id: Some(1),
            created_at: created_at.parse::<DateTime<Utc>>().unwrap(),
            brand: None,
            category: Some(EntitySummary {
                id: 1,
                slug: "shoes".to_string(),
                name: "Shoes".to_string(),
            }),
            collections: Vec::new(),
        }
    }

    fn page_of(products: Vec<Product>) -> ProductPage {
        let total = products.len() as u64;
        ProductPage {
            products,
            total,
            page: 1,
            limit: STOREFRONT_PAGE_SIZE,
        }
    }

    #[tokio::test]
    async fn unresolvable_collection_short_circuits() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_collection_ids_by_slugs()
            .withf(|slugs: &[String]| slugs == ["doesnotexist123"])
            .times(1)
            .returning(|_| Ok(Vec::new()));
        repo.expect_search_products().times(0);

        let service = CatalogService::new(Arc::new(repo));
        let mut raw = RawProductQuery::default();
        raw.collections = Some("doesnotexist123".to_string());

        let page = service
            .list_products(&raw, STOREFRONT_PAGE_SIZE)
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.products.is_empty());
    }

    #[tokio::test]
    async fn numeric_collection_ids_are_not_verified() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search_products()
            .withf(|f: &ResolvedFilters| f.collections == CollectionScope::Within(vec![42]))
            .times(1)
            .returning(|_| Ok(page_of(Vec::new())));

        let service = CatalogService::new(Arc::new(repo));
        let mut raw = RawProductQuery::default();
        raw.collections = Some("42".to_string());

        service
            .list_products(&raw, STOREFRONT_PAGE_SIZE)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn brand_ids_and_slugs_union_and_dedup() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_brand_ids_by_slugs()
            .withf(|slugs: &[String]| slugs == ["acme"])
            .times(1)
            .returning(|_| Ok(vec![3]));
        repo.expect_search_products()
            .withf(|f: &ResolvedFilters| f.brand_ids == vec![3, 7])
            .times(1)
            .returning(|_| Ok(page_of(Vec::new())));

        let service = CatalogService::new(Arc::new(repo));
        let mut raw = RawProductQuery::default();
        raw.brands = Some("3,acme,7".to_string());

        service
            .list_products(&raw, STOREFRONT_PAGE_SIZE)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_rating_column_retries_without_rating_filter() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search_products()
            .withf(|f: &ResolvedFilters| f.min_rating == Some(4.0))
            .times(1)
            .returning(|_| {
                Err(CatalogError::UnknownColumn {
                    column: "rating".to_string(),
                })
            });
        repo.expect_search_products()
            .withf(|f: &ResolvedFilters| f.min_rating.is_none())
            .times(1)
            .returning(|_| Ok(page_of(vec![product(1, "10", "2024-01-01T00:00:00Z")])));

        let service = CatalogService::new(Arc::new(repo));
        let mut raw = RawProductQuery::default();
        raw.min_rating = Some("4".to_string());

        let page = service
            .list_products(&raw, STOREFRONT_PAGE_SIZE)
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn other_missing_columns_propagate() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search_products().times(1).returning(|_| {
            Err(CatalogError::UnknownColumn {
                column: "price".to_string(),
            })
        });

        let service = CatalogService::new(Arc::new(repo));
        let mut raw = RawProductQuery::default();
        raw.min_rating = Some("4".to_string());

        let err = service
            .list_products(&raw, STOREFRONT_PAGE_SIZE)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownColumn { column } if column == "price"));
    }

    #[tokio::test]
    async fn rating_error_without_rating_filter_propagates() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search_products().times(1).returning(|_| {
            Err(CatalogError::UnknownColumn {
                column: "rating".to_string(),
            })
        });

        let service = CatalogService::new(Arc::new(repo));
        let raw = RawProductQuery::default();

        let err = service
            .list_products(&raw, STOREFRONT_PAGE_SIZE)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownColumn { .. }));
    }

    #[tokio::test]
    async fn get_product_not_found() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_product()
            .withf(|id| *id == 99)
            .times(1)
            .returning(|_| Ok(None));

        let service = CatalogService::new(Arc::new(repo));
        let err = service.get_product(99).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(99)));
    }

    #[tokio::test]
    async fn related_products_ranked_by_price_distance() {
        let base = {
            let mut p = product(10, "100", "2024-01-01T00:00:00Z");
            p.price = Decimal::from(100);
            p
        };
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_product()
            .times(1)
            .returning(move |_| Ok(Some(base.clone())));
        repo.expect_related_candidates()
            .withf(|category_id, exclude_id| *category_id == 1 && *exclude_id == 10)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    product(1, "102", "2024-01-01T00:00:00Z"),
                    product(2, "95", "2024-01-02T00:00:00Z"),
                    product(3, "300", "2024-01-03T00:00:00Z"),
                    product(4, "99", "2024-01-04T00:00:00Z"),
                ])
            });

        let service = CatalogService::new(Arc::new(repo));
        let related = service.related_products(10, 12).await.unwrap();
        let ids: Vec<i32> = related.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![4, 1, 2, 3]);
    }

    #[tokio::test]
    async fn related_products_respects_limit() {
        let base = product(10, "100", "2024-01-01T00:00:00Z");
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_product()
            .times(1)
            .returning(move |_| Ok(Some(base.clone())));
        repo.expect_related_candidates().times(1).returning(|_, _| {
            Ok((1..=5)
                .map(|id| product(id, "100", "2024-01-01T00:00:00Z"))
                .collect())
        });

        let service = CatalogService::new(Arc::new(repo));
        let related = service.related_products(10, 2).await.unwrap();
        assert_eq!(related.len(), 2);
    }

    #[tokio::test]
    async fn related_products_missing_base_is_not_found() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_product().times(1).returning(|_| Ok(None));
        repo.expect_related_candidates().times(0);

        let service = CatalogService::new(Arc::new(repo));
        let err = service.related_products(5, 12).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(5)));
    }

    #[tokio::test]
    async fn related_products_without_category_is_empty() {
        let base = {
            let mut p = product(10, "100", "2024-01-01T00:00:00Z");
            p.category_id = None;
            p
        };
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_product()
            .times(1)
            .returning(move |_| Ok(Some(base.clone())));
        repo.expect_related_candidates().times(0);

        let service = CatalogService::new(Arc::new(repo));
        let related = service.related_products(10, 12).await.unwrap();
        assert!(related.is_empty());
    }
}
