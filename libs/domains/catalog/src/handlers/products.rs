use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::error::CatalogResult;
use crate::models::{
    ADMIN_PAGE_SIZE, ProductListResponse, ProductResponse, RELATED_DEFAULT_LIMIT, RawProductQuery,
    RelatedProductsResponse, RelatedQuery, STOREFRONT_PAGE_SIZE,
};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

/// List products for the storefront
#[utoipa::path(
    get,
    path = "/products",
    params(RawProductQuery),
    responses(
        (status = 200, description = "Matching products and exact total", body = ProductListResponse),
        (status = 500, description = "Data source failure", body = axum_helpers::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_products<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(raw): Query<RawProductQuery>,
) -> CatalogResult<Json<ProductListResponse>> {
    let page = service.list_products(&raw, STOREFRONT_PAGE_SIZE).await?;
    Ok(Json(page.into()))
}

/// List products for the admin console
#[utoipa::path(
    get,
    path = "/admin/products",
    params(RawProductQuery),
    responses(
        (status = 200, description = "Matching products and exact total", body = ProductListResponse),
        (status = 500, description = "Data source failure", body = axum_helpers::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn admin_list_products<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Query(raw): Query<RawProductQuery>,
) -> CatalogResult<Json<ProductListResponse>> {
    let page = service.list_products(&raw, ADMIN_PAGE_SIZE).await?;
    Ok(Json(page.into()))
}

/// Get a single product by id
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "Product not found", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Data source failure", body = axum_helpers::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn get_product<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(id): Path<i32>,
) -> CatalogResult<Json<ProductResponse>> {
    let data = service.get_product(id).await?;
    Ok(Json(ProductResponse {
        success: true,
        data,
    }))
}

/// Related products ranked by price similarity
#[utoipa::path(
    get,
    path = "/products/{id}/related",
    params(("id" = i32, Path, description = "Base product id"), RelatedQuery),
    responses(
        (status = 200, description = "Related products", body = RelatedProductsResponse),
        (status = 404, description = "Base product not found", body = axum_helpers::ErrorResponse),
        (status = 500, description = "Data source failure", body = axum_helpers::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn related_products<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    Path(id): Path<i32>,
    Query(query): Query<RelatedQuery>,
) -> CatalogResult<Json<RelatedProductsResponse>> {
    let limit = query
        .limit
        .as_deref()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .filter(|n| *n >= 1)
        .unwrap_or(RELATED_DEFAULT_LIMIT);
    let data = service.related_products(id, limit).await?;
    Ok(Json(RelatedProductsResponse {
        success: true,
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::handlers::{admin_router, storefront_router};
    use crate::models::{Product, ProductPage};
    use crate::repository::MockCatalogRepository;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{DateTime, Utc};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn product(id: i32, price: &str) -> Product {
        Product {
            id,
            name: format!("product-{id}"),
            description: "A product".to_string(),
            slug: format!("product-{id}"),
            price: price.parse().unwrap(),
            rating: Some(4.0),
            images: vec!["front.jpg".to_string()],
            brand_id: None,
            category_id: Some(1),
            created_at: "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap(),
            brand: None,
            category: None,
            collections: Vec::new(),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn list_returns_products_and_total() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search_products().returning(|_| {
            Ok(ProductPage {
                products: vec![product(1, "10.00")],
                total: 1,
                page: 1,
                limit: STOREFRONT_PAGE_SIZE,
            })
        });

        let app = storefront_router(CatalogService::new(Arc::new(repo)));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["products"][0]["id"], 1);
    }

    #[tokio::test]
    async fn list_with_unknown_collection_is_empty_ok() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_collection_ids_by_slugs()
            .returning(|_| Ok(Vec::new()));
        repo.expect_search_products().times(0);

        let app = storefront_router(CatalogService::new(Arc::new(repo)));
        let response = app
            .oneshot(
                Request::get("/?collections=doesnotexist123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["total"], 0);
        assert_eq!(body["products"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn list_surfaces_database_failures_as_500() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search_products()
            .returning(|_| Err(CatalogError::Database("connection refused".to_string())));

        let app = storefront_router(CatalogService::new(Arc::new(repo)));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn get_product_wraps_data_envelope() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_product()
            .returning(|_| Ok(Some(product(5, "25.00"))));

        let app = storefront_router(CatalogService::new(Arc::new(repo)));
        let response = app
            .oneshot(Request::get("/5").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 5);
    }

    #[tokio::test]
    async fn get_missing_product_is_404() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_product().returning(|_| Ok(None));

        let app = storefront_router(CatalogService::new(Arc::new(repo)));
        let response = app
            .oneshot(Request::get("/99").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn related_wraps_success_envelope() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_product()
            .returning(|_| Ok(Some(product(5, "100.00"))));
        repo.expect_related_candidates()
            .returning(|_, _| Ok(vec![product(6, "99.00"), product(7, "300.00")]));

        let app = storefront_router(CatalogService::new(Arc::new(repo)));
        let response = app
            .oneshot(Request::get("/5/related").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"][0]["id"], 6);
        assert_eq!(body["data"][1]["id"], 7);
    }

    #[tokio::test]
    async fn related_for_missing_product_is_404() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_product().returning(|_| Ok(None));

        let app = storefront_router(CatalogService::new(Arc::new(repo)));
        let response = app
            .oneshot(Request::get("/99/related").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn related_limit_parameter_truncates() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_get_product()
            .returning(|_| Ok(Some(product(5, "100.00"))));
        repo.expect_related_candidates()
            .returning(|_, _| Ok((10..15).map(|id| product(id, "100.00")).collect()));

        let app = storefront_router(CatalogService::new(Arc::new(repo)));
        let response = app
            .oneshot(
                Request::get("/5/related?limit=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn admin_list_uses_larger_default_page_size() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search_products()
            .withf(|f| f.limit == ADMIN_PAGE_SIZE)
            .times(1)
            .returning(|_| {
                Ok(ProductPage {
                    products: Vec::new(),
                    total: 0,
                    page: 1,
                    limit: ADMIN_PAGE_SIZE,
                })
            });

        let app = admin_router(CatalogService::new(Arc::new(repo)));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
