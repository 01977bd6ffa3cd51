//! Axum routers for the catalog endpoints.

pub mod products;

use std::sync::Arc;

use axum::{Router, routing::get};
use utoipa::OpenApi;

use crate::repository::CatalogRepository;
use crate::service::CatalogService;

/// Storefront surface: listing, detail and related products.
pub fn storefront_router<R: CatalogRepository + 'static>(
    service: CatalogService<R>,
) -> Router {
    Router::new()
        .route("/", get(products::list_products::<R>))
        .route("/{id}", get(products::get_product::<R>))
        .route("/{id}/related", get(products::related_products::<R>))
        .with_state(Arc::new(service))
}

/// Admin surface: same listing semantics with a larger default page size.
pub fn admin_router<R: CatalogRepository + 'static>(service: CatalogService<R>) -> Router {
    Router::new()
        .route("/", get(products::admin_list_products::<R>))
        .with_state(Arc::new(service))
}

/// OpenAPI document for the catalog endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        products::list_products,
        products::get_product,
        products::related_products,
        products::admin_list_products,
    ),
    components(schemas(
        crate::models::Product,
        crate::models::EntitySummary,
        crate::models::ProductListResponse,
        crate::models::ProductResponse,
        crate::models::RelatedProductsResponse,
        axum_helpers::ErrorResponse,
    )),
    tags(
        (name = "catalog", description = "Product catalog endpoints")
    )
)]
pub struct CatalogApiDoc;
