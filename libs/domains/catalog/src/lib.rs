//! Product catalog domain: filtering, search, and related-product ranking.
//!
//! The crate is layered the same way as the rest of the workspace:
//! entities at the bottom, a repository trait as the data seam, a service
//! with the business rules, and axum handlers on top.

pub mod entity;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod ranking;
pub mod repository;
pub mod service;

pub use error::{CatalogError, CatalogResult};
pub use handlers::{CatalogApiDoc, admin_router, storefront_router};
pub use models::{
    ADMIN_PAGE_SIZE, EntitySummary, Product, ProductListResponse, ProductPage, ProductResponse,
    RELATED_DEFAULT_LIMIT, RawProductQuery, RelatedProductsResponse, STOREFRONT_PAGE_SIZE,
};
pub use postgres::PgCatalogRepository;
pub use repository::CatalogRepository;
pub use service::CatalogService;
