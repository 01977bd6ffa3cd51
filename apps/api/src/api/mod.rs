use std::sync::Arc;

use axum::Router;
use domain_catalog::{CatalogService, PgCatalogRepository};

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Returns a stateless Router (all sub-routers have state already applied).
pub fn routes(state: &crate::state::AppState) -> Router {
    let repository = Arc::new(PgCatalogRepository::new(state.db.clone()));
    let service = CatalogService::new(repository);

    Router::new()
        .nest("/products", domain_catalog::storefront_router(service.clone()))
        .nest("/admin/products", domain_catalog::admin_router(service))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
///
/// This router has state applied and can be merged with the stateless app
/// router from `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
