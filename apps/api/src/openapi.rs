use utoipa::OpenApi;

/// Combined OpenAPI document for the storefront API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        description = "Product catalog search and related-product ranking"
    ),
    nest(
        (path = "/api", api = domain_catalog::CatalogApiDoc)
    )
)]
pub struct ApiDoc;
