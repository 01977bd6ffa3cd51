pub use sea_orm_migration::prelude::*;

mod m20250110_000000_create_brands;
mod m20250110_000001_create_categories;
mod m20250110_000002_create_collections;
mod m20250110_000003_create_products;
mod m20250110_000004_create_product_collections;
mod m20250115_000000_seed_catalog;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250110_000000_create_brands::Migration),
            Box::new(m20250110_000001_create_categories::Migration),
            Box::new(m20250110_000002_create_collections::Migration),
            Box::new(m20250110_000003_create_products::Migration),
            Box::new(m20250110_000004_create_product_collections::Migration),
            Box::new(m20250115_000000_seed_catalog::Migration),
        ]
    }
}
