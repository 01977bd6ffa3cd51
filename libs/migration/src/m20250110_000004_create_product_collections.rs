use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProductCollections::Table)
                    .if_not_exists()
                    .col(integer(ProductCollections::ProductId))
                    .col(integer(ProductCollections::CollectionId))
                    .primary_key(
                        Index::create()
                            .col(ProductCollections::ProductId)
                            .col(ProductCollections::CollectionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_collections_product_id")
                            .from(ProductCollections::Table, ProductCollections::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_collections_collection_id")
                            .from(ProductCollections::Table, ProductCollections::CollectionId)
                            .to(Collections::Table, Collections::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The primary key covers product-first lookups; this index covers
        // the collection-first join used by listing filters.
        manager
            .create_index(
                Index::create()
                    .name("idx_product_collections_collection_id")
                    .table(ProductCollections::Table)
                    .col(ProductCollections::CollectionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ProductCollections::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ProductCollections {
    Table,
    ProductId,
    CollectionId,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Collections {
    Table,
    Id,
}
