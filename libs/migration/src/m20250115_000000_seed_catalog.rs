use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let connection = manager.get_connection();

        connection
            .execute_unprepared(
                r#"
            INSERT INTO brands (id, slug, name)
            VALUES
                (1, 'northwind', 'Northwind'),
                (2, 'aurora-audio', 'Aurora Audio'),
                (3, 'fjellstad', 'Fjellstad')
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        connection
            .execute_unprepared(
                r#"
            INSERT INTO categories (id, slug, name)
            VALUES
                (1, 'headphones', 'Headphones'),
                (2, 'footwear', 'Footwear'),
                (3, 'backpacks', 'Backpacks')
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        connection
            .execute_unprepared(
                r#"
            INSERT INTO collections (id, slug, name)
            VALUES
                (1, 'new-arrivals', 'New Arrivals'),
                (2, 'summer-sale', 'Summer Sale'),
                (3, 'staff-picks', 'Staff Picks')
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        connection
            .execute_unprepared(
                r#"
            INSERT INTO products (
                id, name, description, slug, price, rating, images,
                brand_id, category_id, created_at
            )
            VALUES
                (
                    1,
                    'Studio Monitor Headphones',
                    'Closed-back reference headphones with a flat response curve',
                    'studio-monitor-headphones',
                    249.00, 4.7, '["studio-monitor-1.jpg"]'::jsonb,
                    2, 1, NOW() - INTERVAL '30 days'
                ),
                (
                    2,
                    'Wireless Earbuds',
                    'Compact earbuds with active noise cancellation',
                    'wireless-earbuds',
                    129.00, 4.2, '["earbuds-1.jpg", "earbuds-2.jpg"]'::jsonb,
                    2, 1, NOW() - INTERVAL '14 days'
                ),
                (
                    3,
                    'Trail Running Shoes',
                    'Lightweight shoes with aggressive grip for technical trails',
                    'trail-running-shoes',
                    139.00, 4.5, '["trail-shoes-1.jpg"]'::jsonb,
                    3, 2, NOW() - INTERVAL '21 days'
                ),
                (
                    4,
                    'City Sneakers',
                    'Everyday sneakers with recycled uppers',
                    'city-sneakers',
                    89.00, NULL, '["sneakers-1.jpg"]'::jsonb,
                    3, 2, NOW() - INTERVAL '7 days'
                ),
                (
                    5,
                    'Commuter Backpack',
                    'Water resistant 22L backpack with a padded laptop sleeve',
                    'commuter-backpack',
                    119.00, 4.8, '["backpack-1.jpg"]'::jsonb,
                    1, 3, NOW() - INTERVAL '3 days'
                ),
                (
                    6,
                    'Alpine Daypack',
                    'Stripped-down 18L pack for fast hikes',
                    'alpine-daypack',
                    99.00, 4.1, '["daypack-1.jpg"]'::jsonb,
                    1, 3, NOW() - INTERVAL '1 day'
                )
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        connection
            .execute_unprepared(
                r#"
            INSERT INTO product_collections (product_id, collection_id)
            VALUES
                (2, 1), (4, 1), (5, 1), (6, 1),
                (2, 2), (3, 2),
                (1, 3), (5, 3)
            ON CONFLICT DO NOTHING
            "#,
            )
            .await?;

        // Keep the sequences ahead of the explicit seed ids
        for table in ["brands", "categories", "collections", "products"] {
            connection
                .execute_unprepared(&format!(
                    "SELECT setval(pg_get_serial_sequence('{table}', 'id'), (SELECT MAX(id) FROM {table}))"
                ))
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let connection = manager.get_connection();
        connection
            .execute_unprepared("DELETE FROM product_collections WHERE product_id <= 6")
            .await?;
        connection
            .execute_unprepared("DELETE FROM products WHERE id <= 6")
            .await?;
        connection
            .execute_unprepared("DELETE FROM collections WHERE id <= 3")
            .await?;
        connection
            .execute_unprepared("DELETE FROM categories WHERE id <= 3")
            .await?;
        connection
            .execute_unprepared("DELETE FROM brands WHERE id <= 3")
            .await?;
        Ok(())
    }
}
