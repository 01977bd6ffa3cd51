use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType, LoaderTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::entity::{brand, category, collection, product, product_collection};
use crate::error::CatalogResult;
use crate::models::{CollectionScope, Product, ProductPage, RELATED_CANDIDATE_POOL, ResolvedFilters};
use crate::repository::CatalogRepository;

/// Sea-ORM backed implementation of [`CatalogRepository`].
#[derive(Debug, Clone)]
pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Attach brand, category and collection summaries to a batch of
    /// product rows. Three loader queries regardless of batch size.
    async fn hydrate(&self, models: Vec<product::Model>) -> CatalogResult<Vec<Product>> {
        let brands = models.load_one(brand::Entity, &self.db).await?;
        let categories = models.load_one(category::Entity, &self.db).await?;
        let collections = models
            .load_many_to_many(collection::Entity, product_collection::Entity, &self.db)
            .await?;

        let products = models
            .into_iter()
            .zip(brands)
            .zip(categories)
            .zip(collections)
            .map(|(((model, brand), category), collections)| {
                let mut product = Product::from(model);
                product.brand = brand.map(Into::into);
                product.category = category.map(Into::into);
                product.collections = collections.into_iter().map(Into::into).collect();
                product
            })
            .collect();
        Ok(products)
    }

    fn base_query(filters: &ResolvedFilters) -> sea_orm::Select<product::Entity> {
        let mut condition = Condition::all();

        if let Some(q) = &filters.q {
            let pattern = format!("%{}%", escape_like(q));
            condition = condition.add(
                Condition::any()
                    .add(Expr::col((product::Entity, product::Column::Name)).ilike(pattern.clone()))
                    .add(Expr::col((product::Entity, product::Column::Description)).ilike(pattern)),
            );
        }
        if let Some(min) = filters.min_price {
            condition = condition.add(product::Column::Price.gte(min));
        }
        if let Some(max) = filters.max_price {
            condition = condition.add(product::Column::Price.lte(max));
        }
        if let Some(min_rating) = filters.min_rating {
            // unrated products never satisfy a rating floor
            condition = condition
                .add(product::Column::Rating.is_not_null())
                .add(product::Column::Rating.gte(min_rating));
        }
        if !filters.brand_ids.is_empty() {
            condition = condition.add(product::Column::BrandId.is_in(filters.brand_ids.clone()));
        }
        if !filters.category_ids.is_empty() {
            condition =
                condition.add(product::Column::CategoryId.is_in(filters.category_ids.clone()));
        }

        let mut query = product::Entity::find();

        // Join the junction table only when a collection filter is active;
        // otherwise products with zero memberships must still appear.
        if let CollectionScope::Within(ids) = &filters.collections {
            query = query
                .join(JoinType::InnerJoin, product::Relation::ProductCollection.def())
                .filter(product_collection::Column::CollectionId.is_in(ids.clone()))
                .distinct();
        }

        query
            .filter(condition)
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
    }

    // Newest-first ordering keeps the candidate pool stable once a
    // category outgrows the pool size.
    fn related_query(category_id: i32, exclude_id: i32) -> sea_orm::Select<product::Entity> {
        product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .filter(product::Column::Id.ne(exclude_id))
            .order_by_desc(product::Column::CreatedAt)
            .order_by_desc(product::Column::Id)
            .limit(RELATED_CANDIDATE_POOL)
    }
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn brand_ids_by_slugs(&self, slugs: &[String]) -> CatalogResult<Vec<i32>> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let rows = brand::Entity::find()
            .filter(brand::Column::Slug.is_in(slugs.iter().cloned()))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|b| b.id).collect())
    }

    async fn category_ids_by_slugs(&self, slugs: &[String]) -> CatalogResult<Vec<i32>> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let rows = category::Entity::find()
            .filter(category::Column::Slug.is_in(slugs.iter().cloned()))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|c| c.id).collect())
    }

    async fn collection_ids_by_slugs(&self, slugs: &[String]) -> CatalogResult<Vec<i32>> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let rows = collection::Entity::find()
            .filter(collection::Column::Slug.is_in(slugs.iter().cloned()))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|c| c.id).collect())
    }

    async fn search_products(&self, filters: &ResolvedFilters) -> CatalogResult<ProductPage> {
        let paginator = Self::base_query(filters).paginate(&self.db, filters.limit);
        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(filters.page - 1).await?;
        let products = self.hydrate(models).await?;
        Ok(ProductPage {
            products,
            total,
            page: filters.page,
            limit: filters.limit,
        })
    }

    async fn get_product(&self, id: i32) -> CatalogResult<Option<Product>> {
        let Some(model) = product::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };
        let mut products = self.hydrate(vec![model]).await?;
        Ok(products.pop())
    }

    async fn related_candidates(
        &self,
        category_id: i32,
        exclude_id: i32,
    ) -> CatalogResult<Vec<Product>> {
        let models = Self::related_query(category_id, exclude_id)
            .all(&self.db)
            .await?;
        self.hydrate(models).await
    }
}

/// Escape LIKE metacharacters so user input matches literally.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::{escape_like, PgCatalogRepository};
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn related_candidate_pool_is_ordered_newest_first() {
        let sql = PgCatalogRepository::related_query(7, 42)
            .build(DbBackend::Postgres)
            .to_string();

        assert!(
            sql.contains(r#"ORDER BY "products"."created_at" DESC, "products"."id" DESC"#),
            "pool must be deterministic across identical requests: {sql}"
        );
        assert!(sql.contains("LIMIT 100"), "{sql}");
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("50% off_now"), "50\\% off\\_now");
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
