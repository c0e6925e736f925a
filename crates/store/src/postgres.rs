//! PostgreSQL-backed repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use common::{CategoryId, ProductId};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Category, CategoryRepository, Product, ProductRepository, Result, StoreError,
};

/// Runs the database migrations for the catalog schema.
pub async fn run_migrations(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}

/// PostgreSQL category repository.
#[derive(Clone)]
pub struct PostgresCategoryRepository {
    pool: PgPool,
}

impl PostgresCategoryRepository {
    /// Creates a new repository on the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_category(row: PgRow) -> Result<Category> {
        Ok(Category {
            id: CategoryId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            parent_id: row
                .try_get::<Option<Uuid>, _>("parent_id")?
                .map(CategoryId::from_uuid),
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_category).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_category).transpose()
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> Result<Vec<Category>> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();

        let rows = sqlx::query("SELECT * FROM categories WHERE id = ANY($1)")
            .bind(&uuids)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_category).collect()
    }

    async fn save(&self, mut category: Category) -> Result<Category> {
        let now = Utc::now();

        if category.version == 0 {
            category.version = 1;
            category.updated_at = now;

            sqlx::query(
                r#"
                INSERT INTO categories (id, name, parent_id, version, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(category.id.as_uuid())
            .bind(&category.name)
            .bind(category.parent_id.map(|id| id.as_uuid()))
            .bind(category.version)
            .bind(category.created_at)
            .bind(category.updated_at)
            .execute(&self.pool)
            .await?;

            return Ok(category);
        }

        let expected = category.version;
        category.version += 1;
        category.updated_at = now;

        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = $1, parent_id = $2, version = $3, updated_at = $4
            WHERE id = $5 AND version = $6
            "#,
        )
        .bind(&category.name)
        .bind(category.parent_id.map(|id| id.as_uuid()))
        .bind(category.version)
        .bind(category.updated_at)
        .bind(category.id.as_uuid())
        .bind(expected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let actual: Option<i64> =
                sqlx::query_scalar("SELECT version FROM categories WHERE id = $1")
                    .bind(category.id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await?;

            return Err(StoreError::VersionConflict {
                entity: "Category",
                id: category.id.as_uuid(),
                expected,
                actual: actual.unwrap_or(0),
            });
        }

        Ok(category)
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_category).collect()
    }
}

/// PostgreSQL product repository.
///
/// Category associations live in the `product_categories` join table and are
/// written in the same transaction as the product row.
#[derive(Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    /// Creates a new repository on the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_to_product(row: PgRow, categories: Vec<CategoryId>) -> Result<Product> {
        let status: String = row.try_get("status")?;
        let attributes: serde_json::Value = row.try_get("attributes")?;

        Ok(Product {
            id: ProductId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            status: serde_json::from_value(serde_json::Value::String(status))?,
            attributes: serde_json::from_value(attributes)?,
            categories,
            version: row.try_get("version")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn category_ids_for(&self, product_id: ProductId) -> Result<Vec<CategoryId>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT category_id FROM product_categories WHERE product_id = $1 ORDER BY position",
        )
        .bind(product_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(CategoryId::from_uuid).collect())
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let categories = self.category_ids_for(id).await?;
                Ok(Some(Self::row_to_product(row, categories)?))
            }
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let id = ProductId::from_uuid(row.try_get::<Uuid, _>("id")?);
                let categories = self.category_ids_for(id).await?;
                Ok(Some(Self::row_to_product(row, categories)?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, mut product: Product) -> Result<Product> {
        let now = Utc::now();
        let attributes = serde_json::to_value(&product.attributes)?;

        let mut tx = self.pool.begin().await?;

        if product.version == 0 {
            product.version = 1;
            product.updated_at = now;

            sqlx::query(
                r#"
                INSERT INTO products (id, name, description, status, attributes, version, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(product.id.as_uuid())
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.status.as_str())
            .bind(&attributes)
            .bind(product.version)
            .bind(product.created_at)
            .bind(product.updated_at)
            .execute(&mut *tx)
            .await?;
        } else {
            let expected = product.version;
            product.version += 1;
            product.updated_at = now;

            let result = sqlx::query(
                r#"
                UPDATE products
                SET name = $1, description = $2, status = $3, attributes = $4, version = $5, updated_at = $6
                WHERE id = $7 AND version = $8
                "#,
            )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.status.as_str())
            .bind(&attributes)
            .bind(product.version)
            .bind(product.updated_at)
            .bind(product.id.as_uuid())
            .bind(expected)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                let actual: Option<i64> =
                    sqlx::query_scalar("SELECT version FROM products WHERE id = $1")
                        .bind(product.id.as_uuid())
                        .fetch_optional(&mut *tx)
                        .await?;

                return Err(StoreError::VersionConflict {
                    entity: "Product",
                    id: product.id.as_uuid(),
                    expected,
                    actual: actual.unwrap_or(0),
                });
            }
        }

        // Rewrite category associations to match the aggregate.
        sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(product.id.as_uuid())
            .execute(&mut *tx)
            .await?;

        for (position, category_id) in product.categories.iter().enumerate() {
            sqlx::query(
                "INSERT INTO product_categories (product_id, category_id, position) VALUES ($1, $2, $3)",
            )
            .bind(product.id.as_uuid())
            .bind(category_id.as_uuid())
            .bind(position as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query("SELECT * FROM products ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        let mut products = Vec::with_capacity(rows.len());
        for row in rows {
            let id = ProductId::from_uuid(row.try_get::<Uuid, _>("id")?);
            let categories = self.category_ids_for(id).await?;
            products.push(Self::row_to_product(row, categories)?);
        }

        Ok(products)
    }
}
