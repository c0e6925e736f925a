//! In-memory repository implementations for testing and local development.
//!
//! These provide the same interface and versioning behavior as the
//! PostgreSQL implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{CategoryId, ProductId};
use tokio::sync::RwLock;

use crate::{
    Category, CategoryRepository, Product, ProductRepository, Result, StoreError,
};

/// In-memory category repository.
#[derive(Clone, Default)]
pub struct InMemoryCategoryRepository {
    rows: Arc<RwLock<HashMap<CategoryId, Category>>>,
}

impl InMemoryCategoryRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored categories.
    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let needle = name.to_lowercase();
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|c| c.name.to_lowercase() == needle)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> Result<Vec<Category>> {
        let rows = self.rows.read().await;
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    async fn save(&self, mut category: Category) -> Result<Category> {
        let mut rows = self.rows.write().await;

        if let Some(stored) = rows.get(&category.id) {
            if stored.version != category.version {
                return Err(StoreError::VersionConflict {
                    entity: "Category",
                    id: category.id.as_uuid(),
                    expected: category.version,
                    actual: stored.version,
                });
            }
        } else if category.version != 0 {
            return Err(StoreError::VersionConflict {
                entity: "Category",
                id: category.id.as_uuid(),
                expected: category.version,
                actual: 0,
            });
        }

        category.version += 1;
        category.updated_at = Utc::now();
        rows.insert(category.id, category.clone());
        Ok(category)
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let mut all: Vec<Category> = self.rows.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }
}

/// In-memory product repository.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    rows: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    /// Creates a new empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored products.
    pub async fn count(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Product>> {
        let needle = name.to_lowercase();
        Ok(self
            .rows
            .read()
            .await
            .values()
            .find(|p| p.name.to_lowercase() == needle)
            .cloned())
    }

    async fn save(&self, mut product: Product) -> Result<Product> {
        let mut rows = self.rows.write().await;

        if let Some(stored) = rows.get(&product.id) {
            if stored.version != product.version {
                return Err(StoreError::VersionConflict {
                    entity: "Product",
                    id: product.id.as_uuid(),
                    expected: product.version,
                    actual: stored.version,
                });
            }
        } else if product.version != 0 {
            return Err(StoreError::VersionConflict {
                entity: "Product",
                id: product.id.as_uuid(),
                expected: product.version,
                actual: 0,
            });
        }

        product.version += 1;
        product.updated_at = Utc::now();
        rows.insert(product.id, product.clone());
        Ok(product)
    }

    async fn list(&self) -> Result<Vec<Product>> {
        let mut all: Vec<Product> = self.rows.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }
}
