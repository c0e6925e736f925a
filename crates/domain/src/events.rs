//! Catalog domain events.

use chrono::{DateTime, Utc};
use common::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};
use store::{AttributeValue, Category, Product, ProductAttribute, ProductStatus};

/// Events published after a successful catalog mutation.
///
/// Serialized with the event type as the tag and the payload under `data`,
/// matching the published envelope's `eventType`/`data` split.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "eventType", content = "data")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogEvent {
    CategoryCreated(CategoryCreatedData),
    CategoryUpdated(CategoryUpdatedData),
    ProductCreated(ProductCreatedData),
    ProductActivated(ProductActivatedData),
    ProductArchived(ProductArchivedData),
    ProductDescriptionUpdated(ProductDescriptionUpdatedData),
    CategoryAddedToProduct(CategoryAddedToProductData),
    CategoryRemovedFromProduct(CategoryRemovedFromProductData),
    AttributeAddedToProduct(AttributeAddedToProductData),
    AttributeUpdated(AttributeUpdatedData),
    AttributeRemovedFromProduct(AttributeRemovedFromProductData),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreatedData {
    pub category_id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdatedData {
    pub category_id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreatedData {
    pub product_id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProductStatus,
    pub categories: Vec<CategoryId>,
    pub attributes: Vec<ProductAttribute>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductActivatedData {
    pub product_id: ProductId,
    pub activated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductArchivedData {
    pub product_id: ProductId,
    pub archived_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptionUpdatedData {
    pub product_id: ProductId,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAddedToProductData {
    pub product_id: ProductId,
    pub category_id: CategoryId,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRemovedFromProductData {
    pub product_id: ProductId,
    pub category_id: CategoryId,
    pub removed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeAddedToProductData {
    pub product_id: ProductId,
    pub key: String,
    pub value: AttributeValue,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeUpdatedData {
    pub product_id: ProductId,
    pub key: String,
    pub value: AttributeValue,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeRemovedFromProductData {
    pub product_id: ProductId,
    pub key: String,
    pub removed_at: DateTime<Utc>,
}

// Convenience constructors for events
impl CatalogEvent {
    pub fn category_created(category: &Category) -> Self {
        CatalogEvent::CategoryCreated(CategoryCreatedData {
            category_id: category.id,
            name: category.name.clone(),
            parent_id: category.parent_id,
            created_at: Utc::now(),
        })
    }

    pub fn category_updated(category: &Category) -> Self {
        CatalogEvent::CategoryUpdated(CategoryUpdatedData {
            category_id: category.id,
            name: category.name.clone(),
            parent_id: category.parent_id,
            updated_at: Utc::now(),
        })
    }

    pub fn product_created(product: &Product) -> Self {
        CatalogEvent::ProductCreated(ProductCreatedData {
            product_id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            status: product.status,
            categories: product.categories.clone(),
            attributes: product.attributes.clone(),
            created_at: Utc::now(),
        })
    }

    pub fn product_activated(product_id: ProductId) -> Self {
        CatalogEvent::ProductActivated(ProductActivatedData {
            product_id,
            activated_at: Utc::now(),
        })
    }

    pub fn product_archived(product_id: ProductId) -> Self {
        CatalogEvent::ProductArchived(ProductArchivedData {
            product_id,
            archived_at: Utc::now(),
        })
    }

    pub fn product_description_updated(product_id: ProductId, description: String) -> Self {
        CatalogEvent::ProductDescriptionUpdated(ProductDescriptionUpdatedData {
            product_id,
            description,
            updated_at: Utc::now(),
        })
    }

    pub fn category_added_to_product(product_id: ProductId, category_id: CategoryId) -> Self {
        CatalogEvent::CategoryAddedToProduct(CategoryAddedToProductData {
            product_id,
            category_id,
            added_at: Utc::now(),
        })
    }

    pub fn category_removed_from_product(product_id: ProductId, category_id: CategoryId) -> Self {
        CatalogEvent::CategoryRemovedFromProduct(CategoryRemovedFromProductData {
            product_id,
            category_id,
            removed_at: Utc::now(),
        })
    }

    pub fn attribute_added_to_product(
        product_id: ProductId,
        key: impl Into<String>,
        value: AttributeValue,
    ) -> Self {
        CatalogEvent::AttributeAddedToProduct(AttributeAddedToProductData {
            product_id,
            key: key.into(),
            value,
            added_at: Utc::now(),
        })
    }

    pub fn attribute_updated(
        product_id: ProductId,
        key: impl Into<String>,
        value: AttributeValue,
    ) -> Self {
        CatalogEvent::AttributeUpdated(AttributeUpdatedData {
            product_id,
            key: key.into(),
            value,
            updated_at: Utc::now(),
        })
    }

    pub fn attribute_removed_from_product(product_id: ProductId, key: impl Into<String>) -> Self {
        CatalogEvent::AttributeRemovedFromProduct(AttributeRemovedFromProductData {
            product_id,
            key: key.into(),
            removed_at: Utc::now(),
        })
    }
}

impl messaging::DomainEvent for CatalogEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::CategoryCreated(_) => "CATEGORY_CREATED",
            CatalogEvent::CategoryUpdated(_) => "CATEGORY_UPDATED",
            CatalogEvent::ProductCreated(_) => "PRODUCT_CREATED",
            CatalogEvent::ProductActivated(_) => "PRODUCT_ACTIVATED",
            CatalogEvent::ProductArchived(_) => "PRODUCT_ARCHIVED",
            CatalogEvent::ProductDescriptionUpdated(_) => "PRODUCT_DESCRIPTION_UPDATED",
            CatalogEvent::CategoryAddedToProduct(_) => "CATEGORY_ADDED_TO_PRODUCT",
            CatalogEvent::CategoryRemovedFromProduct(_) => "CATEGORY_REMOVED_FROM_PRODUCT",
            CatalogEvent::AttributeAddedToProduct(_) => "ATTRIBUTE_ADDED_TO_PRODUCT",
            CatalogEvent::AttributeUpdated(_) => "ATTRIBUTE_UPDATED",
            CatalogEvent::AttributeRemovedFromProduct(_) => "ATTRIBUTE_REMOVED_FROM_PRODUCT",
        }
    }

    fn aggregate_id(&self) -> String {
        match self {
            CatalogEvent::CategoryCreated(data) => data.category_id.to_string(),
            CatalogEvent::CategoryUpdated(data) => data.category_id.to_string(),
            CatalogEvent::ProductCreated(data) => data.product_id.to_string(),
            CatalogEvent::ProductActivated(data) => data.product_id.to_string(),
            CatalogEvent::ProductArchived(data) => data.product_id.to_string(),
            CatalogEvent::ProductDescriptionUpdated(data) => data.product_id.to_string(),
            CatalogEvent::CategoryAddedToProduct(data) => data.product_id.to_string(),
            CatalogEvent::CategoryRemovedFromProduct(data) => data.product_id.to_string(),
            CatalogEvent::AttributeAddedToProduct(data) => data.product_id.to_string(),
            CatalogEvent::AttributeUpdated(data) => data.product_id.to_string(),
            CatalogEvent::AttributeRemovedFromProduct(data) => data.product_id.to_string(),
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CatalogEvent::CategoryCreated(data) => data.created_at,
            CatalogEvent::CategoryUpdated(data) => data.updated_at,
            CatalogEvent::ProductCreated(data) => data.created_at,
            CatalogEvent::ProductActivated(data) => data.activated_at,
            CatalogEvent::ProductArchived(data) => data.archived_at,
            CatalogEvent::ProductDescriptionUpdated(data) => data.updated_at,
            CatalogEvent::CategoryAddedToProduct(data) => data.added_at,
            CatalogEvent::CategoryRemovedFromProduct(data) => data.removed_at,
            CatalogEvent::AttributeAddedToProduct(data) => data.added_at,
            CatalogEvent::AttributeUpdated(data) => data.updated_at,
            CatalogEvent::AttributeRemovedFromProduct(data) => data.removed_at,
        }
    }

    fn payload(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            CatalogEvent::CategoryCreated(data) => serde_json::to_value(data),
            CatalogEvent::CategoryUpdated(data) => serde_json::to_value(data),
            CatalogEvent::ProductCreated(data) => serde_json::to_value(data),
            CatalogEvent::ProductActivated(data) => serde_json::to_value(data),
            CatalogEvent::ProductArchived(data) => serde_json::to_value(data),
            CatalogEvent::ProductDescriptionUpdated(data) => serde_json::to_value(data),
            CatalogEvent::CategoryAddedToProduct(data) => serde_json::to_value(data),
            CatalogEvent::CategoryRemovedFromProduct(data) => serde_json::to_value(data),
            CatalogEvent::AttributeAddedToProduct(data) => serde_json::to_value(data),
            CatalogEvent::AttributeUpdated(data) => serde_json::to_value(data),
            CatalogEvent::AttributeRemovedFromProduct(data) => serde_json::to_value(data),
        }
    }
}
