//! Product record, status enum, attributes, and repository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CategoryId, ProductId};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Lifecycle status of a product.
///
/// Transitions:
/// ```text
/// Draft ──► Active ──► Archived
///   │                     ▲
///   └─────────────────────┘
/// ```
///
/// `Archived` is terminal for status; description edits remain allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Newly created, fully editable.
    #[default]
    Draft,

    /// Published; must keep at least one category and one attribute.
    Active,

    /// Retired; categories and attributes are frozen.
    Archived,
}

impl ProductStatus {
    pub fn is_draft(&self) -> bool {
        matches!(self, ProductStatus::Draft)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ProductStatus::Active)
    }

    pub fn is_archived(&self) -> bool {
        matches!(self, ProductStatus::Archived)
    }

    /// Returns the status name as stored on the wire and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "DRAFT",
            ProductStatus::Active => "ACTIVE",
            ProductStatus::Archived => "ARCHIVED",
        }
    }

    /// Parses the stored representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(ProductStatus::Draft),
            "ACTIVE" => Some(ProductStatus::Active),
            "ARCHIVED" => Some(ProductStatus::Archived),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a product attribute: a string, number, or boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value as f64)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

/// A single key/value attribute on a product. Keys are unique per product
/// and compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub key: String,
    pub value: AttributeValue,
}

impl ProductAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    /// Unique display name, non-empty, at most 255 characters.
    pub name: String,

    pub description: Option<String>,

    pub status: ProductStatus,

    /// Ordered attribute list; keys unique within the product.
    pub attributes: Vec<ProductAttribute>,

    /// Associated categories; set semantics with insertion order preserved.
    pub categories: Vec<CategoryId>,

    /// Optimistic concurrency token. `0` until first saved.
    #[serde(default)]
    pub version: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Creates a new unsaved product in `Draft` status.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        categories: Vec<CategoryId>,
        attributes: Vec<ProductAttribute>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProductId::new(),
            name: name.into(),
            description,
            status: ProductStatus::Draft,
            attributes,
            categories,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the category is associated with this product.
    pub fn has_category(&self, category_id: CategoryId) -> bool {
        self.categories.contains(&category_id)
    }

    /// Returns the attribute with the given key, if present.
    pub fn attribute(&self, key: &str) -> Option<&ProductAttribute> {
        self.attributes.iter().find(|a| a.key == key)
    }

    /// Returns true if an attribute with the given key exists.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }
}

/// Persistence port for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Looks a product up by id, including its category associations.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>>;

    /// Looks a product up by name (case-insensitive match).
    async fn find_by_name(&self, name: &str) -> Result<Option<Product>>;

    /// Persists a product. Same versioning contract as
    /// [`CategoryRepository::save`](crate::CategoryRepository::save).
    async fn save(&self, product: Product) -> Result<Product>;

    /// Returns all products, oldest first.
    async fn list(&self) -> Result<Vec<Product>>;
}
