//! Product commands.

use common::{CategoryId, ProductId};
use store::{AttributeValue, ProductAttribute};

/// Command to create a new product in `DRAFT` status.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    /// Unique product name.
    pub name: String,

    pub description: Option<String>,

    /// Categories to associate at creation. All must exist.
    pub category_ids: Vec<CategoryId>,

    /// Initial attributes; keys must be unique among themselves.
    pub attributes: Vec<ProductAttribute>,
}

impl CreateProduct {
    /// Creates a new CreateProduct command.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category_ids: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn categories(mut self, category_ids: Vec<CategoryId>) -> Self {
        self.category_ids = category_ids;
        self
    }

    pub fn attributes(mut self, attributes: Vec<ProductAttribute>) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Command to move a product from `DRAFT` to `ACTIVE`.
#[derive(Debug, Clone)]
pub struct ActivateProduct {
    pub id: ProductId,
}

impl ActivateProduct {
    pub fn new(id: ProductId) -> Self {
        Self { id }
    }
}

/// Command to archive a product. Idempotent.
#[derive(Debug, Clone)]
pub struct ArchiveProduct {
    pub id: ProductId,
}

impl ArchiveProduct {
    pub fn new(id: ProductId) -> Self {
        Self { id }
    }
}

/// Command to replace a product's description. Allowed in any status.
#[derive(Debug, Clone)]
pub struct UpdateProductDescription {
    pub id: ProductId,
    pub description: String,
}

impl UpdateProductDescription {
    pub fn new(id: ProductId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }
}

/// Command to associate a category with a product.
#[derive(Debug, Clone)]
pub struct AddCategoryToProduct {
    pub product_id: ProductId,
    pub category_id: CategoryId,
}

impl AddCategoryToProduct {
    pub fn new(product_id: ProductId, category_id: CategoryId) -> Self {
        Self {
            product_id,
            category_id,
        }
    }
}

/// Command to remove a category association from a product.
#[derive(Debug, Clone)]
pub struct RemoveCategoryFromProduct {
    pub product_id: ProductId,
    pub category_id: CategoryId,
}

impl RemoveCategoryFromProduct {
    pub fn new(product_id: ProductId, category_id: CategoryId) -> Self {
        Self {
            product_id,
            category_id,
        }
    }
}

/// Command to add an attribute to a product.
#[derive(Debug, Clone)]
pub struct AddAttributeToProduct {
    pub product_id: ProductId,
    pub key: String,
    pub value: AttributeValue,
}

impl AddAttributeToProduct {
    pub fn new(
        product_id: ProductId,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            product_id,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Command to replace an existing attribute's value.
#[derive(Debug, Clone)]
pub struct UpdateProductAttribute {
    pub product_id: ProductId,
    pub key: String,
    pub value: AttributeValue,
}

impl UpdateProductAttribute {
    pub fn new(
        product_id: ProductId,
        key: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            product_id,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Command to remove an attribute from a product.
#[derive(Debug, Clone)]
pub struct RemoveProductAttribute {
    pub product_id: ProductId,
    pub key: String,
}

impl RemoveProductAttribute {
    pub fn new(product_id: ProductId, key: impl Into<String>) -> Self {
        Self {
            product_id,
            key: key.into(),
        }
    }
}
