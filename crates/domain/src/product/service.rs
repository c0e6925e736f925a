//! Product service: the command handling pipeline for products.

use std::sync::Arc;

use common::ProductId;
use messaging::EventPublisher;
use store::{CategoryRepository, Product, ProductAttribute, ProductRepository, ProductStatus};

use crate::error::{DomainError, ProductError};
use crate::events::CatalogEvent;

use super::commands::{
    ActivateProduct, AddAttributeToProduct, AddCategoryToProduct, ArchiveProduct, CreateProduct,
    RemoveCategoryFromProduct, RemoveProductAttribute, UpdateProductAttribute,
    UpdateProductDescription,
};
use super::rules;

/// Service for managing products.
///
/// Category references are resolved against the category repository; product
/// state transitions are guarded by the rules in [`rules`].
pub struct ProductService<P: ProductRepository, C: CategoryRepository> {
    products: P,
    categories: C,
    publisher: Arc<EventPublisher>,
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    /// Creates a new product service.
    pub fn new(products: P, categories: C, publisher: Arc<EventPublisher>) -> Self {
        Self {
            products,
            categories,
            publisher,
        }
    }

    async fn load(&self, id: ProductId) -> Result<Product, DomainError> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProductError::NotFound.into())
    }

    /// Creates a new product in `DRAFT` status.
    #[tracing::instrument(skip(self, cmd), fields(name = %cmd.name))]
    pub async fn create_product(&self, cmd: CreateProduct) -> Result<Product, DomainError> {
        rules::validate_name(&cmd.name)?;
        rules::validate_attribute_key_uniqueness(&cmd.attributes)?;

        if self.products.find_by_name(&cmd.name).await?.is_some() {
            return Err(ProductError::NameTaken.into());
        }

        if !cmd.category_ids.is_empty() {
            let found = self.categories.find_by_ids(&cmd.category_ids).await?;
            if found.len() != cmd.category_ids.len() {
                return Err(ProductError::CategoriesNotFound.into());
            }
        }

        let product = Product::new(cmd.name, cmd.description, cmd.category_ids, cmd.attributes);
        let saved = self.products.save(product).await?;
        metrics::counter!("catalog_commands_total", "command" => "create_product").increment(1);

        self.publisher
            .publish(&CatalogEvent::product_created(&saved))
            .await?;

        tracing::info!(product_id = %saved.id, "product created");
        Ok(saved)
    }

    /// Moves a product from `DRAFT` to `ACTIVE`.
    #[tracing::instrument(skip(self, cmd), fields(product_id = %cmd.id))]
    pub async fn activate_product(&self, cmd: ActivateProduct) -> Result<Product, DomainError> {
        let mut product = self.load(cmd.id).await?;
        rules::validate_can_activate(&product)?;

        product.status = ProductStatus::Active;
        let saved = self.products.save(product).await?;
        metrics::counter!("catalog_commands_total", "command" => "activate_product").increment(1);

        self.publisher
            .publish(&CatalogEvent::product_activated(saved.id))
            .await?;

        tracing::info!(product_id = %saved.id, "product activated");
        Ok(saved)
    }

    /// Archives a product. Archiving has no guard beyond existence, so an
    /// already-archived product is saved and published again.
    #[tracing::instrument(skip(self, cmd), fields(product_id = %cmd.id))]
    pub async fn archive_product(&self, cmd: ArchiveProduct) -> Result<Product, DomainError> {
        let mut product = self.load(cmd.id).await?;

        product.status = ProductStatus::Archived;
        let saved = self.products.save(product).await?;
        metrics::counter!("catalog_commands_total", "command" => "archive_product").increment(1);

        self.publisher
            .publish(&CatalogEvent::product_archived(saved.id))
            .await?;

        tracing::info!(product_id = %saved.id, "product archived");
        Ok(saved)
    }

    /// Replaces the description. Allowed in any status, including archived.
    #[tracing::instrument(skip(self, cmd), fields(product_id = %cmd.id))]
    pub async fn update_description(
        &self,
        cmd: UpdateProductDescription,
    ) -> Result<Product, DomainError> {
        let mut product = self.load(cmd.id).await?;
        let description = rules::validate_description(&cmd.description)?;

        product.description = Some(description.clone());
        let saved = self.products.save(product).await?;
        metrics::counter!("catalog_commands_total", "command" => "update_description")
            .increment(1);

        self.publisher
            .publish(&CatalogEvent::product_description_updated(
                saved.id,
                description,
            ))
            .await?;

        Ok(saved)
    }

    /// Associates a category with a product.
    #[tracing::instrument(skip(self, cmd), fields(product_id = %cmd.product_id))]
    pub async fn add_category(&self, cmd: AddCategoryToProduct) -> Result<Product, DomainError> {
        let mut product = self.load(cmd.product_id).await?;
        rules::validate_can_add_associations(&product)?;

        if self.categories.find_by_id(cmd.category_id).await?.is_none() {
            return Err(ProductError::CategoryNotFound.into());
        }
        if product.has_category(cmd.category_id) {
            return Err(ProductError::CategoryAlreadyAssociated.into());
        }

        product.categories.push(cmd.category_id);
        let saved = self.products.save(product).await?;
        metrics::counter!("catalog_commands_total", "command" => "add_category").increment(1);

        self.publisher
            .publish(&CatalogEvent::category_added_to_product(
                saved.id,
                cmd.category_id,
            ))
            .await?;

        Ok(saved)
    }

    /// Removes a category association. An `ACTIVE` product keeps at least
    /// one category.
    #[tracing::instrument(skip(self, cmd), fields(product_id = %cmd.product_id))]
    pub async fn remove_category(
        &self,
        cmd: RemoveCategoryFromProduct,
    ) -> Result<Product, DomainError> {
        let mut product = self.load(cmd.product_id).await?;
        rules::validate_can_modify(&product)?;

        if !product.has_category(cmd.category_id) {
            return Err(ProductError::CategoryNotAssociated.into());
        }
        if product.status.is_active() && product.categories.len() == 1 {
            return Err(ProductError::ActiveNeedsCategory.into());
        }

        product.categories.retain(|id| *id != cmd.category_id);
        let saved = self.products.save(product).await?;
        metrics::counter!("catalog_commands_total", "command" => "remove_category").increment(1);

        self.publisher
            .publish(&CatalogEvent::category_removed_from_product(
                saved.id,
                cmd.category_id,
            ))
            .await?;

        Ok(saved)
    }

    /// Adds an attribute. Keys are unique per product, case-sensitively.
    #[tracing::instrument(skip(self, cmd), fields(product_id = %cmd.product_id, key = %cmd.key))]
    pub async fn add_attribute(
        &self,
        cmd: AddAttributeToProduct,
    ) -> Result<Product, DomainError> {
        let mut product = self.load(cmd.product_id).await?;
        rules::validate_can_add_associations(&product)?;
        rules::validate_attribute_key_not_exists(&product, &cmd.key)?;

        product
            .attributes
            .push(ProductAttribute::new(cmd.key.clone(), cmd.value.clone()));
        let saved = self.products.save(product).await?;
        metrics::counter!("catalog_commands_total", "command" => "add_attribute").increment(1);

        self.publisher
            .publish(&CatalogEvent::attribute_added_to_product(
                saved.id, cmd.key, cmd.value,
            ))
            .await?;

        Ok(saved)
    }

    /// Replaces an existing attribute's value.
    #[tracing::instrument(skip(self, cmd), fields(product_id = %cmd.product_id, key = %cmd.key))]
    pub async fn update_attribute(
        &self,
        cmd: UpdateProductAttribute,
    ) -> Result<Product, DomainError> {
        let mut product = self.load(cmd.product_id).await?;
        rules::validate_can_modify(&product)?;

        let Some(attribute) = product.attributes.iter_mut().find(|a| a.key == cmd.key) else {
            return Err(ProductError::AttributeNotAssociated.into());
        };
        attribute.value = cmd.value.clone();

        let saved = self.products.save(product).await?;
        metrics::counter!("catalog_commands_total", "command" => "update_attribute").increment(1);

        self.publisher
            .publish(&CatalogEvent::attribute_updated(saved.id, cmd.key, cmd.value))
            .await?;

        Ok(saved)
    }

    /// Removes an attribute. An `ACTIVE` product keeps at least one.
    #[tracing::instrument(skip(self, cmd), fields(product_id = %cmd.product_id, key = %cmd.key))]
    pub async fn remove_attribute(
        &self,
        cmd: RemoveProductAttribute,
    ) -> Result<Product, DomainError> {
        let mut product = self.load(cmd.product_id).await?;
        rules::validate_can_modify(&product)?;

        if !product.has_attribute(&cmd.key) {
            return Err(ProductError::AttributeNotAssociated.into());
        }
        if product.status.is_active() && product.attributes.len() == 1 {
            return Err(ProductError::ActiveNeedsAttribute.into());
        }

        product.attributes.retain(|a| a.key != cmd.key);
        let saved = self.products.save(product).await?;
        metrics::counter!("catalog_commands_total", "command" => "remove_attribute").increment(1);

        self.publisher
            .publish(&CatalogEvent::attribute_removed_from_product(
                saved.id, cmd.key,
            ))
            .await?;

        Ok(saved)
    }

    /// Loads a product by id.
    pub async fn get_product(&self, id: ProductId) -> Result<Product, DomainError> {
        self.load(id).await
    }

    /// Returns all products, oldest first.
    pub async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.products.list().await?)
    }
}
