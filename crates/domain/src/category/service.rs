//! Category service: the command handling pipeline for categories.

use std::sync::Arc;

use common::CategoryId;
use messaging::EventPublisher;
use store::{Category, CategoryRepository};

use crate::error::{CategoryError, DomainError};
use crate::events::CatalogEvent;

use super::commands::{CreateCategory, UpdateCategory};
use super::rules;

/// Service for managing categories.
///
/// Each command runs the same pipeline: load, validate, persist, publish.
pub struct CategoryService<C: CategoryRepository> {
    categories: C,
    publisher: Arc<EventPublisher>,
}

impl<C: CategoryRepository> CategoryService<C> {
    /// Creates a new category service.
    pub fn new(categories: C, publisher: Arc<EventPublisher>) -> Self {
        Self {
            categories,
            publisher,
        }
    }

    /// Creates a new category.
    #[tracing::instrument(skip(self, cmd), fields(name = %cmd.name))]
    pub async fn create_category(&self, cmd: CreateCategory) -> Result<Category, DomainError> {
        rules::validate_name(&cmd.name)?;

        if self.categories.find_by_name(&cmd.name).await?.is_some() {
            return Err(CategoryError::NameTaken.into());
        }

        if let Some(parent_id) = cmd.parent_id {
            let parent = self.categories.find_by_id(parent_id).await?;
            rules::validate_parent_exists(parent.as_ref())?;
        }

        let saved = self
            .categories
            .save(Category::new(cmd.name, cmd.parent_id))
            .await?;
        metrics::counter!("catalog_commands_total", "command" => "create_category").increment(1);

        self.publisher
            .publish(&CatalogEvent::category_created(&saved))
            .await?;

        tracing::info!(category_id = %saved.id, "category created");
        Ok(saved)
    }

    /// Updates a category's name and/or parent.
    #[tracing::instrument(skip(self, cmd), fields(category_id = %cmd.id))]
    pub async fn update_category(&self, cmd: UpdateCategory) -> Result<Category, DomainError> {
        let mut category = self
            .categories
            .find_by_id(cmd.id)
            .await?
            .ok_or(CategoryError::NotFound)?;

        if let Some(name) = cmd.name {
            rules::validate_name(&name)?;
            if let Some(existing) = self.categories.find_by_name(&name).await?
                && existing.id != category.id
            {
                rules::validate_name_uniqueness(&existing.name, &name)?;
            }
            category.name = name;
        }

        if let Some(parent_id) = cmd.parent_id {
            if let Some(parent_id) = parent_id {
                rules::validate_not_self_reference(category.id, parent_id)?;
                let parent = self.categories.find_by_id(parent_id).await?;
                rules::validate_parent_exists(parent.as_ref())?;
            }
            category.parent_id = parent_id;
        }

        let saved = self.categories.save(category).await?;
        metrics::counter!("catalog_commands_total", "command" => "update_category").increment(1);

        self.publisher
            .publish(&CatalogEvent::category_updated(&saved))
            .await?;

        tracing::info!(category_id = %saved.id, "category updated");
        Ok(saved)
    }

    /// Loads a category by id.
    pub async fn get_category(&self, id: CategoryId) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| CategoryError::NotFound.into())
    }

    /// Returns all categories, oldest first.
    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list().await?)
    }
}
