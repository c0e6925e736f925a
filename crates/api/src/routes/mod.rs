//! HTTP route handlers.

pub mod categories;
pub mod health;
pub mod metrics;
pub mod products;

use common::{CategoryId, ProductId};
use domain::{CategoryService, ProductService};
use store::{CategoryRepository, ProductRepository};

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<P: ProductRepository, C: CategoryRepository> {
    pub category_service: CategoryService<C>,
    pub product_service: ProductService<P, C>,
}

pub(crate) fn parse_category_id(id: &str) -> Result<CategoryId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid category ID: {e}")))?;
    Ok(CategoryId::from_uuid(uuid))
}

pub(crate) fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid product ID: {e}")))?;
    Ok(ProductId::from_uuid(uuid))
}
