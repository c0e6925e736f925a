//! Catalog domain: aggregates, business rules, command services, and events.
//!
//! Each command service follows the same pipeline: load the current
//! aggregate state, validate the business rules, persist, then publish a
//! single domain event describing the mutation. Events are published after
//! the write commits; a publish failure does not roll the write back.

pub mod category;
pub mod error;
pub mod events;
pub mod product;

pub use category::{CategoryService, CreateCategory, UpdateCategory};
pub use error::{CategoryError, DomainError, ErrorKind, ProductError};
pub use events::CatalogEvent;
pub use product::{
    ActivateProduct, AddAttributeToProduct, AddCategoryToProduct, ArchiveProduct, CreateProduct,
    ProductService, RemoveCategoryFromProduct, RemoveProductAttribute, UpdateProductAttribute,
    UpdateProductDescription,
};
