//! Product aggregate: commands, rules, and service.

pub mod commands;
pub mod rules;
pub mod service;

pub use commands::{
    ActivateProduct, AddAttributeToProduct, AddCategoryToProduct, ArchiveProduct, CreateProduct,
    RemoveCategoryFromProduct, RemoveProductAttribute, UpdateProductAttribute,
    UpdateProductDescription,
};
pub use service::ProductService;
