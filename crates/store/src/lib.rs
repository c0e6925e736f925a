//! Persistence layer for the catalog service.
//!
//! This crate owns the aggregate records (`Category`, `Product`), the
//! repository ports the command services depend on, and two implementations
//! of those ports: an in-memory one for tests/dev and a PostgreSQL one.

pub mod category;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod product;

pub use category::{Category, CategoryRepository};
pub use error::{Result, StoreError};
pub use memory::{InMemoryCategoryRepository, InMemoryProductRepository};
pub use postgres::{PostgresCategoryRepository, PostgresProductRepository, run_migrations};
pub use product::{AttributeValue, Product, ProductAttribute, ProductRepository, ProductStatus};
