//! Shared types used across the catalog service crates.

pub mod types;

pub use types::{CategoryId, ProductId};
