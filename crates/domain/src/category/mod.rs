//! Category aggregate: commands, rules, and service.

pub mod commands;
pub mod rules;
pub mod service;

pub use commands::{CreateCategory, UpdateCategory};
pub use service::CategoryService;
