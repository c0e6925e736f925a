//! Audit trail for catalog domain events.
//!
//! The [`AuditLogConsumer`] subscribes to the catalog event topics and
//! materializes every consumed event into an append-only audit record.
//! Processing is best-effort: malformed or unpersistable messages are
//! logged and skipped so the consumer never stalls.

pub mod consumer;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;

pub use consumer::AuditLogConsumer;
pub use error::{AuditError, Result};
pub use memory::InMemoryAuditStore;
pub use postgres::PostgresAuditStore;
pub use record::{AuditRecord, EntityType};
pub use store::AuditStore;
