//! Persistence port for audit records.

use async_trait::async_trait;

use crate::record::AuditRecord;
use crate::Result;

/// Append-only store for audit records. Records are never updated or
/// deleted once written.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Appends a record.
    async fn record(&self, record: AuditRecord) -> Result<()>;

    /// Returns all records for an aggregate, oldest occurrence first.
    async fn find_by_aggregate(&self, aggregate_id: &str) -> Result<Vec<AuditRecord>>;

    /// Returns the total number of records.
    async fn count(&self) -> Result<u64>;
}
