//! In-memory audit store for testing and local development.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::record::AuditRecord;
use crate::store::AuditStore;
use crate::Result;

/// In-memory append-only audit store.
#[derive(Clone, Default)]
pub struct InMemoryAuditStore {
    records: Arc<RwLock<Vec<AuditRecord>>>,
}

impl InMemoryAuditStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every record, in insertion order.
    pub async fn all(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn record(&self, record: AuditRecord) -> Result<()> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn find_by_aggregate(&self, aggregate_id: &str) -> Result<Vec<AuditRecord>> {
        let mut matching: Vec<AuditRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.aggregate_id == aggregate_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at));
        Ok(matching)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EntityType;
    use chrono::Utc;
    use uuid::Uuid;

    fn record_for(aggregate_id: &str, event_type: &str) -> AuditRecord {
        AuditRecord {
            id: Uuid::new_v4(),
            event_id: format!("{aggregate_id}-1"),
            event_type: event_type.to_string(),
            entity_type: EntityType::classify(event_type),
            aggregate_id: aggregate_id.to_string(),
            occurred_at: Utc::now(),
            payload: serde_json::json!({}),
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn records_append_and_filter_by_aggregate() {
        let store = InMemoryAuditStore::new();
        store
            .record(record_for("p-1", "PRODUCT_CREATED"))
            .await
            .unwrap();
        store
            .record(record_for("p-2", "PRODUCT_CREATED"))
            .await
            .unwrap();
        store
            .record(record_for("p-1", "PRODUCT_ACTIVATED"))
            .await
            .unwrap();

        assert_eq!(store.count().await.unwrap(), 3);

        let for_p1 = store.find_by_aggregate("p-1").await.unwrap();
        assert_eq!(for_p1.len(), 2);
        assert!(for_p1.iter().all(|r| r.aggregate_id == "p-1"));
    }
}
