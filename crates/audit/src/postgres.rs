//! PostgreSQL-backed audit store.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::record::{AuditRecord, EntityType};
use crate::store::AuditStore;
use crate::Result;

/// PostgreSQL audit store writing to the `audit_logs` table.
#[derive(Clone)]
pub struct PostgresAuditStore {
    pool: PgPool,
}

impl PostgresAuditStore {
    /// Creates a new store on the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_record(row: PgRow) -> Result<AuditRecord> {
        let entity_type: String = row.try_get("entity_type")?;
        Ok(AuditRecord {
            id: row.try_get("id")?,
            event_id: row.try_get("event_id")?,
            event_type: row.try_get("event_type")?,
            entity_type: EntityType::parse(&entity_type),
            aggregate_id: row.try_get("aggregate_id")?,
            occurred_at: row.try_get("occurred_at")?,
            payload: row.try_get("payload")?,
            recorded_at: row.try_get("recorded_at")?,
        })
    }
}

#[async_trait]
impl AuditStore for PostgresAuditStore {
    async fn record(&self, record: AuditRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (id, event_id, event_type, entity_type, aggregate_id, occurred_at, payload, recorded_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(record.id)
        .bind(&record.event_id)
        .bind(&record.event_type)
        .bind(record.entity_type.as_str())
        .bind(&record.aggregate_id)
        .bind(record.occurred_at)
        .bind(&record.payload)
        .bind(record.recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_aggregate(&self, aggregate_id: &str) -> Result<Vec<AuditRecord>> {
        let rows = sqlx::query(
            "SELECT * FROM audit_logs WHERE aggregate_id = $1 ORDER BY occurred_at",
        )
        .bind(aggregate_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_record).collect()
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
