use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with the catalog stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stale aggregate was saved. The caller loaded one version but the
    /// stored row has since moved past it.
    #[error("Version conflict for {entity} {id}: expected version {expected}, found {actual}")]
    VersionConflict {
        entity: &'static str,
        id: Uuid,
        expected: i64,
        actual: i64,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
