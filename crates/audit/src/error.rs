use thiserror::Error;

/// Errors that can occur while recording audit entries.
#[derive(Debug, Error)]
pub enum AuditError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An envelope could not be parsed.
    #[error("Malformed event envelope: {0}")]
    Envelope(#[from] serde_json::Error),

    /// The consumer could not subscribe to its topics.
    #[error("Subscription failed: {0}")]
    Subscription(#[from] messaging::BusError),
}

/// Result type for audit operations.
pub type Result<T> = std::result::Result<T, AuditError>;
