use thiserror::Error;

/// Errors that can occur when talking to the message bus.
#[derive(Debug, Error)]
pub enum BusError {
    /// The broker is not reachable.
    #[error("Broker unavailable: {0}")]
    Unavailable(String),

    /// A message could not be delivered to a topic.
    #[error("Failed to deliver message to topic {topic}: {reason}")]
    Delivery { topic: String, reason: String },

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for messaging operations.
pub type Result<T> = std::result::Result<T, BusError>;
