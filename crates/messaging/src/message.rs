//! Wire format for published domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message header names.
pub mod header {
    /// Carries the event id, used to correlate downstream processing.
    pub const CORRELATION_ID: &str = "correlation-id";

    /// Duplicates the envelope event type for header-based filtering.
    pub const EVENT_TYPE: &str = "event-type";
}

/// An event that can be published to the bus.
///
/// Implemented by the domain event enum; the publisher only needs the
/// type name, the aggregate identity, and a JSON payload.
pub trait DomainEvent {
    /// The SCREAMING_SNAKE_CASE event type name.
    fn event_type(&self) -> &'static str;

    /// The id of the aggregate the event describes.
    fn aggregate_id(&self) -> String;

    /// When the event occurred.
    fn occurred_at(&self) -> DateTime<Utc>;

    /// The event-specific payload carried in the envelope `data` field.
    fn payload(&self) -> serde_json::Result<serde_json::Value>;
}

/// The JSON envelope written to the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMessage {
    /// `<aggregateId>-<epochMillis>`, unique per publication.
    pub event_id: String,

    pub event_type: String,

    pub aggregate_id: String,

    pub occurred_at: DateTime<Utc>,

    /// Event-specific payload.
    pub data: serde_json::Value,
}

impl EventMessage {
    /// Builds the envelope for a domain event.
    pub fn from_event<E: DomainEvent>(event: &E) -> serde_json::Result<Self> {
        let aggregate_id = event.aggregate_id();
        let occurred_at = event.occurred_at();
        Ok(Self {
            event_id: format!("{}-{}", aggregate_id, occurred_at.timestamp_millis()),
            event_type: event.event_type().to_string(),
            aggregate_id,
            occurred_at,
            data: event.payload()?,
        })
    }
}
