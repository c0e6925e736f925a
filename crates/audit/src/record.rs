//! Audit records and the event-type classifier.

use chrono::{DateTime, Utc};
use messaging::EventMessage;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of aggregate an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityType {
    Product,
    Category,
    Unknown,
}

impl EntityType {
    /// Classifies an event type by prefix.
    ///
    /// `CATEGORY_ADDED_*` and `CATEGORY_REMOVED_*` describe product state,
    /// so they classify as `Product` despite the `CATEGORY` prefix.
    pub fn classify(event_type: &str) -> Self {
        if event_type.starts_with("PRODUCT")
            || event_type.starts_with("ATTRIBUTE")
            || event_type.starts_with("CATEGORY_ADDED")
            || event_type.starts_with("CATEGORY_REMOVED")
        {
            EntityType::Product
        } else if event_type.starts_with("CATEGORY") {
            EntityType::Category
        } else {
            EntityType::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Product => "Product",
            EntityType::Category => "Category",
            EntityType::Unknown => "Unknown",
        }
    }

    /// Parses the stored representation, defaulting to `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value {
            "Product" => EntityType::Product,
            "Category" => EntityType::Category,
            _ => EntityType::Unknown,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single immutable audit entry, derived entirely from a consumed event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub event_id: String,
    pub event_type: String,
    pub entity_type: EntityType,
    pub aggregate_id: String,
    pub occurred_at: DateTime<Utc>,
    pub payload: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Builds a record from a consumed event envelope.
    pub fn from_envelope(envelope: &EventMessage) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id: envelope.event_id.clone(),
            event_type: envelope.event_type.clone(),
            entity_type: EntityType::classify(&envelope.event_type),
            aggregate_id: envelope.aggregate_id.clone(),
            occurred_at: envelope.occurred_at,
            payload: envelope.data.clone(),
            recorded_at: Utc::now(),
        }
    }
}
