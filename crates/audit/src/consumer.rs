//! The audit trail consumer loop.

use std::sync::Arc;

use messaging::{
    CATEGORY_EVENTS_TOPIC, EventMessage, InboundMessage, MessageBus, PRODUCT_EVENTS_TOPIC,
};

use crate::record::AuditRecord;
use crate::store::AuditStore;
use crate::Result;

/// Consumes catalog events and persists an audit record per message.
///
/// The consumer subscribes from the point of subscription onward, not from
/// the beginning of topic history. Message handling never propagates an
/// error into the run loop: a stalled consumer would block every later
/// audit entry, so failures are logged and the message is skipped.
pub struct AuditLogConsumer<S: AuditStore> {
    store: S,
}

impl<S: AuditStore> AuditLogConsumer<S> {
    /// Creates a new consumer over the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Subscribes to the catalog topics and processes messages until the
    /// bus shuts down.
    #[tracing::instrument(skip(self, bus))]
    pub async fn run(self, bus: Arc<dyn MessageBus>) -> Result<()> {
        let mut subscription = bus
            .subscribe(&[PRODUCT_EVENTS_TOPIC, CATEGORY_EVENTS_TOPIC], false)
            .await?;
        tracing::info!("audit consumer subscribed");

        while let Some(message) = subscription.recv().await {
            self.handle_message(&message).await;
        }

        tracing::info!("audit consumer stopped, bus closed");
        Ok(())
    }

    /// Processes one message, swallowing failures.
    pub async fn handle_message(&self, message: &InboundMessage) {
        match self.process(message).await {
            Ok(record) => {
                tracing::debug!(
                    event_type = %record.event_type,
                    aggregate_id = %record.aggregate_id,
                    entity_type = %record.entity_type,
                    "audit record written"
                );
                metrics::counter!("audit_records_written_total").increment(1);
            }
            Err(error) => {
                tracing::error!(
                    %error,
                    topic = %message.topic,
                    key = %message.key,
                    "failed to process audit message, skipping"
                );
                metrics::counter!("audit_records_failed_total").increment(1);
            }
        }
    }

    async fn process(&self, message: &InboundMessage) -> Result<AuditRecord> {
        let envelope: EventMessage = serde_json::from_slice(&message.payload)?;
        let record = AuditRecord::from_envelope(&envelope);
        self.store.record(record.clone()).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryAuditStore;
    use crate::record::EntityType;
    use chrono::Utc;
    use messaging::{InMemoryBroker, MessageHeaders};

    fn envelope_bytes(event_type: &str, aggregate_id: &str) -> Vec<u8> {
        let envelope = EventMessage {
            event_id: format!("{aggregate_id}-{}", Utc::now().timestamp_millis()),
            event_type: event_type.to_string(),
            aggregate_id: aggregate_id.to_string(),
            occurred_at: Utc::now(),
            data: serde_json::json!({"name": "Laptop"}),
        };
        serde_json::to_vec(&envelope).unwrap()
    }

    async fn settle() {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn consumes_and_classifies_events() {
        let broker = Arc::new(InMemoryBroker::new());
        let store = InMemoryAuditStore::new();
        let consumer = AuditLogConsumer::new(store.clone());

        let bus: Arc<dyn MessageBus> = broker.clone();
        let handle = tokio::spawn(consumer.run(bus));

        // Give the consumer a moment to subscribe before publishing.
        settle().await;

        broker
            .send(
                PRODUCT_EVENTS_TOPIC,
                "p-1",
                envelope_bytes("PRODUCT_CREATED", "p-1"),
                MessageHeaders::new(),
            )
            .await
            .unwrap();
        broker
            .send(
                CATEGORY_EVENTS_TOPIC,
                "c-1",
                envelope_bytes("CATEGORY_CREATED", "c-1"),
                MessageHeaders::new(),
            )
            .await
            .unwrap();
        settle().await;

        let records = store.all().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].entity_type, EntityType::Product);
        assert_eq!(records[1].entity_type, EntityType::Category);

        handle.abort();
    }

    #[tokio::test]
    async fn malformed_message_is_skipped_without_stalling() {
        let store = InMemoryAuditStore::new();
        let consumer = AuditLogConsumer::new(store.clone());

        let bad = InboundMessage {
            topic: PRODUCT_EVENTS_TOPIC.to_string(),
            partition: 0,
            key: "p-1".to_string(),
            payload: b"not json".to_vec(),
            headers: MessageHeaders::new(),
        };
        consumer.handle_message(&bad).await;
        assert_eq!(store.count().await.unwrap(), 0);

        let good = InboundMessage {
            topic: PRODUCT_EVENTS_TOPIC.to_string(),
            partition: 0,
            key: "p-1".to_string(),
            payload: envelope_bytes("PRODUCT_ACTIVATED", "p-1"),
            headers: MessageHeaders::new(),
        };
        consumer.handle_message(&good).await;
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn subscription_starts_at_current_position() {
        let broker = Arc::new(InMemoryBroker::new());

        // Published before the consumer subscribes; must not be audited.
        broker
            .send(
                PRODUCT_EVENTS_TOPIC,
                "p-0",
                envelope_bytes("PRODUCT_CREATED", "p-0"),
                MessageHeaders::new(),
            )
            .await
            .unwrap();

        let store = InMemoryAuditStore::new();
        let consumer = AuditLogConsumer::new(store.clone());
        let bus: Arc<dyn MessageBus> = broker.clone();
        let handle = tokio::spawn(consumer.run(bus));
        settle().await;

        broker
            .send(
                PRODUCT_EVENTS_TOPIC,
                "p-1",
                envelope_bytes("PRODUCT_CREATED", "p-1"),
                MessageHeaders::new(),
            )
            .await
            .unwrap();
        settle().await;

        let records = store.all().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].aggregate_id, "p-1");

        handle.abort();
    }
}
