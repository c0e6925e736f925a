//! Domain event publication.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::bus::{MessageBus, MessageHeaders};
use crate::message::{DomainEvent, EventMessage, header};
use crate::retry::RetryPolicy;
use crate::topic::route_for_event_type;
use crate::Result;

/// Publishes domain events to the message bus.
///
/// The publisher starts disconnected. While disconnected, publishing logs a
/// warning and succeeds without delivering anything, so command handling is
/// never blocked by a missing broker. Once connected, delivery failures are
/// retried with capped exponential backoff before surfacing an error.
pub struct EventPublisher {
    bus: RwLock<Option<Arc<dyn MessageBus>>>,
    retry: RetryPolicy,
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher {
    /// Creates a disconnected publisher with the default retry policy.
    pub fn new() -> Self {
        Self::with_retry(RetryPolicy::default())
    }

    /// Creates a disconnected publisher with a custom retry policy.
    pub fn with_retry(retry: RetryPolicy) -> Self {
        Self {
            bus: RwLock::new(None),
            retry,
        }
    }

    /// Attaches the publisher to a bus.
    pub async fn connect(&self, bus: Arc<dyn MessageBus>) {
        *self.bus.write().await = Some(bus);
        tracing::info!("event publisher connected");
    }

    /// Detaches the publisher from its bus.
    pub async fn disconnect(&self) {
        *self.bus.write().await = None;
        tracing::info!("event publisher disconnected");
    }

    /// Returns true if a bus is attached.
    pub async fn is_connected(&self) -> bool {
        self.bus.read().await.is_some()
    }

    /// Publishes a domain event to its topic, keyed by aggregate id.
    #[tracing::instrument(skip(self, event), fields(event_type = event.event_type()))]
    pub async fn publish<E: DomainEvent>(&self, event: &E) -> Result<()> {
        let message = EventMessage::from_event(event)?;

        let bus = self.bus.read().await.clone();
        let Some(bus) = bus else {
            tracing::warn!(
                event_type = %message.event_type,
                aggregate_id = %message.aggregate_id,
                "publisher not connected, event dropped"
            );
            metrics::counter!("catalog_events_dropped_total").increment(1);
            return Ok(());
        };

        let topic = route_for_event_type(&message.event_type);
        let payload = serde_json::to_vec(&message)?;
        let mut headers = MessageHeaders::new();
        headers.insert(header::CORRELATION_ID.to_string(), message.event_id.clone());
        headers.insert(header::EVENT_TYPE.to_string(), message.event_type.clone());

        let mut attempt: u32 = 0;
        loop {
            match bus
                .send(topic, &message.aggregate_id, payload.clone(), headers.clone())
                .await
            {
                Ok(()) => {
                    tracing::debug!(
                        event_id = %message.event_id,
                        topic,
                        "event published"
                    );
                    metrics::counter!("catalog_events_published_total", "topic" => topic)
                        .increment(1);
                    return Ok(());
                }
                Err(error) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    let delay = self.retry.backoff(attempt);
                    tracing::warn!(
                        %error,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "publish failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    tracing::error!(
                        %error,
                        event_id = %message.event_id,
                        topic,
                        "publish failed after retries"
                    );
                    metrics::counter!("catalog_events_publish_failures_total").increment(1);
                    return Err(error);
                }
            }
        }
    }
}
