//! The message bus port.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::Result;

/// Key/value message headers.
pub type MessageHeaders = HashMap<String, String>;

/// A message delivered to a subscriber.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: String,
    pub partition: u32,
    /// Partitioning key; the aggregate id for domain events.
    pub key: String,
    pub payload: Vec<u8>,
    pub headers: MessageHeaders,
}

/// A consumer's view of its subscribed topics.
///
/// Messages arrive in publication order per topic. The subscription ends
/// when the broker is dropped.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<InboundMessage>,
}

impl Subscription {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<InboundMessage>) -> Self {
        Self { receiver }
    }

    /// Waits for the next message. Returns `None` once the broker side is
    /// gone and all buffered messages have been consumed.
    pub async fn recv(&mut self) -> Option<InboundMessage> {
        self.receiver.recv().await
    }

    /// Returns the next message if one is already buffered.
    pub fn try_recv(&mut self) -> Option<InboundMessage> {
        self.receiver.try_recv().ok()
    }
}

/// Transport port for publishing and subscribing to topics.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publishes a message to a topic.
    async fn send(
        &self,
        topic: &str,
        key: &str,
        payload: Vec<u8>,
        headers: MessageHeaders,
    ) -> Result<()>;

    /// Subscribes to one or more topics. With `from_beginning` the broker
    /// first replays every retained message on those topics.
    async fn subscribe(&self, topics: &[&str], from_beginning: bool) -> Result<Subscription>;
}
