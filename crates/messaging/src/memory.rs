//! In-memory broker for testing and local development.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, mpsc};

use crate::bus::{InboundMessage, MessageBus, MessageHeaders, Subscription};
use crate::{BusError, Result};

const DEFAULT_PARTITIONS: u32 = 3;

struct Subscriber {
    topics: Vec<String>,
    sender: mpsc::UnboundedSender<InboundMessage>,
}

#[derive(Default)]
struct BrokerState {
    /// Retained messages per topic, in publication order.
    log: HashMap<String, Vec<InboundMessage>>,
    subscribers: Vec<Subscriber>,
}

/// An in-process broker with retained per-topic logs.
///
/// Every published message is appended to the topic log and fanned out to
/// all live subscribers of that topic. Subscribing with `from_beginning`
/// replays the retained log before live delivery begins.
#[derive(Clone)]
pub struct InMemoryBroker {
    state: Arc<RwLock<BrokerState>>,
    partitions: u32,
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBroker {
    /// Creates a broker with the default partition count.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(BrokerState::default())),
            partitions: DEFAULT_PARTITIONS,
        }
    }

    /// Returns the number of retained messages on a topic.
    pub async fn message_count(&self, topic: &str) -> usize {
        self.state
            .read()
            .await
            .log
            .get(topic)
            .map_or(0, Vec::len)
    }

    /// Returns a copy of the retained log for a topic.
    pub async fn retained(&self, topic: &str) -> Vec<InboundMessage> {
        self.state
            .read()
            .await
            .log
            .get(topic)
            .cloned()
            .unwrap_or_default()
    }

    fn partition_for(&self, key: &str) -> u32 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() % u64::from(self.partitions)) as u32
    }
}

#[async_trait]
impl MessageBus for InMemoryBroker {
    async fn send(
        &self,
        topic: &str,
        key: &str,
        payload: Vec<u8>,
        headers: MessageHeaders,
    ) -> Result<()> {
        let message = InboundMessage {
            topic: topic.to_string(),
            partition: self.partition_for(key),
            key: key.to_string(),
            payload,
            headers,
        };

        let mut state = self.state.write().await;
        state
            .log
            .entry(topic.to_string())
            .or_default()
            .push(message.clone());

        // Drop subscribers whose receiving end is gone.
        state.subscribers.retain(|subscriber| {
            if !subscriber.topics.iter().any(|t| t == topic) {
                return true;
            }
            subscriber.sender.send(message.clone()).is_ok()
        });

        Ok(())
    }

    async fn subscribe(&self, topics: &[&str], from_beginning: bool) -> Result<Subscription> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut state = self.state.write().await;

        if from_beginning {
            for topic in topics {
                if let Some(retained) = state.log.get(*topic) {
                    for message in retained {
                        sender.send(message.clone()).map_err(|_| {
                            BusError::Delivery {
                                topic: (*topic).to_string(),
                                reason: "subscriber channel closed during replay".to_string(),
                            }
                        })?;
                    }
                }
            }
        }

        state.subscribers.push(Subscriber {
            topics: topics.iter().map(|t| t.to_string()).collect(),
            sender,
        });

        Ok(Subscription::new(receiver))
    }
}
