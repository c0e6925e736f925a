//! Message bus abstraction for the catalog service.
//!
//! Commands that mutate the catalog publish domain events through an
//! [`EventPublisher`], which wraps a pluggable [`MessageBus`]. The bus
//! delivers messages to topic subscribers; [`InMemoryBroker`] provides a
//! broker with retained logs for tests and local development.

pub mod bus;
pub mod error;
pub mod memory;
pub mod message;
pub mod publisher;
pub mod retry;
pub mod topic;

pub use bus::{InboundMessage, MessageBus, MessageHeaders, Subscription};
pub use error::{BusError, Result};
pub use memory::InMemoryBroker;
pub use message::{DomainEvent, EventMessage, header};
pub use publisher::EventPublisher;
pub use retry::RetryPolicy;
pub use topic::{
    CATEGORY_EVENTS_TOPIC, DEFAULT_EVENTS_TOPIC, PRODUCT_EVENTS_TOPIC, route_for_event_type,
};
