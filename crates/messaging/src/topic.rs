//! Topic names and event-type routing.

/// Topic carrying product lifecycle events, including category and
/// attribute association changes.
pub const PRODUCT_EVENTS_TOPIC: &str = "catalog.product.events";

/// Topic carrying category aggregate events.
pub const CATEGORY_EVENTS_TOPIC: &str = "catalog.category.events";

/// Fallback topic for event types with an unrecognized prefix.
pub const DEFAULT_EVENTS_TOPIC: &str = "catalog.events";

/// Maps an event type to the topic it is published on.
///
/// `CATEGORY_ADDED_TO_PRODUCT` and `CATEGORY_REMOVED_FROM_PRODUCT` describe
/// product state and go to the product topic despite their prefix. Anything
/// with an unrecognized prefix falls back to the default topic.
pub fn route_for_event_type(event_type: &str) -> &'static str {
    if event_type.starts_with("PRODUCT")
        || event_type.starts_with("ATTRIBUTE")
        || event_type.starts_with("CATEGORY_ADDED")
        || event_type.starts_with("CATEGORY_REMOVED")
    {
        PRODUCT_EVENTS_TOPIC
    } else if event_type.starts_with("CATEGORY") {
        CATEGORY_EVENTS_TOPIC
    } else {
        DEFAULT_EVENTS_TOPIC
    }
}
