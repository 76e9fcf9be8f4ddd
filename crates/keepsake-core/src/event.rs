//! Domain event abstractions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Application tag stamped onto every event produced by this system.
pub const APPLICATION: &str = "keepsake";

/// Metadata attached to every domain event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Aggregate this event belongs to (opaque string id).
    pub aggregate_id: String,
    /// Correlation ID tracing the event back to the command that caused it.
    pub correlation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
    /// Originating application tag.
    pub application: String,
}

impl EventMetadata {
    /// Creates metadata for a new event with a fresh event id.
    #[must_use]
    pub fn new(aggregate_id: String, correlation_id: Uuid, occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            aggregate_id,
            correlation_id,
            occurred_at,
            application: APPLICATION.to_owned(),
        }
    }

    /// The event timestamp as epoch milliseconds, the form outer transports
    /// carry it in.
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.occurred_at.timestamp_millis()
    }
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (used for serialization routing).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}
