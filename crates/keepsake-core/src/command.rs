//! Command abstractions.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Trait that all commands implement.
///
/// Commands are immutable instructions; the timestamp recorded at
/// construction is the modification timestamp stamped onto every field
/// write and event the command produces.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;

    /// The instant the command was constructed.
    fn issued_at(&self) -> DateTime<Utc>;
}
