//! Outbound notification port.

use crate::error::DomainError;

/// Port for delivering user-facing notifications.
///
/// Used by event reactors only, never by the bus itself. Delivery must be
/// non-blocking from the engine's point of view; queueing or batching is
/// the implementation's concern.
pub trait NotificationSender: Send + Sync {
    /// Sends one notification.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Infrastructure`] if delivery fails; the bus
    /// isolates the failure to the reacting handler.
    fn send(&self, destination: &str, subject: &str, body: &str) -> Result<(), DomainError>;
}

/// Sender that logs instead of delivering. The default wiring until an
/// outer layer plugs in a real transport.
#[derive(Debug, Clone, Copy)]
pub struct LoggingNotificationSender;

impl NotificationSender for LoggingNotificationSender {
    fn send(&self, destination: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        tracing::info!(destination, subject, body, "notification");
        Ok(())
    }
}
