//! Test notification senders.

use std::sync::Mutex;

use keepsake_core::error::DomainError;
use keepsake_core::notification::NotificationSender;

/// One recorded notification.
#[derive(Debug, Clone)]
pub struct SentNotification {
    /// Where it was addressed.
    pub destination: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub body: String,
}

/// A sender that records every notification and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingNotificationSender {
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotificationSender {
    /// Returns a snapshot of everything sent so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationSender for RecordingNotificationSender {
    fn send(&self, destination: &str, subject: &str, body: &str) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(SentNotification {
            destination: destination.to_owned(),
            subject: subject.to_owned(),
            body: body.to_owned(),
        });
        Ok(())
    }
}

/// A sender that always fails with an infrastructure error. Useful for
/// testing reactor-failure isolation.
#[derive(Debug, Clone, Copy)]
pub struct FailingNotificationSender;

impl NotificationSender for FailingNotificationSender {
    fn send(&self, _destination: &str, _subject: &str, _body: &str) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("smtp connection refused".into()))
    }
}
