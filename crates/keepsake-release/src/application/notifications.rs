//! Notification reactors for the Release context.
//!
//! Invoked by the bus during event fan-out; a delivery failure here is
//! isolated to this reactor and never reaches the command's caller.
//! Message templating is an external collaborator's concern — the bodies
//! here are deliberately plain.

use keepsake_core::error::DomainError;
use keepsake_core::notification::NotificationSender;

use crate::domain::events::{ReleaseCancelled, ReleaseTriggered};

/// Tells every receiver that assets have been released to them.
///
/// # Errors
///
/// Propagates the first delivery failure.
pub fn notify_receivers_of_release(
    event: &ReleaseTriggered,
    notifications: &dyn NotificationSender,
) -> Result<(), DomainError> {
    let body = format!(
        "{} released {} asset(s) to you (release {}).",
        event.owner,
        event.asset_ids.len(),
        event.release_id
    );
    for receiver in &event.receivers {
        notifications.send(receiver.as_str(), "Assets released to you", &body)?;
    }
    Ok(())
}

/// Tells the owner that their release was cancelled, with the reason when
/// one was recorded.
///
/// # Errors
///
/// Propagates a delivery failure.
pub fn notify_owner_of_cancellation(
    event: &ReleaseCancelled,
    notifications: &dyn NotificationSender,
) -> Result<(), DomainError> {
    let body = match &event.reason {
        Some(reason) => format!("Release {} was cancelled: {reason}", event.release_id),
        None => format!("Release {} was cancelled.", event.release_id),
    };
    notifications.send(event.owner.as_str(), "Release cancelled", &body)
}
