//! Contact directory port.

use crate::id::UserId;

/// Port answering whether two users are mutual "keep" contacts.
///
/// A keep is a confirmed two-way contact relationship; automatic delivery
/// of released assets is gated on it so that assets are never handed to
/// unverified parties.
pub trait ContactDirectory: Send + Sync {
    /// Whether `left` and `right` keep each other.
    fn is_mutual_keep(&self, left: &UserId, right: &UserId) -> bool;
}
