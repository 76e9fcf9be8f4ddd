//! Test contact directories with a fixed answer.

use keepsake_core::contacts::ContactDirectory;
use keepsake_core::id::UserId;

/// A contact directory that gives the same answer for every pair. Use
/// `everyone()` when keep verification should pass and `nobody()` to drive
/// the fail-safe cancellation path.
#[derive(Debug, Clone, Copy)]
pub struct StaticContactDirectory {
    mutual: bool,
}

impl StaticContactDirectory {
    /// Every pair of users keeps each other.
    #[must_use]
    pub fn everyone() -> Self {
        Self { mutual: true }
    }

    /// No pair of users keeps each other.
    #[must_use]
    pub fn nobody() -> Self {
        Self { mutual: false }
    }
}

impl ContactDirectory for StaticContactDirectory {
    fn is_mutual_keep(&self, _left: &UserId, _right: &UserId) -> bool {
        self.mutual
    }
}
