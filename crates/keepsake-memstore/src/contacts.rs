//! In-memory contact directory.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use keepsake_core::contacts::ContactDirectory;
use keepsake_core::id::UserId;

/// A contact directory backed by a shared set of keep pairs. Cheap to
/// clone; every clone sees the same relationships.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactDirectory {
    // Pairs are stored ordered, so each relationship occupies one slot.
    keeps: Arc<RwLock<HashSet<(UserId, UserId)>>>,
}

impl InMemoryContactDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `left` and `right` keep each other.
    pub fn add_keep(&self, left: &UserId, right: &UserId) {
        self.keeps
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(ordered(left.clone(), right.clone()));
    }
}

impl ContactDirectory for InMemoryContactDirectory {
    fn is_mutual_keep(&self, left: &UserId, right: &UserId) -> bool {
        if left == right {
            // A user always keeps themselves ("future self" releases).
            return true;
        }
        self.keeps
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(&ordered(left.clone(), right.clone()))
    }
}

fn ordered(a: UserId, b: UserId) -> (UserId, UserId) {
    if a <= b { (a, b) } else { (b, a) }
}
