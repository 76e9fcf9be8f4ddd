//! Aggregate lifecycle states.

use serde::{Deserialize, Serialize};

/// Lifecycle state shared by every aggregate.
///
/// `Inactive` and `Removed` are final: an aggregate that reaches either can
/// never be mutated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// Fully usable.
    Active,
    /// Created but awaiting completion (e.g. an asset awaiting its file).
    Pending,
    /// Temporarily invisible to its owner (e.g. held by a pending release).
    Hidden,
    /// Completed its purpose (a "released" release). Final.
    Inactive,
    /// Deleted or cancelled. Final.
    Removed,
}

impl LifecycleState {
    /// Returns `true` for the terminal states, which freeze the aggregate.
    #[must_use]
    pub fn is_final(self) -> bool {
        matches!(self, Self::Inactive | Self::Removed)
    }
}

impl core::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Hidden => "hidden",
            Self::Inactive => "inactive",
            Self::Removed => "removed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_inactive_and_removed_are_final() {
        assert!(LifecycleState::Inactive.is_final());
        assert!(LifecycleState::Removed.is_final());
        assert!(!LifecycleState::Active.is_final());
        assert!(!LifecycleState::Pending.is_final());
        assert!(!LifecycleState::Hidden.is_final());
    }
}
