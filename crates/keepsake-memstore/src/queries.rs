//! Aggregate-specific queries on the in-memory repositories.
//!
//! Read-only: results are not marked seen and stage nothing.

use keepsake_asset::domain::aggregates::Asset;
use keepsake_core::error::DomainError;
use keepsake_core::id::UserId;
use keepsake_core::lifecycle::LifecycleState;
use keepsake_release::domain::aggregates::AssetRelease;

use crate::store::InMemoryRepository;

impl InMemoryRepository<Asset> {
    /// All assets owned by `owner`, staged state included.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Infrastructure`] if the store is poisoned.
    pub fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Asset>, DomainError> {
        Ok(self
            .overlay_values()?
            .into_iter()
            .filter(|asset| asset.owners.contains(owner))
            .collect())
    }
}

impl InMemoryRepository<AssetRelease> {
    /// All releases scheduled by `owner` that are still active.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Infrastructure`] if the store is poisoned.
    pub fn find_active_by_owner(&self, owner: &UserId) -> Result<Vec<AssetRelease>, DomainError> {
        Ok(self
            .overlay_values()?
            .into_iter()
            .filter(|release| release.owner == *owner && release.state() == LifecycleState::Active)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{TimeZone, Utc};
    use keepsake_asset::domain::commands::CreateAsset;
    use keepsake_core::id::AssetId;
    use keepsake_core::repository::Repository;
    use uuid::Uuid;

    use crate::store::InMemoryStore;

    use super::*;

    #[test]
    fn test_find_by_owner_sees_staged_and_committed_assets() {
        // Arrange
        let store = InMemoryStore::<Asset>::new();
        let mut repo = store.repository();
        let owner = UserId::from("u1");
        for (id, flush) in [("a1", true), ("a2", false)] {
            let asset = Asset::create(&CreateAsset {
                correlation_id: Uuid::new_v4(),
                issued_at: Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap(),
                asset_id: AssetId::from(id),
                owners: BTreeSet::from([owner.clone()]),
                title: "diary".to_owned(),
                description: String::new(),
            })
            .unwrap();
            repo.create(asset).unwrap();
            if flush {
                repo.flush().unwrap();
            }
        }

        // Act
        let owned = repo.find_by_owner(&owner).unwrap();

        // Assert
        assert_eq!(owned.len(), 2);
        assert!(repo.find_by_owner(&UserId::from("u9")).unwrap().is_empty());
    }
}
