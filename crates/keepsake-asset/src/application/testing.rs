//! Staging stub repository shared by the Asset application tests.

use std::collections::BTreeMap;

use keepsake_core::aggregate::AggregateRoot;
use keepsake_core::error::DomainError;
use keepsake_core::id::AssetId;
use keepsake_core::repository::Repository;

use crate::domain::aggregates::Asset;
use crate::domain::events::AssetEvent;

/// Minimal staging repository, just enough for handler and reactor tests.
#[derive(Default)]
pub(crate) struct StubAssetRepository {
    committed: BTreeMap<AssetId, Asset>,
    staged: BTreeMap<AssetId, Asset>,
}

impl Repository<Asset> for StubAssetRepository {
    fn create(&mut self, aggregate: Asset) -> Result<(), DomainError> {
        let id = aggregate.asset_id().clone();
        if self.committed.contains_key(&id) || self.staged.contains_key(&id) {
            return Err(DomainError::DuplicateAggregate(id.to_string()));
        }
        self.staged.insert(id, aggregate);
        Ok(())
    }

    fn update(&mut self, aggregate: Asset) -> Result<(), DomainError> {
        self.staged.insert(aggregate.asset_id().clone(), aggregate);
        Ok(())
    }

    fn find_by_id(&mut self, id: &AssetId) -> Result<Option<Asset>, DomainError> {
        Ok(self
            .staged
            .get(id)
            .or_else(|| self.committed.get(id))
            .cloned())
    }

    fn find_by_ids(&mut self, ids: &[AssetId]) -> Result<Vec<Asset>, DomainError> {
        let mut found = Vec::new();
        for id in ids {
            if let Some(asset) = self.find_by_id(id)? {
                found.push(asset);
            }
        }
        Ok(found)
    }

    fn seen(&self) -> Vec<AssetId> {
        self.staged.keys().cloned().collect()
    }

    fn harvest_pending_events(&mut self) -> Vec<AssetEvent> {
        self.staged
            .values_mut()
            .flat_map(Asset::take_pending_events)
            .collect()
    }

    fn flush(&mut self) -> Result<(), DomainError> {
        let staged = std::mem::take(&mut self.staged);
        self.committed.extend(staged);
        Ok(())
    }

    fn discard(&mut self) {
        self.staged.clear();
    }
}
