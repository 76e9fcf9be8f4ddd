//! Generic staging repository over a shared in-memory map.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use keepsake_core::aggregate::AggregateRoot;
use keepsake_core::error::DomainError;
use keepsake_core::repository::Repository;

/// The shared backing map for one aggregate type. Cheap to clone; every
/// clone sees the same data. Hand each request-scoped unit of work a fresh
/// [`InMemoryRepository`] over a clone of this store.
#[derive(Debug)]
pub struct InMemoryStore<A: AggregateRoot> {
    items: Arc<RwLock<BTreeMap<A::Id, A>>>,
}

impl<A: AggregateRoot> Clone for InMemoryStore<A> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<A: AggregateRoot + Clone> Default for InMemoryStore<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AggregateRoot + Clone> InMemoryStore<A> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Opens a fresh repository (empty staging area) over this store.
    #[must_use]
    pub fn repository(&self) -> InMemoryRepository<A> {
        InMemoryRepository {
            store: self.clone(),
            staged: BTreeMap::new(),
            seen: BTreeSet::new(),
        }
    }

    /// Reads one aggregate directly from the committed state, bypassing
    /// any transaction. Intended for assertions and outer-layer queries.
    #[must_use]
    pub fn get(&self, id: &A::Id) -> Option<A> {
        self.items.read().ok()?.get(id).cloned()
    }

    fn poisoned() -> DomainError {
        DomainError::Infrastructure("in-memory store lock poisoned".into())
    }
}

/// A staging repository bound to one unit of work.
///
/// Writes land in a private staging map and only reach the shared store on
/// [`Repository::flush`]; [`Repository::discard`] drops them. The staging
/// map is ordered by id so multi-aggregate commits harvest events
/// deterministically.
#[derive(Debug)]
pub struct InMemoryRepository<A: AggregateRoot> {
    store: InMemoryStore<A>,
    staged: BTreeMap<A::Id, A>,
    seen: BTreeSet<A::Id>,
}

impl<A: AggregateRoot + Clone> InMemoryRepository<A> {
    pub(crate) fn overlay_get(&self, id: &A::Id) -> Result<Option<A>, DomainError> {
        if let Some(staged) = self.staged.get(id) {
            return Ok(Some(staged.clone()));
        }
        let items = self
            .store
            .items
            .read()
            .map_err(|_| InMemoryStore::<A>::poisoned())?;
        Ok(items.get(id).cloned())
    }

    pub(crate) fn overlay_values(&self) -> Result<Vec<A>, DomainError> {
        let items = self
            .store
            .items
            .read()
            .map_err(|_| InMemoryStore::<A>::poisoned())?;
        let mut values: BTreeMap<A::Id, A> = items.clone();
        for (id, staged) in &self.staged {
            values.insert(id.clone(), staged.clone());
        }
        Ok(values.into_values().collect())
    }
}

impl<A: AggregateRoot + Clone> Repository<A> for InMemoryRepository<A> {
    fn create(&mut self, aggregate: A) -> Result<(), DomainError> {
        let id = aggregate.id().clone();
        if self.overlay_get(&id)?.is_some() {
            return Err(DomainError::DuplicateAggregate(id.to_string()));
        }
        self.seen.insert(id.clone());
        self.staged.insert(id, aggregate);
        Ok(())
    }

    fn update(&mut self, aggregate: A) -> Result<(), DomainError> {
        let id = aggregate.id().clone();
        self.seen.insert(id.clone());
        self.staged.insert(id, aggregate);
        Ok(())
    }

    fn find_by_id(&mut self, id: &A::Id) -> Result<Option<A>, DomainError> {
        let found = self.overlay_get(id)?;
        if found.is_some() {
            self.seen.insert(id.clone());
        }
        Ok(found)
    }

    fn find_by_ids(&mut self, ids: &[A::Id]) -> Result<Vec<A>, DomainError> {
        let mut found = Vec::new();
        for id in ids {
            if let Some(aggregate) = self.find_by_id(id)? {
                found.push(aggregate);
            }
        }
        Ok(found)
    }

    fn seen(&self) -> Vec<A::Id> {
        self.seen.iter().cloned().collect()
    }

    fn harvest_pending_events(&mut self) -> Vec<A::Event> {
        self.staged
            .values_mut()
            .flat_map(A::take_pending_events)
            .collect()
    }

    fn flush(&mut self) -> Result<(), DomainError> {
        let mut items = self
            .store
            .items
            .write()
            .map_err(|_| InMemoryStore::<A>::poisoned())?;
        let staged = std::mem::take(&mut self.staged);
        tracing::debug!(count = staged.len(), "flushing staged aggregates");
        for (id, aggregate) in staged {
            items.insert(id, aggregate);
        }
        self.seen.clear();
        Ok(())
    }

    fn discard(&mut self) {
        self.staged.clear();
        self.seen.clear();
    }
}
