//! Repository abstraction.
//!
//! A repository instance belongs to exactly one unit of work. Besides the
//! usual CRUD surface it tracks the set of aggregate ids touched during the
//! active transaction (the "seen" set) so that pending domain events can be
//! harvested at commit without manual bookkeeping by callers.
//! Aggregate-specific queries live on the concrete backend types.

use crate::aggregate::AggregateRoot;
use crate::error::DomainError;

/// Repository contract for one aggregate type.
///
/// `create`, `update` and `find_by_id(s)` all mark the touched aggregate as
/// seen. Writes are staged until [`Repository::flush`]; `discard` drops the
/// staged writes, giving the owning unit of work its rollback path.
pub trait Repository<A: AggregateRoot>: Send {
    /// Stages a brand-new aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicateAggregate`] if an aggregate with the
    /// same id already exists (persisted or staged).
    fn create(&mut self, aggregate: A) -> Result<(), DomainError>;

    /// Stages an updated copy of an existing aggregate.
    ///
    /// # Errors
    ///
    /// Returns a backend-specific error if the write cannot be staged.
    fn update(&mut self, aggregate: A) -> Result<(), DomainError>;

    /// Fetches one aggregate for mutation, marking it seen.
    ///
    /// # Errors
    ///
    /// Returns a backend-specific error if the lookup fails; a missing
    /// aggregate is `Ok(None)`, not an error.
    fn find_by_id(&mut self, id: &A::Id) -> Result<Option<A>, DomainError>;

    /// Fetches several aggregates for mutation; ids with no match are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns a backend-specific error if the lookup fails.
    fn find_by_ids(&mut self, ids: &[A::Id]) -> Result<Vec<A>, DomainError>;

    /// Ids of every aggregate created, updated or fetched during the
    /// active transaction.
    fn seen(&self) -> Vec<A::Id>;

    /// Drains the pending events of every staged aggregate. Each event is
    /// yielded exactly once across the lifetime of the transaction.
    fn harvest_pending_events(&mut self) -> Vec<A::Event>;

    /// Persists the staged writes to the backing store and clears the
    /// transaction state.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Infrastructure`] if persistence fails; the
    /// error propagates uncaught to the command's caller.
    fn flush(&mut self) -> Result<(), DomainError>;

    /// Drops the staged writes and clears the transaction state.
    fn discard(&mut self);
}
