//! Test repositories — failing `Repository` implementation for tests.

use std::marker::PhantomData;

use keepsake_core::aggregate::AggregateRoot;
use keepsake_core::error::DomainError;
use keepsake_core::repository::Repository;

/// A repository whose every fallible operation returns an infrastructure
/// error. Useful for testing the uncaught propagation of commit failures.
#[derive(Debug)]
pub struct FailingRepository<A> {
    _marker: PhantomData<fn() -> A>,
}

impl<A> Default for FailingRepository<A> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

fn refused() -> DomainError {
    DomainError::Infrastructure("connection refused".into())
}

impl<A: AggregateRoot> Repository<A> for FailingRepository<A> {
    fn create(&mut self, _aggregate: A) -> Result<(), DomainError> {
        Err(refused())
    }

    fn update(&mut self, _aggregate: A) -> Result<(), DomainError> {
        Err(refused())
    }

    fn find_by_id(&mut self, _id: &A::Id) -> Result<Option<A>, DomainError> {
        Err(refused())
    }

    fn find_by_ids(&mut self, _ids: &[A::Id]) -> Result<Vec<A>, DomainError> {
        Err(refused())
    }

    fn seen(&self) -> Vec<A::Id> {
        Vec::new()
    }

    fn harvest_pending_events(&mut self) -> Vec<A::Event> {
        Vec::new()
    }

    fn flush(&mut self) -> Result<(), DomainError> {
        Err(refused())
    }

    fn discard(&mut self) {}
}
