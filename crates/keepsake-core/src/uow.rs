//! Unit of Work — transaction scope over one aggregate type's repository.

use crate::aggregate::AggregateRoot;
use crate::error::DomainError;
use crate::repository::Repository;

/// A transaction-scoped handle binding exactly one repository instance.
///
/// Normal completion requires an explicit [`UnitOfWork::commit`]; the
/// message bus rolls back after every handler invocation, so staged writes
/// from a handler that returned early (or failed) never leak into the next
/// one. There is no atomicity across units of work: a business operation
/// spanning two aggregate types can observe a partial outcome if the
/// second commit fails.
pub struct UnitOfWork<A: AggregateRoot> {
    repo: Box<dyn Repository<A>>,
    new_events: Vec<A::Event>,
}

impl<A: AggregateRoot> UnitOfWork<A> {
    /// Binds a unit of work to one repository instance.
    #[must_use]
    pub fn new(repo: Box<dyn Repository<A>>) -> Self {
        Self {
            repo,
            new_events: Vec::new(),
        }
    }

    /// The bound repository.
    pub fn repo(&mut self) -> &mut dyn Repository<A> {
        self.repo.as_mut()
    }

    /// Harvests the pending events of every seen aggregate into the
    /// new-events buffer, then persists the staged writes.
    ///
    /// Events are buffered before the flush, so each is harvested exactly
    /// once even when persistence fails and the command is retried by an
    /// outer transport.
    ///
    /// # Errors
    ///
    /// Persistence failures propagate uncaught.
    pub fn commit(&mut self) -> Result<(), DomainError> {
        let harvested = self.repo.harvest_pending_events();
        self.new_events.extend(harvested);
        self.repo.flush()
    }

    /// Discards staged writes. The buffer of already-harvested events
    /// survives: those belong to previously committed work.
    pub fn rollback(&mut self) {
        self.repo.discard();
    }

    /// Drains the buffered events. Each event is yielded exactly once.
    pub fn collect_new_events(&mut self) -> Vec<A::Event> {
        std::mem::take(&mut self.new_events)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use crate::event::{DomainEvent, EventMetadata};
    use crate::id::AssetId;
    use crate::lifecycle::LifecycleState;

    use super::*;

    #[derive(Debug, Clone)]
    struct NoteEvent {
        metadata: EventMetadata,
        text: String,
    }

    impl DomainEvent for NoteEvent {
        fn event_type(&self) -> &'static str {
            "note.written"
        }

        fn to_payload(&self) -> serde_json::Value {
            serde_json::json!({ "text": self.text })
        }

        fn metadata(&self) -> &EventMetadata {
            &self.metadata
        }
    }

    #[derive(Debug, Clone)]
    struct Note {
        id: AssetId,
        pending: Vec<NoteEvent>,
    }

    impl Note {
        fn with_event(id: &str, text: &str) -> Self {
            let occurred_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
            let event = NoteEvent {
                metadata: EventMetadata::new(id.to_owned(), Uuid::new_v4(), occurred_at),
                text: text.to_owned(),
            };
            Self {
                id: AssetId::from(id),
                pending: vec![event],
            }
        }
    }

    impl AggregateRoot for Note {
        type Id = AssetId;
        type Event = NoteEvent;

        fn id(&self) -> &AssetId {
            &self.id
        }

        fn lifecycle(&self) -> LifecycleState {
            LifecycleState::Active
        }

        fn take_pending_events(&mut self) -> Vec<NoteEvent> {
            std::mem::take(&mut self.pending)
        }
    }

    /// Stages aggregates in a plain Vec; `fail_flush` simulates a backend
    /// persistence error.
    struct StubRepository {
        staged: Vec<Note>,
        fail_flush: bool,
    }

    impl StubRepository {
        fn new(fail_flush: bool) -> Self {
            Self {
                staged: Vec::new(),
                fail_flush,
            }
        }
    }

    impl Repository<Note> for StubRepository {
        fn create(&mut self, aggregate: Note) -> Result<(), DomainError> {
            self.staged.push(aggregate);
            Ok(())
        }

        fn update(&mut self, aggregate: Note) -> Result<(), DomainError> {
            self.staged.push(aggregate);
            Ok(())
        }

        fn find_by_id(&mut self, _id: &AssetId) -> Result<Option<Note>, DomainError> {
            Ok(None)
        }

        fn find_by_ids(&mut self, _ids: &[AssetId]) -> Result<Vec<Note>, DomainError> {
            Ok(Vec::new())
        }

        fn seen(&self) -> Vec<AssetId> {
            self.staged.iter().map(|n| n.id.clone()).collect()
        }

        fn harvest_pending_events(&mut self) -> Vec<NoteEvent> {
            self.staged
                .iter_mut()
                .flat_map(Note::take_pending_events)
                .collect()
        }

        fn flush(&mut self) -> Result<(), DomainError> {
            if self.fail_flush {
                return Err(DomainError::Infrastructure("disk full".into()));
            }
            self.staged.clear();
            Ok(())
        }

        fn discard(&mut self) {
            self.staged.clear();
        }
    }

    #[test]
    fn test_commit_harvests_each_pending_event_exactly_once() {
        // Arrange
        let mut uow = UnitOfWork::new(Box::new(StubRepository::new(false)));
        uow.repo().create(Note::with_event("n1", "hello")).unwrap();

        // Act
        uow.commit().unwrap();
        let first = uow.collect_new_events();
        let second = uow.collect_new_events();

        // Assert
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].text, "hello");
        assert!(second.is_empty());
    }

    #[test]
    fn test_flush_failure_propagates_and_keeps_harvested_events() {
        // Arrange
        let mut uow = UnitOfWork::new(Box::new(StubRepository::new(true)));
        uow.repo().create(Note::with_event("n1", "hello")).unwrap();

        // Act
        let result = uow.commit();

        // Assert
        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
        assert_eq!(uow.collect_new_events().len(), 1);
    }

    #[test]
    fn test_rollback_discards_staged_writes_without_harvesting() {
        // Arrange
        let mut uow = UnitOfWork::new(Box::new(StubRepository::new(false)));
        uow.repo().create(Note::with_event("n1", "hello")).unwrap();

        // Act
        uow.rollback();
        uow.commit().unwrap();

        // Assert
        assert!(uow.collect_new_events().is_empty());
        assert!(uow.repo().seen().is_empty());
    }
}
