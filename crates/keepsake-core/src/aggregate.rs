//! Aggregate root abstraction and the per-field last-write-wins machinery.
//!
//! Aggregates are mutated by independent, possibly out-of-order event
//! reactors. Instead of locks or vector clocks, every mutable field carries
//! the timestamp of its last applied write; an incoming write is admitted
//! only if its modification timestamp is not older than the recorded one.
//! Convergence is per field — there is no cross-field atomicity.

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::event::DomainEvent;
use crate::lifecycle::LifecycleState;

/// Trait for aggregate roots.
pub trait AggregateRoot: Send + Sync {
    /// The typed identifier for this aggregate kind.
    type Id: Clone + Eq + Ord + Hash + Send + Sync + core::fmt::Display;

    /// The event type this aggregate produces.
    type Event: DomainEvent + Clone;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Returns the current lifecycle state.
    fn lifecycle(&self) -> LifecycleState;

    /// Drains the pending domain events accumulated since the last harvest.
    /// Each event is yielded exactly once.
    fn take_pending_events(&mut self) -> Vec<Self::Event>;
}

/// Per-field last-applied timestamps for one aggregate.
///
/// A field with no recorded write defaults to the aggregate's creation
/// timestamp, so writes older than the aggregate itself are dropped.
#[derive(Debug, Clone)]
pub struct FieldTimestamps<F> {
    created_at: DateTime<Utc>,
    applied: HashMap<F, DateTime<Utc>>,
}

impl<F: Copy + Eq + Hash> FieldTimestamps<F> {
    /// Creates the timestamp map for an aggregate created at `created_at`.
    #[must_use]
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            created_at,
            applied: HashMap::new(),
        }
    }

    /// The timestamp of the last applied write for `field`.
    #[must_use]
    pub fn last_applied(&self, field: F) -> DateTime<Utc> {
        self.applied.get(&field).copied().unwrap_or(self.created_at)
    }

    /// Whether a write stamped `mod_ts` is admissible for `field`.
    /// Writes at the exact recorded timestamp are admitted.
    #[must_use]
    pub fn admits(&self, field: F, mod_ts: DateTime<Utc>) -> bool {
        mod_ts >= self.last_applied(field)
    }

    /// Records an applied write. The recorded timestamp is monotonic: an
    /// older `mod_ts` never overwrites a newer one.
    pub fn record(&mut self, field: F, mod_ts: DateTime<Utc>) {
        let entry = self.applied.entry(field).or_insert(self.created_at);
        if mod_ts >= *entry {
            *entry = mod_ts;
        }
    }
}

/// Guard shared by every `update_field` implementation: mutating an
/// aggregate in a final state is an error, never a silent drop.
///
/// # Errors
///
/// Returns [`DomainError::FrozenAggregate`] when `state` is final.
pub fn ensure_not_frozen(aggregate_id: &str, state: LifecycleState) -> Result<(), DomainError> {
    if state.is_final() {
        return Err(DomainError::FrozenAggregate {
            aggregate_id: aggregate_id.to_owned(),
            state,
        });
    }
    Ok(())
}
