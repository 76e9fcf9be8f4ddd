//! Domain error types.

use thiserror::Error;

use crate::lifecycle::LifecycleState;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(String),

    /// An aggregate with the same id already exists.
    #[error("duplicate aggregate: {0}")]
    DuplicateAggregate(String),

    /// A mutation was attempted on an aggregate in a final state.
    #[error("aggregate {aggregate_id} is {state} and can no longer be modified")]
    FrozenAggregate {
        /// The frozen aggregate.
        aggregate_id: String,
        /// The final state it is frozen in.
        state: LifecycleState,
    },

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// A domain rule was violated (e.g. triggering an unmet release).
    #[error("rule violation: {0}")]
    RuleViolation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
