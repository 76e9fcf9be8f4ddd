//! Aggregate roots for the Release context.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use keepsake_core::aggregate::{AggregateRoot, FieldTimestamps, ensure_not_frozen};
use keepsake_core::error::DomainError;
use keepsake_core::event::EventMetadata;
use keepsake_core::id::{AssetId, ReleaseId, UserId};
use keepsake_core::lifecycle::LifecycleState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::commands::ScheduleRelease;
use super::conditions::ReleaseCondition;
use super::events::{ReleaseCancelled, ReleaseEvent, ReleaseEventKind, ReleaseScheduled, ReleaseTriggered};

/// What kind of release the owner scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseKind {
    /// Opens at a future instant, optionally at a place.
    TimeCapsule,
    /// Geo-gated: receivers must guess the location.
    HideAndSeek,
    /// Transfers as soon as it is triggered.
    Immediate,
    /// A note scheduled back to the owner themselves.
    FutureSelf,
}

/// How ownership passes when the release triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BequestKind {
    /// A gift between living users.
    Gift,
    /// Part of an estate hand-over.
    Inheritance,
}

/// Mutable fields of an [`AssetRelease`], keyed for the per-field
/// last-write-wins clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseField {
    /// Display name.
    Name,
    /// Free-form description.
    Description,
    /// Lifecycle state.
    State,
}

/// A single admissible write to an [`AssetRelease`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseChange {
    /// Replace the display name.
    Name(String),
    /// Replace the description.
    Description(String),
    /// Move the lifecycle state.
    State(LifecycleState),
}

impl ReleaseChange {
    fn field(&self) -> ReleaseField {
        match self {
            Self::Name(_) => ReleaseField::Name,
            Self::Description(_) => ReleaseField::Description,
            Self::State(_) => ReleaseField::State,
        }
    }
}

/// The aggregate root for a scheduled conditional release.
///
/// Created `Active`; moves to `Inactive` when it triggers ("released") or
/// `Removed` when cancelled or declined. Both are final: a past release
/// can never be reopened.
#[derive(Debug, Clone)]
pub struct AssetRelease {
    id: ReleaseId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// The scheduling owner.
    pub owner: UserId,
    /// The designated receivers. Never empty.
    pub receivers: BTreeSet<UserId>,
    /// The assets held by the release. Never empty.
    pub asset_ids: Vec<AssetId>,
    /// Ordered trigger conditions; the trigger predicate is their AND.
    pub conditions: Vec<ReleaseCondition>,
    /// What kind of release this is.
    pub release_kind: ReleaseKind,
    /// How ownership passes on trigger.
    pub bequest_kind: BequestKind,
    state: LifecycleState,
    created_at: DateTime<Utc>,
    field_timestamps: FieldTimestamps<ReleaseField>,
    pending_events: Vec<ReleaseEvent>,
}

impl AssetRelease {
    /// Schedules a new release from the command's parameters, emitting a
    /// `ReleaseScheduled` event carrying the full condition snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when the name is blank or the
    /// receiver/asset lists are empty.
    pub fn schedule(command: &ScheduleRelease) -> Result<Self, DomainError> {
        if command.name.trim().is_empty() {
            return Err(DomainError::Validation("release name must not be empty".into()));
        }
        if command.receivers.is_empty() {
            return Err(DomainError::Validation(
                "release must have at least one receiver".into(),
            ));
        }
        if command.asset_ids.is_empty() {
            return Err(DomainError::Validation(
                "release must hold at least one asset".into(),
            ));
        }

        let mut release = Self {
            id: command.release_id.clone(),
            name: command.name.clone(),
            description: command.description.clone(),
            owner: command.owner.clone(),
            receivers: command.receivers.clone(),
            asset_ids: command.asset_ids.clone(),
            conditions: command.conditions.clone(),
            release_kind: command.release_kind,
            bequest_kind: command.bequest_kind,
            state: LifecycleState::Active,
            created_at: command.issued_at,
            field_timestamps: FieldTimestamps::new(command.issued_at),
            pending_events: Vec::new(),
        };

        release.record_event(
            ReleaseEventKind::Scheduled(ReleaseScheduled {
                release_id: release.id.clone(),
                owner: release.owner.clone(),
                receivers: release.receivers.clone(),
                asset_ids: release.asset_ids.clone(),
                conditions: release.conditions.clone(),
                release_kind: release.release_kind,
                bequest_kind: release.bequest_kind,
            }),
            command.correlation_id,
            command.issued_at,
        );

        Ok(release)
    }

    /// The release identifier.
    #[must_use]
    pub fn release_id(&self) -> &ReleaseId {
        &self.id
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Whether the release has already triggered or been cancelled.
    #[must_use]
    pub fn is_past(&self) -> bool {
        self.state.is_final()
    }

    /// Whether every condition is met at `now` with the given guess.
    /// An empty condition list always triggers.
    #[must_use]
    pub fn can_trigger(&self, now: DateTime<Utc>, location_guess: Option<&str>) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.is_met(now, location_guess))
    }

    /// Triggers the release: the state moves to `Inactive` ("released",
    /// final) and a `ReleaseTriggered` event is emitted.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::FrozenAggregate`] when the release is past,
    /// [`DomainError::RuleViolation`] when its conditions are not met or
    /// the trigger timestamp is older than the last state write.
    pub fn release(
        &mut self,
        now: DateTime<Utc>,
        location_guess: Option<&str>,
        correlation_id: Uuid,
    ) -> Result<(), DomainError> {
        ensure_not_frozen(self.id.as_str(), self.state)?;
        if !self.can_trigger(now, location_guess) {
            return Err(DomainError::RuleViolation(format!(
                "release {} conditions are not met",
                self.id
            )));
        }

        let applied = self.update_field(now, ReleaseChange::State(LifecycleState::Inactive))?;
        if !applied {
            return Err(DomainError::RuleViolation(format!(
                "release {} received a stale trigger",
                self.id
            )));
        }

        self.record_event(
            ReleaseEventKind::Triggered(ReleaseTriggered {
                release_id: self.id.clone(),
                owner: self.owner.clone(),
                receivers: self.receivers.clone(),
                asset_ids: self.asset_ids.clone(),
            }),
            correlation_id,
            now,
        );
        Ok(())
    }

    /// Cancels the release: the state moves to `Removed` (final) and a
    /// `ReleaseCancelled` event is emitted with the given reason.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::FrozenAggregate`] when the release is
    /// already past, [`DomainError::RuleViolation`] on a stale timestamp.
    pub fn cancel(
        &mut self,
        now: DateTime<Utc>,
        reason: Option<String>,
        correlation_id: Uuid,
    ) -> Result<(), DomainError> {
        let applied = self.update_field(now, ReleaseChange::State(LifecycleState::Removed))?;
        if !applied {
            return Err(DomainError::RuleViolation(format!(
                "release {} received a stale cancellation",
                self.id
            )));
        }

        self.record_event(
            ReleaseEventKind::Cancelled(ReleaseCancelled {
                release_id: self.id.clone(),
                owner: self.owner.clone(),
                asset_ids: self.asset_ids.clone(),
                reason,
            }),
            correlation_id,
            now,
        );
        Ok(())
    }

    /// Applies a single timestamped field write under the last-write-wins
    /// rule. Returns whether the field's value actually changed: writes
    /// older than the field's recorded timestamp are silently dropped, and
    /// re-applying an identical value reports no change.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::FrozenAggregate`] when the release is past.
    pub fn update_field(
        &mut self,
        mod_ts: DateTime<Utc>,
        change: ReleaseChange,
    ) -> Result<bool, DomainError> {
        ensure_not_frozen(self.id.as_str(), self.state)?;

        let field = change.field();
        if !self.field_timestamps.admits(field, mod_ts) {
            return Ok(false);
        }

        let changed = match change {
            ReleaseChange::Name(name) => replace(&mut self.name, name),
            ReleaseChange::Description(description) => replace(&mut self.description, description),
            ReleaseChange::State(state) => replace(&mut self.state, state),
        };
        self.field_timestamps.record(field, mod_ts);
        Ok(changed)
    }

    /// Applies several field writes under one timestamp. State writes go
    /// through a dedicated final branch so that sibling fields land before
    /// the aggregate can freeze itself.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::FrozenAggregate`] when the release is past.
    pub fn update_fields(
        &mut self,
        mod_ts: DateTime<Utc>,
        changes: Vec<ReleaseChange>,
    ) -> Result<bool, DomainError> {
        let mut state_change = None;
        let mut any_changed = false;
        for change in changes {
            if let ReleaseChange::State(state) = change {
                state_change = Some(state);
            } else {
                any_changed |= self.update_field(mod_ts, change)?;
            }
        }
        if let Some(state) = state_change {
            any_changed |= self.update_field(mod_ts, ReleaseChange::State(state))?;
        }
        Ok(any_changed)
    }

    fn record_event(&mut self, kind: ReleaseEventKind, correlation_id: Uuid, occurred_at: DateTime<Utc>) {
        self.pending_events.push(ReleaseEvent {
            metadata: EventMetadata::new(self.id.to_string(), correlation_id, occurred_at),
            kind,
        });
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl AggregateRoot for AssetRelease {
    type Id = ReleaseId;
    type Event = ReleaseEvent;

    fn id(&self) -> &ReleaseId {
        &self.id
    }

    fn lifecycle(&self) -> LifecycleState {
        self.state
    }

    fn take_pending_events(&mut self) -> Vec<ReleaseEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
