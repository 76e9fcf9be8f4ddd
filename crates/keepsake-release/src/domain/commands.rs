//! Commands for the Release context.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use keepsake_core::command::Command;
use keepsake_core::id::{AssetId, ReleaseId, UserId};
use uuid::Uuid;

use super::aggregates::{BequestKind, ReleaseKind};
use super::conditions::ReleaseCondition;

/// Command to schedule a new conditional release.
#[derive(Debug, Clone)]
pub struct ScheduleRelease {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The instant the command was constructed.
    pub issued_at: DateTime<Utc>,
    /// Identifier for the new release.
    pub release_id: ReleaseId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// The scheduling owner.
    pub owner: UserId,
    /// The designated receivers.
    pub receivers: BTreeSet<UserId>,
    /// The assets the release holds.
    pub asset_ids: Vec<AssetId>,
    /// Ordered trigger conditions.
    pub conditions: Vec<ReleaseCondition>,
    /// What kind of release this is.
    pub release_kind: ReleaseKind,
    /// How ownership passes on trigger.
    pub bequest_kind: BequestKind,
}

impl Command for ScheduleRelease {
    fn command_type(&self) -> &'static str {
        "release.schedule"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// Command to trigger an active release.
#[derive(Debug, Clone)]
pub struct TriggerRelease {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The instant the command was constructed.
    pub issued_at: DateTime<Utc>,
    /// The release to trigger.
    pub release_id: ReleaseId,
    /// Caller-supplied guess for geographic conditions.
    pub location_guess: Option<String>,
}

impl Command for TriggerRelease {
    fn command_type(&self) -> &'static str {
        "release.trigger"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// Command to cancel an active release.
#[derive(Debug, Clone)]
pub struct CancelRelease {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The instant the command was constructed.
    pub issued_at: DateTime<Utc>,
    /// The release to cancel.
    pub release_id: ReleaseId,
    /// Optional reason recorded on the cancellation event.
    pub reason: Option<String>,
}

impl Command for CancelRelease {
    fn command_type(&self) -> &'static str {
        "release.cancel"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// Closed set of Release-context commands.
#[derive(Debug, Clone)]
pub enum ReleaseCommand {
    /// Schedule a new release.
    Schedule(ScheduleRelease),
    /// Trigger an active release.
    Trigger(TriggerRelease),
    /// Cancel an active release.
    Cancel(CancelRelease),
}

impl Command for ReleaseCommand {
    fn command_type(&self) -> &'static str {
        match self {
            Self::Schedule(c) => c.command_type(),
            Self::Trigger(c) => c.command_type(),
            Self::Cancel(c) => c.command_type(),
        }
    }

    fn correlation_id(&self) -> Uuid {
        match self {
            Self::Schedule(c) => c.correlation_id(),
            Self::Trigger(c) => c.correlation_id(),
            Self::Cancel(c) => c.correlation_id(),
        }
    }

    fn issued_at(&self) -> DateTime<Utc> {
        match self {
            Self::Schedule(c) => c.issued_at(),
            Self::Trigger(c) => c.issued_at(),
            Self::Cancel(c) => c.issued_at(),
        }
    }
}
