//! Domain events for the Release context.

use std::collections::BTreeSet;

use keepsake_core::event::{DomainEvent, EventMetadata};
use keepsake_core::id::{AssetId, ReleaseId, UserId};
use serde::{Deserialize, Serialize};

use super::aggregates::{BequestKind, ReleaseKind};
use super::conditions::ReleaseCondition;

/// Emitted when a release is scheduled. Carries a snapshot of every
/// condition parameter so downstream consumers never need to re-read the
/// aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseScheduled {
    /// The release identifier.
    pub release_id: ReleaseId,
    /// The scheduling owner.
    pub owner: UserId,
    /// The designated receivers.
    pub receivers: BTreeSet<UserId>,
    /// The assets held by the release.
    pub asset_ids: Vec<AssetId>,
    /// Snapshot of the ordered condition list.
    pub conditions: Vec<ReleaseCondition>,
    /// What kind of release this is.
    pub release_kind: ReleaseKind,
    /// How ownership passes on trigger.
    pub bequest_kind: BequestKind,
}

/// Emitted when a release triggers and its assets pass to the receivers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseTriggered {
    /// The release identifier.
    pub release_id: ReleaseId,
    /// The previous owner.
    pub owner: UserId,
    /// The receivers the assets now belong to.
    pub receivers: BTreeSet<UserId>,
    /// The assets that were released.
    pub asset_ids: Vec<AssetId>,
}

/// Emitted when a release is cancelled or declined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseCancelled {
    /// The release identifier.
    pub release_id: ReleaseId,
    /// The owner the assets stay with.
    pub owner: UserId,
    /// The assets the release held.
    pub asset_ids: Vec<AssetId>,
    /// Optional human- or system-supplied reason.
    pub reason: Option<String>,
}

/// Event type identifier for [`ReleaseScheduled`].
pub const RELEASE_SCHEDULED_EVENT_TYPE: &str = "release.scheduled";

/// Event type identifier for [`ReleaseTriggered`].
pub const RELEASE_TRIGGERED_EVENT_TYPE: &str = "release.triggered";

/// Event type identifier for [`ReleaseCancelled`].
pub const RELEASE_CANCELLED_EVENT_TYPE: &str = "release.cancelled";

/// Event payload variants for the Release context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReleaseEventKind {
    /// A release has been scheduled.
    Scheduled(ReleaseScheduled),
    /// A release has triggered.
    Triggered(ReleaseTriggered),
    /// A release has been cancelled.
    Cancelled(ReleaseCancelled),
}

/// Domain event envelope for the Release context.
#[derive(Debug, Clone)]
pub struct ReleaseEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: ReleaseEventKind,
}

impl DomainEvent for ReleaseEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            ReleaseEventKind::Scheduled(_) => RELEASE_SCHEDULED_EVENT_TYPE,
            ReleaseEventKind::Triggered(_) => RELEASE_TRIGGERED_EVENT_TYPE,
            ReleaseEventKind::Cancelled(_) => RELEASE_CANCELLED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("ReleaseEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
