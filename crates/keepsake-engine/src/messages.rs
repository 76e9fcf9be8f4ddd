//! The closed message set carried by the bus.
//!
//! Every command and event the engine can ever route is a variant here.
//! Adding a message means adding a variant and wiring it in the routing
//! table; there is no open registration surface.

use chrono::{DateTime, Utc};
use keepsake_asset::domain::commands::{AssetCommand, AttachAssetFile, CreateAsset, RemoveAsset};
use keepsake_asset::domain::events::AssetEvent;
use keepsake_core::event::{DomainEvent, EventMetadata};
use keepsake_release::domain::commands::{
    CancelRelease, ReleaseCommand, ScheduleRelease, TriggerRelease,
};
use keepsake_release::domain::events::ReleaseEvent;
use uuid::Uuid;

/// Every command the engine routes.
#[derive(Debug, Clone)]
pub enum Command {
    /// An Asset-context command.
    Asset(AssetCommand),
    /// A Release-context command.
    Release(ReleaseCommand),
}

impl keepsake_core::command::Command for Command {
    fn command_type(&self) -> &'static str {
        match self {
            Self::Asset(c) => c.command_type(),
            Self::Release(c) => c.command_type(),
        }
    }

    fn correlation_id(&self) -> Uuid {
        match self {
            Self::Asset(c) => c.correlation_id(),
            Self::Release(c) => c.correlation_id(),
        }
    }

    fn issued_at(&self) -> DateTime<Utc> {
        match self {
            Self::Asset(c) => c.issued_at(),
            Self::Release(c) => c.issued_at(),
        }
    }
}

impl From<CreateAsset> for Command {
    fn from(command: CreateAsset) -> Self {
        Self::Asset(AssetCommand::Create(command))
    }
}

impl From<AttachAssetFile> for Command {
    fn from(command: AttachAssetFile) -> Self {
        Self::Asset(AssetCommand::AttachFile(command))
    }
}

impl From<RemoveAsset> for Command {
    fn from(command: RemoveAsset) -> Self {
        Self::Asset(AssetCommand::Remove(command))
    }
}

impl From<ScheduleRelease> for Command {
    fn from(command: ScheduleRelease) -> Self {
        Self::Release(ReleaseCommand::Schedule(command))
    }
}

impl From<TriggerRelease> for Command {
    fn from(command: TriggerRelease) -> Self {
        Self::Release(ReleaseCommand::Trigger(command))
    }
}

impl From<CancelRelease> for Command {
    fn from(command: CancelRelease) -> Self {
        Self::Release(ReleaseCommand::Cancel(command))
    }
}

/// Every event the engine fans out.
#[derive(Debug, Clone)]
pub enum Event {
    /// An Asset-context event.
    Asset(AssetEvent),
    /// A Release-context event.
    Release(ReleaseEvent),
}

impl Event {
    /// The namespaced event type identifier.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Asset(e) => e.event_type(),
            Self::Release(e) => e.event_type(),
        }
    }

    /// The event's metadata envelope.
    #[must_use]
    pub fn metadata(&self) -> &EventMetadata {
        match self {
            Self::Asset(e) => e.metadata(),
            Self::Release(e) => e.metadata(),
        }
    }
}

impl From<AssetEvent> for Event {
    fn from(event: AssetEvent) -> Self {
        Self::Asset(event)
    }
}

impl From<ReleaseEvent> for Event {
    fn from(event: ReleaseEvent) -> Self {
        Self::Release(event)
    }
}

/// A queued unit of bus work.
#[derive(Debug, Clone)]
pub enum Message {
    /// A command awaiting its single handler.
    Command(Command),
    /// An event awaiting fan-out.
    Event(Event),
}
