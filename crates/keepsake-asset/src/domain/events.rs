//! Domain events for the Asset context.

use std::collections::BTreeSet;

use keepsake_core::event::{DomainEvent, EventMetadata};
use keepsake_core::id::{AssetId, UserId};
use serde::{Deserialize, Serialize};

use super::aggregates::FileMetadata;

/// Emitted when an asset record is created (still awaiting its file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetCreated {
    /// The asset identifier.
    pub asset_id: AssetId,
    /// The initial owner set.
    pub owners: BTreeSet<UserId>,
    /// Display title.
    pub title: String,
}

/// Emitted when the asset's file upload completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetFileAttached {
    /// The asset identifier.
    pub asset_id: AssetId,
    /// Metadata of the attached file.
    pub file: FileMetadata,
}

/// Emitted when an asset is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRemoved {
    /// The asset identifier.
    pub asset_id: AssetId,
}

/// Event type identifier for [`AssetCreated`].
pub const ASSET_CREATED_EVENT_TYPE: &str = "asset.created";

/// Event type identifier for [`AssetFileAttached`].
pub const ASSET_FILE_ATTACHED_EVENT_TYPE: &str = "asset.file_attached";

/// Event type identifier for [`AssetRemoved`].
pub const ASSET_REMOVED_EVENT_TYPE: &str = "asset.removed";

/// Event payload variants for the Asset context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AssetEventKind {
    /// An asset record has been created.
    Created(AssetCreated),
    /// The asset's file has been attached.
    FileAttached(AssetFileAttached),
    /// The asset has been removed.
    Removed(AssetRemoved),
}

/// Domain event envelope for the Asset context.
#[derive(Debug, Clone)]
pub struct AssetEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: AssetEventKind,
}

impl DomainEvent for AssetEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            AssetEventKind::Created(_) => ASSET_CREATED_EVENT_TYPE,
            AssetEventKind::FileAttached(_) => ASSET_FILE_ATTACHED_EVENT_TYPE,
            AssetEventKind::Removed(_) => ASSET_REMOVED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("AssetEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
