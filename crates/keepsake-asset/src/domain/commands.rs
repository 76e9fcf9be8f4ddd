//! Commands for the Asset context.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use keepsake_core::command::Command;
use keepsake_core::id::{AssetId, UserId};
use uuid::Uuid;

use super::aggregates::FileMetadata;

/// Command to create a new asset record (the file arrives separately).
#[derive(Debug, Clone)]
pub struct CreateAsset {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The instant the command was constructed.
    pub issued_at: DateTime<Utc>,
    /// Identifier for the new asset.
    pub asset_id: AssetId,
    /// The initial owner set.
    pub owners: BTreeSet<UserId>,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
}

impl Command for CreateAsset {
    fn command_type(&self) -> &'static str {
        "asset.create"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// Command recording that the asset's file upload completed.
#[derive(Debug, Clone)]
pub struct AttachAssetFile {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The instant the command was constructed.
    pub issued_at: DateTime<Utc>,
    /// The asset the file belongs to.
    pub asset_id: AssetId,
    /// Metadata of the uploaded file.
    pub file: FileMetadata,
}

impl Command for AttachAssetFile {
    fn command_type(&self) -> &'static str {
        "asset.attach_file"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// Command to delete an asset.
#[derive(Debug, Clone)]
pub struct RemoveAsset {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The instant the command was constructed.
    pub issued_at: DateTime<Utc>,
    /// The asset to remove.
    pub asset_id: AssetId,
}

impl Command for RemoveAsset {
    fn command_type(&self) -> &'static str {
        "asset.remove"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }
}

/// Closed set of Asset-context commands.
#[derive(Debug, Clone)]
pub enum AssetCommand {
    /// Create a new asset record.
    Create(CreateAsset),
    /// Record the completed file upload.
    AttachFile(AttachAssetFile),
    /// Delete an asset.
    Remove(RemoveAsset),
}

impl Command for AssetCommand {
    fn command_type(&self) -> &'static str {
        match self {
            Self::Create(c) => c.command_type(),
            Self::AttachFile(c) => c.command_type(),
            Self::Remove(c) => c.command_type(),
        }
    }

    fn correlation_id(&self) -> Uuid {
        match self {
            Self::Create(c) => c.correlation_id(),
            Self::AttachFile(c) => c.correlation_id(),
            Self::Remove(c) => c.correlation_id(),
        }
    }

    fn issued_at(&self) -> DateTime<Utc> {
        match self {
            Self::Create(c) => c.issued_at(),
            Self::AttachFile(c) => c.issued_at(),
            Self::Remove(c) => c.issued_at(),
        }
    }
}
