//! Aggregate roots for the Asset context.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use keepsake_core::aggregate::{AggregateRoot, FieldTimestamps, ensure_not_frozen};
use keepsake_core::error::DomainError;
use keepsake_core::event::EventMetadata;
use keepsake_core::id::{AssetId, UserId};
use keepsake_core::lifecycle::LifecycleState;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::commands::CreateAsset;
use super::events::{AssetCreated, AssetEvent, AssetEventKind, AssetFileAttached, AssetRemoved};

/// Metadata of an asset's stored file. The bytes themselves live in an
/// external storage backend; the engine only tracks where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Original file name.
    pub file_name: String,
    /// Backend-specific storage location.
    pub location: String,
    /// MIME content type.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
}

/// Mutable fields of an [`Asset`], keyed for the per-field last-write-wins
/// clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetField {
    /// Display title.
    Title,
    /// Free-form description.
    Description,
    /// Owner id set.
    Owners,
    /// File metadata.
    File,
    /// Lifecycle state.
    State,
}

/// A single admissible write to an [`Asset`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetChange {
    /// Replace the display title.
    Title(String),
    /// Replace the description.
    Description(String),
    /// Replace the owner set. Must be non-empty.
    Owners(BTreeSet<UserId>),
    /// Attach or replace the file metadata.
    File(FileMetadata),
    /// Move the lifecycle state.
    State(LifecycleState),
}

impl AssetChange {
    fn field(&self) -> AssetField {
        match self {
            Self::Title(_) => AssetField::Title,
            Self::Description(_) => AssetField::Description,
            Self::Owners(_) => AssetField::Owners,
            Self::File(_) => AssetField::File,
            Self::State(_) => AssetField::State,
        }
    }
}

/// The aggregate root for a user-owned digital asset.
///
/// Created `Pending` until its file is attached; `Hidden` while a pending
/// release holds it; `Removed` on deletion (final).
#[derive(Debug, Clone)]
pub struct Asset {
    id: AssetId,
    /// The owner id set. Never empty.
    pub owners: BTreeSet<UserId>,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// File metadata; `None` until the upload completes.
    pub file: Option<FileMetadata>,
    state: LifecycleState,
    created_at: DateTime<Utc>,
    field_timestamps: FieldTimestamps<AssetField>,
    pending_events: Vec<AssetEvent>,
}

impl Asset {
    /// Creates a new asset record in the `Pending` state, emitting an
    /// `AssetCreated` event.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::Validation`] when the title is blank or the
    /// owner set is empty.
    pub fn create(command: &CreateAsset) -> Result<Self, DomainError> {
        if command.title.trim().is_empty() {
            return Err(DomainError::Validation("asset title must not be empty".into()));
        }
        if command.owners.is_empty() {
            return Err(DomainError::Validation(
                "asset must have at least one owner".into(),
            ));
        }

        let mut asset = Self {
            id: command.asset_id.clone(),
            owners: command.owners.clone(),
            title: command.title.clone(),
            description: command.description.clone(),
            file: None,
            state: LifecycleState::Pending,
            created_at: command.issued_at,
            field_timestamps: FieldTimestamps::new(command.issued_at),
            pending_events: Vec::new(),
        };

        asset.record_event(
            AssetEventKind::Created(AssetCreated {
                asset_id: asset.id.clone(),
                owners: asset.owners.clone(),
                title: asset.title.clone(),
            }),
            command.correlation_id,
            command.issued_at,
        );

        Ok(asset)
    }

    /// The asset identifier.
    #[must_use]
    pub fn asset_id(&self) -> &AssetId {
        &self.id
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Records the completed file upload: the file metadata lands and the
    /// asset becomes `Active`, emitting an `AssetFileAttached` event.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::RuleViolation`] unless the asset is still
    /// `Pending`, [`DomainError::FrozenAggregate`] when it is final.
    pub fn attach_file(
        &mut self,
        now: DateTime<Utc>,
        file: FileMetadata,
        correlation_id: Uuid,
    ) -> Result<(), DomainError> {
        ensure_not_frozen(self.id.as_str(), self.state)?;
        if self.state != LifecycleState::Pending {
            return Err(DomainError::RuleViolation(format!(
                "asset {} already has its file",
                self.id
            )));
        }

        self.update_fields(
            now,
            vec![
                AssetChange::File(file.clone()),
                AssetChange::State(LifecycleState::Active),
            ],
        )?;

        self.record_event(
            AssetEventKind::FileAttached(AssetFileAttached {
                asset_id: self.id.clone(),
                file,
            }),
            correlation_id,
            now,
        );
        Ok(())
    }

    /// Deletes the asset: the state moves to `Removed` (final) and an
    /// `AssetRemoved` event is emitted.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::FrozenAggregate`] when already removed.
    pub fn remove(&mut self, now: DateTime<Utc>, correlation_id: Uuid) -> Result<(), DomainError> {
        self.update_field(now, AssetChange::State(LifecycleState::Removed))?;
        self.record_event(
            AssetEventKind::Removed(AssetRemoved {
                asset_id: self.id.clone(),
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
    /// Returns [`DomainError::FrozenAggregate`] when the asset is final,
    /// [`DomainError::Validation`] for an empty owner set.
    pub fn update_field(
        &mut self,
        mod_ts: DateTime<Utc>,
        change: AssetChange,
    ) -> Result<bool, DomainError> {
        ensure_not_frozen(self.id.as_str(), self.state)?;

        let field = change.field();
        if !self.field_timestamps.admits(field, mod_ts) {
            return Ok(false);
        }

        let changed = match change {
            AssetChange::Title(title) => replace(&mut self.title, title),
            AssetChange::Description(description) => replace(&mut self.description, description),
            AssetChange::Owners(owners) => {
                if owners.is_empty() {
                    return Err(DomainError::Validation(
                        "asset must have at least one owner".into(),
                    ));
                }
                replace(&mut self.owners, owners)
            }
            AssetChange::File(file) => replace(&mut self.file, Some(file)),
            AssetChange::State(state) => replace(&mut self.state, state),
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
    /// Same as [`Asset::update_field`].
    pub fn update_fields(
        &mut self,
        mod_ts: DateTime<Utc>,
        changes: Vec<AssetChange>,
    ) -> Result<bool, DomainError> {
        let mut state_change = None;
        let mut any_changed = false;
        for change in changes {
            if let AssetChange::State(state) = change {
                state_change = Some(state);
            } else {
                any_changed |= self.update_field(mod_ts, change)?;
            }
        }
        if let Some(state) = state_change {
            any_changed |= self.update_field(mod_ts, AssetChange::State(state))?;
        }
        Ok(any_changed)
    }

    fn record_event(&mut self, kind: AssetEventKind, correlation_id: Uuid, occurred_at: DateTime<Utc>) {
        self.pending_events.push(AssetEvent {
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

impl AggregateRoot for Asset {
    type Id = AssetId;
    type Event = AssetEvent;

    fn id(&self) -> &AssetId {
        &self.id
    }

    fn lifecycle(&self) -> LifecycleState {
        self.state
    }

    fn take_pending_events(&mut self) -> Vec<AssetEvent> {
        std::mem::take(&mut self.pending_events)
    }
}
