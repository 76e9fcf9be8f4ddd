//! Command handlers for the Asset context.
//!
//! Application-level handler functions: fetch the aggregate through the
//! unit of work, run the domain operation, commit.

use keepsake_core::error::DomainError;
use keepsake_core::uow::UnitOfWork;

use crate::domain::aggregates::Asset;
use crate::domain::commands::{AttachAssetFile, CreateAsset, RemoveAsset};

/// Handles `CreateAsset`: constructs the pending record and persists it.
///
/// # Errors
///
/// Returns `DomainError` on validation failure, a duplicate asset id, or a
/// persistence failure.
pub fn handle_create_asset(
    command: &CreateAsset,
    assets: &mut UnitOfWork<Asset>,
) -> Result<(), DomainError> {
    let asset = Asset::create(command)?;
    assets.repo().create(asset)?;
    assets.commit()
}

/// Handles `AttachAssetFile`: records the completed upload and activates
/// the asset.
///
/// # Errors
///
/// Returns `DomainError` when the asset is missing, already has its file,
/// or on a persistence failure.
pub fn handle_attach_asset_file(
    command: &AttachAssetFile,
    assets: &mut UnitOfWork<Asset>,
) -> Result<(), DomainError> {
    let mut asset = assets
        .repo()
        .find_by_id(&command.asset_id)?
        .ok_or_else(|| DomainError::AggregateNotFound(command.asset_id.to_string()))?;

    asset.attach_file(command.issued_at, command.file.clone(), command.correlation_id)?;

    assets.repo().update(asset)?;
    assets.commit()
}

/// Handles `RemoveAsset`.
///
/// # Errors
///
/// Returns `DomainError` when the asset is missing or already removed, or
/// on a persistence failure.
pub fn handle_remove_asset(
    command: &RemoveAsset,
    assets: &mut UnitOfWork<Asset>,
) -> Result<(), DomainError> {
    let mut asset = assets
        .repo()
        .find_by_id(&command.asset_id)?
        .ok_or_else(|| DomainError::AggregateNotFound(command.asset_id.to_string()))?;

    asset.remove(command.issued_at, command.correlation_id)?;

    assets.repo().update(asset)?;
    assets.commit()
}
