//! Release-driven reactors for the Asset context.
//!
//! These run during event fan-out on the bus; a failure in one (for
//! example a missing asset) is logged and isolated, never aborting sibling
//! reactors or the originating command. All writes go through the
//! per-field last-write-wins rule stamped with the event's timestamp, so
//! re-delivery or out-of-order delivery of release events converges to the
//! same asset state.

use chrono::{DateTime, Utc};
use keepsake_core::error::DomainError;
use keepsake_core::id::AssetId;
use keepsake_core::lifecycle::LifecycleState;
use keepsake_core::uow::UnitOfWork;
use keepsake_release::domain::events::{ReleaseScheduled, ReleaseTriggered};

use crate::domain::aggregates::{Asset, AssetChange};

/// Hides every asset held by a freshly scheduled release.
///
/// # Errors
///
/// Returns [`DomainError::AggregateNotFound`] when a referenced asset does
/// not exist; persistence failures propagate.
pub fn hide_scheduled_assets(
    event: &ReleaseScheduled,
    occurred_at: DateTime<Utc>,
    assets: &mut UnitOfWork<Asset>,
) -> Result<(), DomainError> {
    set_visibility(&event.asset_ids, LifecycleState::Hidden, occurred_at, assets)
}

/// Restores visibility of the given assets. Shared by the released and
/// cancelled paths; safe to re-apply in any delivery order.
///
/// # Errors
///
/// Returns [`DomainError::AggregateNotFound`] when a referenced asset does
/// not exist; persistence failures propagate.
pub fn restore_asset_visibility(
    asset_ids: &[AssetId],
    occurred_at: DateTime<Utc>,
    assets: &mut UnitOfWork<Asset>,
) -> Result<(), DomainError> {
    set_visibility(asset_ids, LifecycleState::Active, occurred_at, assets)
}

/// Hands the released assets to the receivers: the releasing owner's id
/// is substituted with the receiver set, so co-owners keep their stake.
/// Skips assets whose owner set already contains every receiver.
///
/// # Errors
///
/// Returns [`DomainError::AggregateNotFound`] when a referenced asset does
/// not exist; persistence failures propagate.
pub fn transfer_asset_ownership(
    event: &ReleaseTriggered,
    occurred_at: DateTime<Utc>,
    assets: &mut UnitOfWork<Asset>,
) -> Result<(), DomainError> {
    for asset_id in &event.asset_ids {
        let mut asset = assets
            .repo()
            .find_by_id(asset_id)?
            .ok_or_else(|| DomainError::AggregateNotFound(asset_id.to_string()))?;

        if event.receivers.is_subset(&asset.owners) {
            continue;
        }

        let mut owners = asset.owners.clone();
        owners.remove(&event.owner);
        owners.extend(event.receivers.iter().cloned());
        asset.update_field(occurred_at, AssetChange::Owners(owners))?;
        assets.repo().update(asset)?;
    }
    assets.commit()
}

fn set_visibility(
    asset_ids: &[AssetId],
    state: LifecycleState,
    occurred_at: DateTime<Utc>,
    assets: &mut UnitOfWork<Asset>,
) -> Result<(), DomainError> {
    for asset_id in asset_ids {
        let mut asset = assets
            .repo()
            .find_by_id(asset_id)?
            .ok_or_else(|| DomainError::AggregateNotFound(asset_id.to_string()))?;

        asset.update_field(occurred_at, AssetChange::State(state))?;
        assets.repo().update(asset)?;
    }
    assets.commit()
}
