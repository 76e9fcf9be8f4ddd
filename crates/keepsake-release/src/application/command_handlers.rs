//! Command handlers for the Release context.
//!
//! Application-level handler functions: fetch the aggregate through the
//! unit of work, run the domain operation, commit. Each handler receives
//! only the dependencies it declares; the bus wiring passes them in.

use keepsake_core::clock::Clock;
use keepsake_core::contacts::ContactDirectory;
use keepsake_core::error::DomainError;
use keepsake_core::uow::UnitOfWork;

use crate::domain::aggregates::AssetRelease;
use crate::domain::commands::{CancelRelease, ScheduleRelease, TriggerRelease};

/// Handles `ScheduleRelease`: constructs the aggregate and persists it.
///
/// # Errors
///
/// Returns `DomainError` on validation failure, a duplicate release id, or
/// a persistence failure.
pub fn handle_schedule_release(
    command: &ScheduleRelease,
    releases: &mut UnitOfWork<AssetRelease>,
) -> Result<(), DomainError> {
    let release = AssetRelease::schedule(command)?;
    releases.repo().create(release)?;
    releases.commit()
}

/// Handles `TriggerRelease`.
///
/// Conditions are evaluated against the injected clock, never the
/// command's own timestamp: a caller cannot forge `issued_at` to slip
/// past a time condition.
///
/// Before releasing, the owner and every receiver must be mutual keep
/// contacts. If any pair is not, the release is CANCELLED with a
/// system-generated reason instead of erroring: a fail-safe degrade that
/// avoids handing assets to unverified parties.
///
/// # Errors
///
/// Returns `DomainError` when the release is missing or already past, when
/// its conditions are not met, or on a persistence failure.
pub fn handle_trigger_release(
    command: &TriggerRelease,
    releases: &mut UnitOfWork<AssetRelease>,
    contacts: &dyn ContactDirectory,
    clock: &dyn Clock,
) -> Result<(), DomainError> {
    let now = clock.now();
    let mut release = releases
        .repo()
        .find_by_id(&command.release_id)?
        .ok_or_else(|| DomainError::AggregateNotFound(command.release_id.to_string()))?;

    let unverified: Vec<String> = release
        .receivers
        .iter()
        .filter(|receiver| !contacts.is_mutual_keep(&release.owner, receiver))
        .map(ToString::to_string)
        .collect();

    if unverified.is_empty() {
        release.release(now, command.location_guess.as_deref(), command.correlation_id)?;
    } else {
        tracing::warn!(
            release_id = %command.release_id,
            receivers = ?unverified,
            "receivers are not mutual keep contacts of the owner; cancelling"
        );
        release.cancel(
            now,
            Some(format!(
                "receivers are not verified keep contacts: {}",
                unverified.join(", ")
            )),
            command.correlation_id,
        )?;
    }

    releases.repo().update(release)?;
    releases.commit()
}

/// Handles `CancelRelease`.
///
/// # Errors
///
/// Returns `DomainError` when the release is missing or already past, or
/// on a persistence failure.
pub fn handle_cancel_release(
    command: &CancelRelease,
    releases: &mut UnitOfWork<AssetRelease>,
) -> Result<(), DomainError> {
    let mut release = releases
        .repo()
        .find_by_id(&command.release_id)?
        .ok_or_else(|| DomainError::AggregateNotFound(command.release_id.to_string()))?;

    release.cancel(command.issued_at, command.reason.clone(), command.correlation_id)?;

    releases.repo().update(release)?;
    releases.commit()
}
