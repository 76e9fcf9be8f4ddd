//! Keepsake — Release bounded context.
//!
//! An [`AssetRelease`](domain::aggregates::AssetRelease) is a scheduled
//! conditional transfer of assets from an owner to a set of receivers,
//! gated by an ordered list of conditions that must all hold before the
//! release can trigger.

pub mod application;
pub mod domain;
