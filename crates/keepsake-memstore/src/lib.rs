//! Keepsake — in-memory persistence.
//!
//! The reference backend for the release engine: a shared backing map per
//! aggregate type, with each repository instance staging its writes until
//! commit. Request-scoped repositories over one shared store model the
//! engine's concurrency contract (contention lives in the storage layer,
//! not the bus).

mod contacts;
mod queries;
mod store;

pub use contacts::InMemoryContactDirectory;
pub use store::{InMemoryRepository, InMemoryStore};

/// Shared backing store for assets.
pub type AssetStore = InMemoryStore<keepsake_asset::domain::aggregates::Asset>;

/// Shared backing store for releases.
pub type ReleaseStore = InMemoryStore<keepsake_release::domain::aggregates::AssetRelease>;
