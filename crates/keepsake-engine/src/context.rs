//! Handler dependencies, assembled once per dispatch.

use std::sync::Arc;

use keepsake_asset::domain::aggregates::Asset;
use keepsake_core::clock::{Clock, SystemClock};
use keepsake_core::contacts::ContactDirectory;
use keepsake_core::notification::{LoggingNotificationSender, NotificationSender};
use keepsake_core::uow::UnitOfWork;
use keepsake_release::domain::aggregates::AssetRelease;

/// Everything a handler may depend on, passed explicitly.
///
/// The bus owns one context per dispatch and hands each handler a mutable
/// borrow. Handlers receive only the pieces they declare; the routing
/// adapters do the destructuring.
pub struct HandlerContext {
    /// Transaction scope over the asset repository.
    pub assets: UnitOfWork<Asset>,
    /// Transaction scope over the release repository.
    pub releases: UnitOfWork<AssetRelease>,
    /// Keep-contact lookups.
    pub contacts: Arc<dyn ContactDirectory>,
    /// Outbound notification delivery.
    pub notifications: Arc<dyn NotificationSender>,
    /// Time source for handlers that need "now".
    pub clock: Arc<dyn Clock>,
}

impl HandlerContext {
    /// Assembles a context from its collaborators.
    #[must_use]
    pub fn new(
        assets: UnitOfWork<Asset>,
        releases: UnitOfWork<AssetRelease>,
        contacts: Arc<dyn ContactDirectory>,
        notifications: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            assets,
            releases,
            contacts,
            notifications,
            clock,
        }
    }

    /// A context with the production time source and log-only notification
    /// delivery. Outer layers swap in a real sender when they have one.
    #[must_use]
    pub fn with_defaults(
        assets: UnitOfWork<Asset>,
        releases: UnitOfWork<AssetRelease>,
        contacts: Arc<dyn ContactDirectory>,
    ) -> Self {
        Self::new(
            assets,
            releases,
            contacts,
            Arc::new(LoggingNotificationSender),
            Arc::new(SystemClock),
        )
    }

    /// Discards staged writes in every unit of work. A no-op after a clean
    /// commit; after a failed handler it guarantees the next handler starts
    /// from committed state.
    pub fn rollback_all(&mut self) {
        self.assets.rollback();
        self.releases.rollback();
    }
}
