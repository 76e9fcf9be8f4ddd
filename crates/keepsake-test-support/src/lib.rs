//! Shared test mocks and utilities for the Keepsake release engine.

mod clock;
mod contacts;
mod notification;
mod repository;

pub use clock::FixedClock;
pub use contacts::StaticContactDirectory;
pub use notification::{FailingNotificationSender, RecordingNotificationSender, SentNotification};
pub use repository::FailingRepository;
