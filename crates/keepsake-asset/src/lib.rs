//! Keepsake — Asset bounded context.
//!
//! Assets are user-owned digital files with a visibility lifecycle: created
//! pending their upload, active once complete, hidden while a pending
//! release holds them, and removed on deletion. The reactors in
//! [`application::reactors`] keep asset visibility and ownership in step
//! with release events.

pub mod application;
pub mod domain;
