//! Keepsake Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that all bounded
//! contexts depend on: typed identifiers, the aggregate lifecycle and
//! per-field last-write-wins machinery, domain event and command traits,
//! the repository and unit-of-work contracts, and the outbound ports
//! (notifications, contact directory). It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod contacts;
pub mod error;
pub mod event;
pub mod id;
pub mod lifecycle;
pub mod notification;
pub mod repository;
pub mod uow;
