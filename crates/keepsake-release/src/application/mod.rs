//! Application layer for the Release context.

pub mod command_handlers;
pub mod notifications;
