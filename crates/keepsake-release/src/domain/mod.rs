//! Domain model for the Release context.

pub mod aggregates;
pub mod commands;
pub mod conditions;
pub mod events;
