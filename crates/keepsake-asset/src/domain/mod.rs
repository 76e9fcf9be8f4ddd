//! Domain model for the Asset context.

pub mod aggregates;
pub mod commands;
pub mod events;
