//! Application layer for the Asset context.

pub mod command_handlers;
pub mod reactors;

#[cfg(test)]
pub(crate) mod testing;
