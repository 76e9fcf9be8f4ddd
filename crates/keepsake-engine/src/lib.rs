//! Keepsake — the release engine's message bus.
//!
//! In-process command/event orchestration: a caller hands the bus one
//! command, the bus routes it to its single handler, then fans the
//! committed events out to their reactors, queueing any events those
//! reactors commit in turn. Dispatch is synchronous and single-threaded;
//! the storage layer owns all cross-request concurrency.
//!
//! The message set is closed ([`Command`], [`Event`]) and the routing
//! tables are static ([`Router`]); every dependency a handler touches is
//! passed through [`HandlerContext`].

mod bus;
mod context;
mod messages;
mod routing;

pub use bus::{DispatchReport, MessageBus, ReactionFailure};
pub use context::HandlerContext;
pub use messages::{Command, Event, Message};
pub use routing::{CommandHandlerFn, EventHandlerFn, NamedEventHandler, Router};
