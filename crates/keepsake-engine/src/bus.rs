//! The message bus.
//!
//! Single-threaded, synchronous dispatch: one entry command, then a FIFO
//! cascade of the events its handlers commit. Commands fail loudly (the
//! error propagates to the caller); event reactors fail quietly (the
//! failure is logged, recorded on the report, and isolated from sibling
//! reactors and the cascade).

use std::collections::VecDeque;

use keepsake_core::command::Command as _;
use keepsake_core::error::DomainError;

use crate::context::HandlerContext;
use crate::messages::{Command, Event, Message};
use crate::routing::Router;

/// One isolated event reactor failure.
#[derive(Debug)]
pub struct ReactionFailure {
    /// The event whose reactor failed.
    pub event_type: &'static str,
    /// The failing reactor's name.
    pub handler: &'static str,
    /// The error it returned.
    pub error: DomainError,
}

/// The outcome of one full dispatch.
#[derive(Debug, Default)]
pub struct DispatchReport {
    /// Messages processed, the entry command included.
    pub steps: usize,
    /// Reactor failures that were isolated during fan-out.
    pub failures: Vec<ReactionFailure>,
}

impl DispatchReport {
    /// Whether every reactor in the cascade succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Routes one command and the event cascade it sets off.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageBus {
    router: Router,
}

impl MessageBus {
    /// A bus over explicit routing tables.
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// A bus over the production tables.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Router::standard())
    }

    /// Dispatches `command` and drains the resulting event cascade.
    ///
    /// After every handler invocation the context's units of work are
    /// rolled back, so an uncommitted write can never leak into the next
    /// handler. The cascade terminates because each event is processed
    /// once and handlers only emit events by committing aggregate changes.
    ///
    /// # Errors
    ///
    /// A command handler failure is re-raised as-is. Event reactor
    /// failures never surface here; they land in the report.
    pub fn handle(
        &self,
        command: Command,
        ctx: &mut HandlerContext,
    ) -> Result<DispatchReport, DomainError> {
        let mut report = DispatchReport::default();
        let mut queue: VecDeque<Message> = VecDeque::from([Message::Command(command)]);

        while let Some(message) = queue.pop_front() {
            report.steps += 1;
            match message {
                Message::Command(command) => {
                    tracing::debug!(
                        command_type = command.command_type(),
                        correlation_id = %command.correlation_id(),
                        "handling command"
                    );
                    let handler = self.router.command_handler_for(&command);
                    let result = handler(&command, ctx);
                    ctx.rollback_all();
                    if let Err(error) = result {
                        tracing::error!(
                            command_type = command.command_type(),
                            correlation_id = %command.correlation_id(),
                            %error,
                            "command handler failed"
                        );
                        return Err(error);
                    }
                    Self::enqueue_new_events(ctx, &mut queue);
                }
                Message::Event(event) => {
                    for reactor in self.router.handlers_for(&event) {
                        tracing::debug!(
                            event_type = event.event_type(),
                            handler = reactor.name,
                            "running event reactor"
                        );
                        let result = (reactor.run)(&event, ctx);
                        ctx.rollback_all();
                        if let Err(error) = result {
                            tracing::error!(
                                event_type = event.event_type(),
                                handler = reactor.name,
                                %error,
                                "event reactor failed; isolating"
                            );
                            report.failures.push(ReactionFailure {
                                event_type: event.event_type(),
                                handler: reactor.name,
                                error,
                            });
                        }
                        Self::enqueue_new_events(ctx, &mut queue);
                    }
                }
            }
        }

        Ok(report)
    }

    // Fixed drain order: asset events, then release events.
    fn enqueue_new_events(ctx: &mut HandlerContext, queue: &mut VecDeque<Message>) {
        for event in ctx.assets.collect_new_events() {
            queue.push_back(Message::Event(Event::Asset(event)));
        }
        for event in ctx.releases.collect_new_events() {
            queue.push_back(Message::Event(Event::Release(event)));
        }
    }
}
