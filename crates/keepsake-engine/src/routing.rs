//! Static routing tables.
//!
//! Both tables are plain functions over the closed message enums, resolved
//! at compile time. A command maps to exactly one handler; an event maps
//! to an ordered slice of named reactors, run in slice order. Tests inject
//! their own tables through [`Router::new`].

use keepsake_asset::application::command_handlers::{
    handle_attach_asset_file, handle_create_asset, handle_remove_asset,
};
use keepsake_asset::application::reactors::{
    hide_scheduled_assets, restore_asset_visibility, transfer_asset_ownership,
};
use keepsake_asset::domain::commands::AssetCommand;
use keepsake_core::error::DomainError;
use keepsake_release::application::command_handlers::{
    handle_cancel_release, handle_schedule_release, handle_trigger_release,
};
use keepsake_release::application::notifications::{
    notify_owner_of_cancellation, notify_receivers_of_release,
};
use keepsake_release::domain::commands::ReleaseCommand;
use keepsake_release::domain::events::ReleaseEventKind;

use crate::context::HandlerContext;
use crate::messages::{Command, Event};

/// A command handler adapter: full context in, domain handler out.
pub type CommandHandlerFn = fn(&Command, &mut HandlerContext) -> Result<(), DomainError>;

/// An event reactor adapter.
pub type EventHandlerFn = fn(&Event, &mut HandlerContext) -> Result<(), DomainError>;

/// An event reactor with a stable name for logs and failure reports.
#[derive(Debug, Clone, Copy)]
pub struct NamedEventHandler {
    /// Stable reactor name.
    pub name: &'static str,
    /// The adapter to invoke.
    pub run: EventHandlerFn,
}

/// The pair of routing tables the bus consults.
#[derive(Debug, Clone, Copy)]
pub struct Router {
    commands: fn(&Command) -> CommandHandlerFn,
    events: fn(&Event) -> &'static [NamedEventHandler],
}

impl Router {
    /// Builds a router from explicit tables.
    #[must_use]
    pub fn new(
        commands: fn(&Command) -> CommandHandlerFn,
        events: fn(&Event) -> &'static [NamedEventHandler],
    ) -> Self {
        Self { commands, events }
    }

    /// The production tables.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(route_command, route_event)
    }

    /// Resolves the single handler for a command.
    #[must_use]
    pub fn command_handler_for(&self, command: &Command) -> CommandHandlerFn {
        (self.commands)(command)
    }

    /// Resolves the ordered reactors for an event.
    #[must_use]
    pub fn handlers_for(&self, event: &Event) -> &'static [NamedEventHandler] {
        (self.events)(event)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::standard()
    }
}

fn route_command(command: &Command) -> CommandHandlerFn {
    match command {
        Command::Asset(AssetCommand::Create(_)) => adapters::create_asset,
        Command::Asset(AssetCommand::AttachFile(_)) => adapters::attach_asset_file,
        Command::Asset(AssetCommand::Remove(_)) => adapters::remove_asset,
        Command::Release(ReleaseCommand::Schedule(_)) => adapters::schedule_release,
        Command::Release(ReleaseCommand::Trigger(_)) => adapters::trigger_release,
        Command::Release(ReleaseCommand::Cancel(_)) => adapters::cancel_release,
    }
}

static ON_RELEASE_SCHEDULED: &[NamedEventHandler] = &[NamedEventHandler {
    name: "hide_scheduled_assets",
    run: adapters::hide_scheduled,
}];

static ON_RELEASE_TRIGGERED: &[NamedEventHandler] = &[
    NamedEventHandler {
        name: "restore_asset_visibility",
        run: adapters::restore_visibility_on_trigger,
    },
    NamedEventHandler {
        name: "transfer_asset_ownership",
        run: adapters::transfer_ownership,
    },
    NamedEventHandler {
        name: "notify_receivers_of_release",
        run: adapters::notify_receivers,
    },
];

static ON_RELEASE_CANCELLED: &[NamedEventHandler] = &[
    NamedEventHandler {
        name: "restore_asset_visibility",
        run: adapters::restore_visibility_on_cancel,
    },
    NamedEventHandler {
        name: "notify_owner_of_cancellation",
        run: adapters::notify_owner,
    },
];

fn route_event(event: &Event) -> &'static [NamedEventHandler] {
    match event {
        // Asset events have no in-engine reactors; outer layers may tail
        // the dispatch report for them.
        Event::Asset(_) => &[],
        Event::Release(release_event) => match &release_event.kind {
            ReleaseEventKind::Scheduled(_) => ON_RELEASE_SCHEDULED,
            ReleaseEventKind::Triggered(_) => ON_RELEASE_TRIGGERED,
            ReleaseEventKind::Cancelled(_) => ON_RELEASE_CANCELLED,
        },
    }
}

/// Thin adapters between the bus's uniform signatures and the context
/// crates' narrow handler signatures. Each destructures the message and
/// the context, then delegates.
mod adapters {
    use super::{
        AssetCommand, Command, DomainError, Event, HandlerContext, ReleaseCommand,
        ReleaseEventKind, handle_attach_asset_file, handle_cancel_release, handle_create_asset,
        handle_remove_asset, handle_schedule_release, handle_trigger_release,
        hide_scheduled_assets, notify_owner_of_cancellation, notify_receivers_of_release,
        restore_asset_visibility, transfer_asset_ownership,
    };

    fn misrouted(expected: &str) -> DomainError {
        DomainError::Infrastructure(format!("message routed to wrong handler: {expected}"))
    }

    pub(super) fn create_asset(
        command: &Command,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Command::Asset(AssetCommand::Create(command)) = command else {
            return Err(misrouted("asset.create"));
        };
        handle_create_asset(command, &mut ctx.assets)
    }

    pub(super) fn attach_asset_file(
        command: &Command,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Command::Asset(AssetCommand::AttachFile(command)) = command else {
            return Err(misrouted("asset.attach_file"));
        };
        handle_attach_asset_file(command, &mut ctx.assets)
    }

    pub(super) fn remove_asset(
        command: &Command,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Command::Asset(AssetCommand::Remove(command)) = command else {
            return Err(misrouted("asset.remove"));
        };
        handle_remove_asset(command, &mut ctx.assets)
    }

    pub(super) fn schedule_release(
        command: &Command,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Command::Release(ReleaseCommand::Schedule(command)) = command else {
            return Err(misrouted("release.schedule"));
        };
        handle_schedule_release(command, &mut ctx.releases)
    }

    pub(super) fn trigger_release(
        command: &Command,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Command::Release(ReleaseCommand::Trigger(command)) = command else {
            return Err(misrouted("release.trigger"));
        };
        handle_trigger_release(
            command,
            &mut ctx.releases,
            ctx.contacts.as_ref(),
            ctx.clock.as_ref(),
        )
    }

    pub(super) fn cancel_release(
        command: &Command,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Command::Release(ReleaseCommand::Cancel(command)) = command else {
            return Err(misrouted("release.cancel"));
        };
        handle_cancel_release(command, &mut ctx.releases)
    }

    pub(super) fn hide_scheduled(
        event: &Event,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Event::Release(event) = event else {
            return Err(misrouted("release.scheduled"));
        };
        let ReleaseEventKind::Scheduled(payload) = &event.kind else {
            return Err(misrouted("release.scheduled"));
        };
        hide_scheduled_assets(payload, event.metadata.occurred_at, &mut ctx.assets)
    }

    pub(super) fn restore_visibility_on_trigger(
        event: &Event,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Event::Release(event) = event else {
            return Err(misrouted("release.triggered"));
        };
        let ReleaseEventKind::Triggered(payload) = &event.kind else {
            return Err(misrouted("release.triggered"));
        };
        restore_asset_visibility(&payload.asset_ids, event.metadata.occurred_at, &mut ctx.assets)
    }

    pub(super) fn restore_visibility_on_cancel(
        event: &Event,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Event::Release(event) = event else {
            return Err(misrouted("release.cancelled"));
        };
        let ReleaseEventKind::Cancelled(payload) = &event.kind else {
            return Err(misrouted("release.cancelled"));
        };
        restore_asset_visibility(&payload.asset_ids, event.metadata.occurred_at, &mut ctx.assets)
    }

    pub(super) fn transfer_ownership(
        event: &Event,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Event::Release(event) = event else {
            return Err(misrouted("release.triggered"));
        };
        let ReleaseEventKind::Triggered(payload) = &event.kind else {
            return Err(misrouted("release.triggered"));
        };
        transfer_asset_ownership(payload, event.metadata.occurred_at, &mut ctx.assets)
    }

    pub(super) fn notify_receivers(
        event: &Event,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Event::Release(event) = event else {
            return Err(misrouted("release.triggered"));
        };
        let ReleaseEventKind::Triggered(payload) = &event.kind else {
            return Err(misrouted("release.triggered"));
        };
        notify_receivers_of_release(payload, ctx.notifications.as_ref())
    }

    pub(super) fn notify_owner(
        event: &Event,
        ctx: &mut HandlerContext,
    ) -> Result<(), DomainError> {
        let Event::Release(event) = event else {
            return Err(misrouted("release.cancelled"));
        };
        let ReleaseEventKind::Cancelled(payload) = &event.kind else {
            return Err(misrouted("release.cancelled"));
        };
        notify_owner_of_cancellation(payload, ctx.notifications.as_ref())
    }
}
