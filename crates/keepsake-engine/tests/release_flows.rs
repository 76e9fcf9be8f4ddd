//! End-to-end dispatch flows over the in-memory backend.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use keepsake_asset::domain::aggregates::FileMetadata;
use keepsake_asset::domain::commands::{AttachAssetFile, CreateAsset};
use keepsake_core::contacts::ContactDirectory;
use keepsake_core::error::DomainError;
use keepsake_core::id::{AssetId, ReleaseId, UserId};
use keepsake_core::lifecycle::LifecycleState;
use keepsake_core::notification::NotificationSender;
use keepsake_core::uow::UnitOfWork;
use keepsake_engine::{Command, DispatchReport, HandlerContext, MessageBus};
use keepsake_memstore::{AssetStore, InMemoryContactDirectory, ReleaseStore};
use keepsake_release::domain::aggregates::{BequestKind, ReleaseKind};
use keepsake_release::domain::commands::{CancelRelease, ScheduleRelease, TriggerRelease};
use keepsake_release::domain::conditions::ReleaseCondition;
use keepsake_test_support::{FailingNotificationSender, FixedClock, RecordingNotificationSender};
use uuid::Uuid;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, day, 0, 0, 0).unwrap()
}

/// Shared stores and a bus, with a fresh per-dispatch context, the way an
/// outer transport would drive the engine.
struct World {
    assets: AssetStore,
    releases: ReleaseStore,
    contacts: Arc<InMemoryContactDirectory>,
    notifications: Arc<RecordingNotificationSender>,
    bus: MessageBus,
}

impl World {
    fn new() -> Self {
        init_tracing();
        Self {
            assets: AssetStore::new(),
            releases: ReleaseStore::new(),
            contacts: Arc::new(InMemoryContactDirectory::new()),
            notifications: Arc::new(RecordingNotificationSender::default()),
            bus: MessageBus::standard(),
        }
    }

    fn dispatch(&self, command: impl Into<Command>) -> Result<DispatchReport, DomainError> {
        self.dispatch_at(command, day(1))
    }

    fn dispatch_at(
        &self,
        command: impl Into<Command>,
        now: DateTime<Utc>,
    ) -> Result<DispatchReport, DomainError> {
        self.dispatch_notifying(
            command,
            now,
            Arc::clone(&self.notifications) as Arc<dyn NotificationSender>,
        )
    }

    fn dispatch_notifying(
        &self,
        command: impl Into<Command>,
        now: DateTime<Utc>,
        notifications: Arc<dyn NotificationSender>,
    ) -> Result<DispatchReport, DomainError> {
        let mut ctx = HandlerContext::new(
            UnitOfWork::new(Box::new(self.assets.repository())),
            UnitOfWork::new(Box::new(self.releases.repository())),
            Arc::clone(&self.contacts) as Arc<dyn ContactDirectory>,
            notifications,
            Arc::new(FixedClock(now)),
        );
        self.bus.handle(command.into(), &mut ctx)
    }

    fn active_asset(&self, id: &str, owner: &str) {
        self.dispatch(CreateAsset {
            correlation_id: Uuid::new_v4(),
            issued_at: day(1),
            asset_id: AssetId::from(id),
            owners: BTreeSet::from([UserId::from(owner)]),
            title: "diary".to_owned(),
            description: String::new(),
        })
        .unwrap();
        self.dispatch(AttachAssetFile {
            correlation_id: Uuid::new_v4(),
            issued_at: day(1),
            asset_id: AssetId::from(id),
            file: FileMetadata {
                file_name: "diary.pdf".to_owned(),
                location: format!("bucket/{id}"),
                content_type: "application/pdf".to_owned(),
                size_bytes: 1024,
            },
        })
        .unwrap();
    }
}

fn schedule(release_id: &str, owner: &str, receivers: &[&str], asset_ids: &[&str]) -> ScheduleRelease {
    ScheduleRelease {
        correlation_id: Uuid::new_v4(),
        issued_at: day(2),
        release_id: ReleaseId::from(release_id),
        name: "letters".to_owned(),
        description: String::new(),
        owner: UserId::from(owner),
        receivers: receivers.iter().copied().map(UserId::from).collect(),
        asset_ids: asset_ids.iter().copied().map(AssetId::from).collect(),
        conditions: vec![ReleaseCondition::Time { release_at: day(10) }],
        release_kind: ReleaseKind::TimeCapsule,
        bequest_kind: BequestKind::Gift,
    }
}

fn trigger(release_id: &str, issued_at: DateTime<Utc>) -> TriggerRelease {
    TriggerRelease {
        correlation_id: Uuid::new_v4(),
        issued_at,
        release_id: ReleaseId::from(release_id),
        location_guess: None,
    }
}

#[test]
fn test_scheduling_hides_the_held_assets() {
    // Arrange
    let world = World::new();
    world.active_asset("a1", "u1");
    world.active_asset("a2", "u1");

    // Act: one command, one scheduled event with its hide reactor.
    let report = world.dispatch(schedule("r1", "u1", &["u1"], &["a1", "a2"])).unwrap();

    // Assert
    assert_eq!(report.steps, 2);
    assert!(report.is_clean());
    let release = world.releases.get(&ReleaseId::from("r1")).unwrap();
    assert_eq!(release.state(), LifecycleState::Active);
    assert!(!release.can_trigger(day(3), None));
    for id in ["a1", "a2"] {
        let asset = world.assets.get(&AssetId::from(id)).unwrap();
        assert_eq!(asset.state(), LifecycleState::Hidden);
    }
}

#[test]
fn test_triggering_early_raises_and_changes_nothing() {
    // Arrange
    let world = World::new();
    world.active_asset("a1", "u1");
    world.dispatch(schedule("r1", "u1", &["u1"], &["a1"])).unwrap();

    // Act
    let result = world.dispatch_at(trigger("r1", day(3)), day(3));

    // Assert
    assert!(matches!(result, Err(DomainError::RuleViolation(_))));
    let release = world.releases.get(&ReleaseId::from("r1")).unwrap();
    assert_eq!(release.state(), LifecycleState::Active);
    let asset = world.assets.get(&AssetId::from("a1")).unwrap();
    assert_eq!(asset.state(), LifecycleState::Hidden);
}

#[test]
fn test_triggering_after_the_release_time_hands_assets_to_receivers() {
    // Arrange: u1 and u2 keep each other.
    let world = World::new();
    world.contacts.add_keep(&UserId::from("u1"), &UserId::from("u2"));
    world.active_asset("a1", "u1");
    world.dispatch(schedule("r1", "u1", &["u2"], &["a1"])).unwrap();

    // Act
    let report = world.dispatch_at(trigger("r1", day(11)), day(11)).unwrap();

    // Assert
    assert!(report.is_clean());
    let release = world.releases.get(&ReleaseId::from("r1")).unwrap();
    assert_eq!(release.state(), LifecycleState::Inactive);
    assert!(release.is_past());
    let asset = world.assets.get(&AssetId::from("a1")).unwrap();
    assert_eq!(asset.state(), LifecycleState::Active);
    assert_eq!(asset.owners, BTreeSet::from([UserId::from("u2")]));
    let sent = world.notifications.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].destination, "u2");
}

#[test]
fn test_future_self_release_needs_no_keep_contact() {
    // Arrange: receivers == owner; self-keeps are implicit.
    let world = World::new();
    world.active_asset("a1", "u1");
    world.dispatch(schedule("r1", "u1", &["u1"], &["a1"])).unwrap();

    // Act
    world.dispatch_at(trigger("r1", day(11)), day(11)).unwrap();

    // Assert
    let release = world.releases.get(&ReleaseId::from("r1")).unwrap();
    assert_eq!(release.state(), LifecycleState::Inactive);
    let asset = world.assets.get(&AssetId::from("a1")).unwrap();
    assert_eq!(asset.state(), LifecycleState::Active);
    assert_eq!(asset.owners, BTreeSet::from([UserId::from("u1")]));
}

#[test]
fn test_cancelling_restores_assets_and_notifies_the_owner() {
    // Arrange
    let world = World::new();
    world.active_asset("a1", "u1");
    world.dispatch(schedule("r1", "u1", &["u1"], &["a1"])).unwrap();

    // Act
    let report = world
        .dispatch(CancelRelease {
            correlation_id: Uuid::new_v4(),
            issued_at: day(3),
            release_id: ReleaseId::from("r1"),
            reason: Some("changed my mind".to_owned()),
        })
        .unwrap();

    // Assert
    assert!(report.is_clean());
    let release = world.releases.get(&ReleaseId::from("r1")).unwrap();
    assert_eq!(release.state(), LifecycleState::Removed);
    let asset = world.assets.get(&AssetId::from("a1")).unwrap();
    assert_eq!(asset.state(), LifecycleState::Active);
    assert_eq!(asset.owners, BTreeSet::from([UserId::from("u1")]));
    let sent = world.notifications.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].destination, "u1");
    assert!(sent[0].body.contains("changed my mind"));
}

#[test]
fn test_unverified_receivers_cancel_the_release_instead_of_handing_over() {
    // Arrange: u2 is NOT a keep contact of u1.
    let world = World::new();
    world.active_asset("a1", "u1");
    world.dispatch(schedule("r1", "u1", &["u2"], &["a1"])).unwrap();

    // Act: the trigger command itself succeeds; the degrade is a cancel.
    let report = world.dispatch_at(trigger("r1", day(11)), day(11)).unwrap();

    // Assert
    assert!(report.is_clean());
    let release = world.releases.get(&ReleaseId::from("r1")).unwrap();
    assert_eq!(release.state(), LifecycleState::Removed);
    let asset = world.assets.get(&AssetId::from("a1")).unwrap();
    assert_eq!(asset.state(), LifecycleState::Active);
    assert_eq!(asset.owners, BTreeSet::from([UserId::from("u1")]));
    let sent = world.notifications.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].destination, "u1");
    assert!(sent[0].body.contains("u2"));
}

#[test]
fn test_notification_failure_does_not_undo_the_handover() {
    // Arrange
    let world = World::new();
    world.contacts.add_keep(&UserId::from("u1"), &UserId::from("u2"));
    world.active_asset("a1", "u1");
    world.dispatch(schedule("r1", "u1", &["u2"], &["a1"])).unwrap();

    // Act
    let report = world
        .dispatch_notifying(
            trigger("r1", day(11)),
            day(11),
            Arc::new(FailingNotificationSender),
        )
        .unwrap();

    // Assert: the failure is on the report; ownership still moved.
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].handler, "notify_receivers_of_release");
    assert_eq!(report.failures[0].event_type, "release.triggered");
    let asset = world.assets.get(&AssetId::from("a1")).unwrap();
    assert_eq!(asset.owners, BTreeSet::from([UserId::from("u2")]));
}

#[test]
fn test_scheduling_over_a_missing_asset_isolates_the_hide_reactor() {
    // Arrange: the release references an asset that was never created.
    let world = World::new();

    // Act
    let report = world.dispatch(schedule("r1", "u1", &["u1"], &["ghost"])).unwrap();

    // Assert: the release is committed; the hide failure is recorded.
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].handler, "hide_scheduled_assets");
    assert!(matches!(
        report.failures[0].error,
        DomainError::AggregateNotFound(_)
    ));
    assert!(world.releases.get(&ReleaseId::from("r1")).is_some());
}

#[test]
fn test_storage_failure_surfaces_from_the_command() {
    // Arrange: the asset repository is down.
    let world = World::new();
    let mut ctx = HandlerContext::new(
        UnitOfWork::new(Box::new(
            keepsake_test_support::FailingRepository::<keepsake_asset::domain::aggregates::Asset>::default(),
        )),
        UnitOfWork::new(Box::new(world.releases.repository())),
        Arc::clone(&world.contacts) as Arc<dyn ContactDirectory>,
        Arc::clone(&world.notifications) as Arc<dyn NotificationSender>,
        Arc::new(FixedClock(day(1))),
    );

    // Act
    let result = world.bus.handle(
        Command::from(CreateAsset {
            correlation_id: Uuid::new_v4(),
            issued_at: day(1),
            asset_id: AssetId::from("a1"),
            owners: BTreeSet::from([UserId::from("u1")]),
            title: "diary".to_owned(),
            description: String::new(),
        }),
        &mut ctx,
    );

    // Assert
    assert!(matches!(result, Err(DomainError::Infrastructure(_))));
}

#[test]
fn test_duplicate_release_id_is_rejected() {
    let world = World::new();
    world.active_asset("a1", "u1");
    world.dispatch(schedule("r1", "u1", &["u1"], &["a1"])).unwrap();

    let result = world.dispatch(schedule("r1", "u1", &["u1"], &["a1"]));

    assert!(matches!(result, Err(DomainError::DuplicateAggregate(_))));
}

#[test]
fn test_triggering_a_finished_release_is_frozen() {
    let world = World::new();
    world.active_asset("a1", "u1");
    world.dispatch(schedule("r1", "u1", &["u1"], &["a1"])).unwrap();
    world.dispatch_at(trigger("r1", day(11)), day(11)).unwrap();

    let result = world.dispatch_at(trigger("r1", day(12)), day(12));

    assert!(matches!(result, Err(DomainError::FrozenAggregate { .. })));
}

#[test]
fn test_forged_command_timestamp_cannot_bypass_a_time_condition() {
    // Arrange
    let world = World::new();
    world.active_asset("a1", "u1");
    world.dispatch(schedule("r1", "u1", &["u1"], &["a1"])).unwrap();

    // Act: the command claims day 11; the engine clock says day 3.
    let result = world.dispatch_at(trigger("r1", day(11)), day(3));

    // Assert
    assert!(matches!(result, Err(DomainError::RuleViolation(_))));
    let release = world.releases.get(&ReleaseId::from("r1")).unwrap();
    assert_eq!(release.state(), LifecycleState::Active);
}

#[test]
fn test_default_context_wires_production_collaborators() {
    // Arrange
    let world = World::new();
    let mut ctx = HandlerContext::with_defaults(
        UnitOfWork::new(Box::new(world.assets.repository())),
        UnitOfWork::new(Box::new(world.releases.repository())),
        Arc::clone(&world.contacts) as Arc<dyn ContactDirectory>,
    );

    // Act
    let report = world
        .bus
        .handle(
            Command::from(CreateAsset {
                correlation_id: Uuid::new_v4(),
                issued_at: day(1),
                asset_id: AssetId::from("a1"),
                owners: BTreeSet::from([UserId::from("u1")]),
                title: "diary".to_owned(),
                description: String::new(),
            }),
            &mut ctx,
        )
        .unwrap();

    // Assert
    assert!(report.is_clean());
    assert!(world.assets.get(&AssetId::from("a1")).is_some());
}
