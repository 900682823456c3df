//! Unit-of-work behaviour against the in-memory store.
//!
//! Covers implicit saves, the explicit transaction state machine, cascade
//! delete and read-your-writes inside a transaction.

use std::sync::Arc;

use assert_matches::assert_matches;
use dashlens_core::component::{ComponentStatus, ComponentType, DashboardComponent};
use dashlens_core::dashboard::Dashboard;
use dashlens_core::entity::Entity;
use dashlens_core::types::{new_id, DbId};
use dashlens_db::store::MemoryStore;
use dashlens_db::{DbError, UnitOfWork};
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_uow(store: &MemoryStore) -> UnitOfWork {
    UnitOfWork::new(Arc::new(store.clone()))
}

fn dashboard(name: &str) -> Dashboard {
    Dashboard::new(new_id(), name, "").unwrap()
}

fn component(dashboard_id: DbId, name: &str) -> DashboardComponent {
    DashboardComponent::new(new_id(), name, "", ComponentType::Chart, dashboard_id).unwrap()
}

async fn seed(store: &MemoryStore, name: &str, components: usize) -> Dashboard {
    let cancel = CancellationToken::new();
    let mut uow = new_uow(store);
    let mut d = dashboard(name);
    for i in 0..components {
        d.add_component(component(d.id(), &format!("Widget {i}")))
            .unwrap();
    }
    uow.dashboards().add(&d);
    uow.save_changes(&cancel).await.unwrap();
    d
}

// ---------------------------------------------------------------------------
// Implicit mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_changes_persists_staged_entities() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let mut uow = new_uow(&store);

    let d = dashboard("Sales");
    uow.dashboards().add(&d);
    assert_eq!(uow.pending_changes(), 1);

    let rows = uow.save_changes(&cancel).await.unwrap();
    assert_eq!(rows, 1);
    assert_eq!(uow.pending_changes(), 0);

    let mut other = new_uow(&store);
    let loaded = other.dashboards().get_by_id(d.id()).await.unwrap().unwrap();
    assert_eq!(loaded.name(), "Sales");
    assert_eq!(loaded.created_at(), d.created_at());
}

#[tokio::test]
async fn staged_changes_are_invisible_until_saved() {
    let store = MemoryStore::new();
    let mut uow = new_uow(&store);

    let d = dashboard("Pending");
    uow.dashboards().add(&d);

    assert!(uow.dashboards().get_by_id(d.id()).await.unwrap().is_none());
}

#[tokio::test]
async fn save_with_nothing_staged_writes_nothing() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let mut uow = new_uow(&store);

    assert_eq!(uow.save_changes(&cancel).await.unwrap(), 0);
    assert_eq!(uow.save_changes(&cancel).await.unwrap(), 0);
}

#[tokio::test]
async fn failed_save_is_atomic_and_keeps_staged_changes() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let mut uow = new_uow(&store);

    let good = dashboard("Good");
    let ghost = dashboard("Ghost");
    uow.dashboards().add(&good);
    uow.dashboards().update(&ghost).await.unwrap();

    assert_matches!(
        uow.save_changes(&cancel).await,
        Err(DbError::Stale { entity: "Dashboard", id }) if id == ghost.id()
    );
    assert_eq!(uow.pending_changes(), 2);
    assert!(uow.dashboards().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn cancelled_save_does_not_touch_the_store() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut uow = new_uow(&store);

    uow.dashboards().add(&dashboard("Never"));
    assert_matches!(uow.save_changes(&cancel).await, Err(DbError::Cancelled));
    assert!(uow.dashboards().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn get_by_id_rejects_nil() {
    let store = MemoryStore::new();
    let mut uow = new_uow(&store);

    assert_matches!(
        uow.dashboards().get_by_id(DbId::nil()).await,
        Err(DbError::InvalidArgument(msg)) if msg == "Dashboard ID cannot be empty."
    );
    assert_matches!(
        uow.components().get_by_dashboard_id(DbId::nil()).await,
        Err(DbError::InvalidArgument(_))
    );
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn dashboards_load_with_components_in_creation_order() {
    let store = MemoryStore::new();
    let d = seed(&store, "Ops", 3).await;

    let mut uow = new_uow(&store);
    let loaded = uow.dashboards().get_by_id(d.id()).await.unwrap().unwrap();
    let names: Vec<_> = loaded.components().iter().map(|c| c.name()).collect();
    assert_eq!(names, ["Widget 0", "Widget 1", "Widget 2"]);

    let all = uow.dashboards().get_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].component_count(), 3);
}

#[tokio::test]
async fn deleting_a_dashboard_removes_its_components() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let d = seed(&store, "Doomed", 4).await;

    let mut uow = new_uow(&store);
    uow.dashboards().delete(&d);
    uow.save_changes(&cancel).await.unwrap();

    assert!(uow.components().get_all().await.unwrap().is_empty());
    assert!(uow
        .components()
        .get_by_dashboard_id(d.id())
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn component_updates_round_trip() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let d = seed(&store, "Status", 1).await;
    let component_id = d.components()[0].id();

    let mut uow = new_uow(&store);
    let mut c = uow.components().get_by_id(component_id).await.unwrap().unwrap();
    assert!(c.mark_as_error("timeout").is_some());
    uow.components().update(&c).await.unwrap();
    uow.save_changes(&cancel).await.unwrap();

    let reloaded = uow.components().get_by_id(component_id).await.unwrap().unwrap();
    assert_eq!(reloaded.status(), ComponentStatus::Error);
}

#[tokio::test]
async fn dashboard_update_writes_components_gained_and_lost() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let seeded = seed(&store, "Aggregate", 2).await;
    let dropped = seeded.components()[0].id();

    let mut uow = new_uow(&store);
    let mut d = uow.dashboards().require(seeded.id()).await.unwrap();
    let gained = component(d.id(), "Gained");
    d.add_component(gained.clone()).unwrap();
    assert!(d.remove_component(dropped).is_some());
    uow.dashboards().update(&d).await.unwrap();
    uow.save_changes(&cancel).await.unwrap();

    let reloaded = uow.dashboards().require(d.id()).await.unwrap();
    let ids: Vec<DbId> = reloaded.components().iter().map(Entity::id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&seeded.components()[1].id()));
    assert!(ids.contains(&gained.id()));
    assert!(uow.components().get_by_id(dropped).await.unwrap().is_none());
}

#[tokio::test]
async fn dashboard_update_reparents_a_component_from_elsewhere() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let source = seed(&store, "Source", 1).await;
    let target = seed(&store, "Target", 0).await;
    let mut moved = source.components()[0].clone();

    let mut uow = new_uow(&store);
    let mut d = uow.dashboards().require(target.id()).await.unwrap();
    moved.move_to_dashboard(d.id()).unwrap();
    d.add_component(moved.clone()).unwrap();
    uow.dashboards().update(&d).await.unwrap();
    uow.save_changes(&cancel).await.unwrap();

    assert_eq!(uow.dashboards().require(target.id()).await.unwrap().component_count(), 1);
    assert_eq!(uow.dashboards().require(source.id()).await.unwrap().component_count(), 0);
}

// ---------------------------------------------------------------------------
// Explicit transactions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn begin_twice_is_a_state_error() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let mut uow = new_uow(&store);

    uow.begin_transaction(&cancel).await.unwrap();
    let err = uow.begin_transaction(&cancel).await.unwrap_err();
    assert_matches!(err, DbError::TransactionAlreadyActive);
    assert!(err.is_state_error());
    assert!(uow.has_active_transaction());
}

#[tokio::test]
async fn commit_or_rollback_without_transaction_is_a_state_error() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let mut uow = new_uow(&store);

    assert_matches!(
        uow.commit_transaction(&cancel).await,
        Err(DbError::NoActiveTransaction)
    );
    assert_matches!(uow.rollback_transaction().await, Err(DbError::NoActiveTransaction));
}

#[tokio::test]
async fn saves_inside_a_transaction_become_visible_on_commit() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let mut uow = new_uow(&store);
    let mut observer = new_uow(&store);

    uow.begin_transaction(&cancel).await.unwrap();
    let d = dashboard("Staged");
    uow.dashboards().add(&d);
    uow.save_changes(&cancel).await.unwrap();

    // Readable inside the transaction, not outside it.
    assert!(uow.dashboards().get_by_id(d.id()).await.unwrap().is_some());
    assert!(observer.dashboards().get_by_id(d.id()).await.unwrap().is_none());

    uow.commit_transaction(&cancel).await.unwrap();
    assert!(!uow.has_active_transaction());
    assert!(observer.dashboards().get_by_id(d.id()).await.unwrap().is_some());
}

#[tokio::test]
async fn commit_flushes_changes_still_staged() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let mut uow = new_uow(&store);

    uow.begin_transaction(&cancel).await.unwrap();
    let d = dashboard("Flushed");
    uow.dashboards().add(&d);
    uow.commit_transaction(&cancel).await.unwrap();

    assert_eq!(uow.pending_changes(), 0);
    assert!(new_uow(&store)
        .dashboards()
        .get_by_id(d.id())
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn rollback_discards_everything() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let mut uow = new_uow(&store);

    uow.begin_transaction(&cancel).await.unwrap();
    let saved = dashboard("Saved");
    uow.dashboards().add(&saved);
    uow.save_changes(&cancel).await.unwrap();
    uow.dashboards().add(&dashboard("Staged"));

    uow.rollback_transaction().await.unwrap();
    assert!(!uow.has_active_transaction());
    assert_eq!(uow.pending_changes(), 0);
    assert!(uow.dashboards().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_commit_rolls_back_and_returns_the_cause() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let mut uow = new_uow(&store);

    uow.begin_transaction(&cancel).await.unwrap();
    uow.dashboards().add(&dashboard("Partial"));
    uow.dashboards().delete(&dashboard("Missing"));

    assert_matches!(
        uow.commit_transaction(&cancel).await,
        Err(DbError::Stale { .. })
    );
    assert!(!uow.has_active_transaction());
    assert!(uow.dashboards().get_all().await.unwrap().is_empty());

    // Back in the idle state: a new transaction can start.
    uow.begin_transaction(&cancel).await.unwrap();
}

#[tokio::test]
async fn dropping_an_open_transaction_discards_it() {
    let store = MemoryStore::new();
    let cancel = CancellationToken::new();
    let d = dashboard("Abandoned");

    {
        let mut uow = new_uow(&store);
        uow.begin_transaction(&cancel).await.unwrap();
        uow.dashboards().add(&d);
        uow.save_changes(&cancel).await.unwrap();
    }

    let mut uow = new_uow(&store);
    assert!(uow.dashboards().get_by_id(d.id()).await.unwrap().is_none());
}
