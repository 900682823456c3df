//! Repository and unit-of-work tests against a real PostgreSQL database.
//!
//! Each test gets a fresh database with the migrations applied.

use std::sync::Arc;

use assert_matches::assert_matches;
use dashlens_core::component::{ComponentStatus, ComponentType, DashboardComponent};
use dashlens_core::dashboard::Dashboard;
use dashlens_core::entity::Entity;
use dashlens_core::paging::PageRequest;
use dashlens_core::types::new_id;
use dashlens_db::criteria::{ComponentCriteria, ComponentSort, DashboardCriteria, DashboardSort, SortDirection};
use dashlens_db::store::PgStore;
use dashlens_db::{DbError, UnitOfWork};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

fn new_uow(pool: &PgPool) -> UnitOfWork {
    UnitOfWork::new(Arc::new(PgStore::new(pool.clone())))
}

async fn create_dashboard(pool: &PgPool, name: &str, components: &[(&str, ComponentType)]) -> Dashboard {
    let mut d = Dashboard::new(new_id(), name, "").unwrap();
    for (component_name, component_type) in components {
        let c = DashboardComponent::new(new_id(), *component_name, "", *component_type, d.id())
            .unwrap();
        d.add_component(c).unwrap();
    }
    let mut uow = new_uow(pool);
    uow.dashboards().add(&d);
    uow.save_changes(&CancellationToken::new()).await.unwrap();
    d
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_passes(pool: PgPool) {
    dashlens_db::health_check(&pool).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_round_trip_keeps_all_fields(pool: PgPool) {
    let d = create_dashboard(&pool, "Sales", &[("Revenue Chart", ComponentType::Chart)]).await;

    let mut uow = new_uow(&pool);
    let loaded = uow.dashboards().get_by_id(d.id()).await.unwrap().unwrap();
    assert_eq!(loaded.name(), "Sales");
    assert_eq!(loaded.description(), "");
    assert_eq!(loaded.created_at(), d.created_at());
    assert_eq!(loaded.component_count(), 1);
    assert_eq!(loaded.components()[0].component_type(), ComponentType::Chart);
    assert_eq!(loaded.components()[0].status(), ComponentStatus::Active);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_cascades_to_components(pool: PgPool) {
    let d = create_dashboard(
        &pool,
        "Doomed",
        &[("One Widget", ComponentType::Metric), ("Two Widget", ComponentType::DataGrid)],
    )
    .await;

    let mut uow = new_uow(&pool);
    uow.dashboards().delete(&d);
    uow.save_changes(&CancellationToken::new()).await.unwrap();

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dashboard_components")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_of_missing_row_is_stale(pool: PgPool) {
    let ghost = Dashboard::new(new_id(), "Ghost", "").unwrap();
    let mut uow = new_uow(&pool);
    uow.dashboards().update(&ghost).await.unwrap();

    assert_matches!(
        uow.save_changes(&CancellationToken::new()).await,
        Err(DbError::Stale { entity: "Dashboard", .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rollback_leaves_no_trace(pool: PgPool) {
    let cancel = CancellationToken::new();
    let mut uow = new_uow(&pool);

    uow.begin_transaction(&cancel).await.unwrap();
    let d = Dashboard::new(new_id(), "Rolled Back", "").unwrap();
    uow.dashboards().add(&d);
    uow.save_changes(&cancel).await.unwrap();
    assert!(uow.dashboards().get_by_id(d.id()).await.unwrap().is_some());

    uow.rollback_transaction().await.unwrap();
    assert!(uow.dashboards().get_by_id(d.id()).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn paged_query_with_case_insensitive_filter(pool: PgPool) {
    for i in 0..25 {
        create_dashboard(&pool, &format!("Board {i:02}"), &[]).await;
    }
    create_dashboard(&pool, "Unrelated", &[]).await;

    let criteria = DashboardCriteria {
        name_filter: Some("bOaRd".into()),
        sort: DashboardSort::Name,
        direction: SortDirection::Asc,
        page: Some(PageRequest::new(1, 10)),
    };
    let mut uow = new_uow(&pool);
    let (items, total) = uow.dashboards().query(&criteria).await.unwrap();

    assert_eq!(total, 25);
    assert_eq!(items.len(), 10);
    assert_eq!(items[0].name, "Board 00");
    assert_eq!(items[0].component_count, 0);

    let last_page = DashboardCriteria {
        page: Some(PageRequest::new(3, 10)),
        ..criteria
    };
    let (items, _) = uow.dashboards().query(&last_page).await.unwrap();
    assert_eq!(items.len(), 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn component_query_filters_and_sorts(pool: PgPool) {
    let d = create_dashboard(
        &pool,
        "Mixed",
        &[
            ("Zeta Chart", ComponentType::Chart),
            ("Alpha Metric", ComponentType::Metric),
            ("Beta Chart", ComponentType::Chart),
        ],
    )
    .await;
    create_dashboard(&pool, "Other", &[("Gamma Chart", ComponentType::Chart)]).await;

    let criteria = ComponentCriteria {
        dashboard_id: Some(d.id()),
        component_type: Some(ComponentType::Chart),
        sort: ComponentSort::Name,
        ..ComponentCriteria::default()
    };
    let mut uow = new_uow(&pool);
    let rows = uow.components().query(&criteria).await.unwrap();

    let names: Vec<_> = rows.iter().map(|r| r.component.name.as_str()).collect();
    assert_eq!(names, ["Beta Chart", "Zeta Chart"]);
    assert!(rows.iter().all(|r| r.dashboard_name == "Mixed"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn name_sort_ignores_case(pool: PgPool) {
    for name in ["Zeta", "alpha", "Beta"] {
        create_dashboard(&pool, name, &[]).await;
    }

    let criteria = DashboardCriteria {
        sort: DashboardSort::Name,
        direction: SortDirection::Asc,
        ..DashboardCriteria::default()
    };
    let mut uow = new_uow(&pool);
    let (items, _) = uow.dashboards().query(&criteria).await.unwrap();

    let names: Vec<_> = items.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["alpha", "Beta", "Zeta"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn dashboard_update_writes_components_gained_and_lost(pool: PgPool) {
    let seeded = create_dashboard(
        &pool,
        "Aggregate",
        &[("Kept", ComponentType::Chart), ("Dropped", ComponentType::Metric)],
    )
    .await;
    let dropped = seeded.components()[1].id();

    let mut uow = new_uow(&pool);
    let mut d = uow.dashboards().require(seeded.id()).await.unwrap();
    let gained = DashboardComponent::new(new_id(), "Gained", "", ComponentType::Custom, d.id()).unwrap();
    d.add_component(gained.clone()).unwrap();
    d.remove_component(dropped).unwrap();
    uow.dashboards().update(&d).await.unwrap();
    uow.save_changes(&CancellationToken::new()).await.unwrap();

    let reloaded = uow.dashboards().require(d.id()).await.unwrap();
    let names: Vec<_> = reloaded.components().iter().map(|c| c.name()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Kept") && names.contains(&"Gained"));
    assert!(uow.components().get_by_id(dropped).await.unwrap().is_none());
}
