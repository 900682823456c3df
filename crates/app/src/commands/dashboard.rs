use dashlens_core::dashboard::Dashboard;
use dashlens_core::entity::Entity;
use dashlens_core::operation::OperationResult;
use dashlens_core::types::{new_id, DbId};
use dashlens_db::UnitOfWork;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::error::StateError;
use crate::outcome::{ensure_live, settle, Handled};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDashboard {
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::dashboard_name"))]
    pub name: String,
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::dashboard_description"))]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDashboard {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::dashboard_id"))]
    pub id: DbId,
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::dashboard_name"))]
    pub name: String,
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::dashboard_description"))]
    pub description: String,
}

#[derive(Debug, Clone, Validate)]
pub struct DeleteDashboard {
    #[validate(custom(function = "crate::validation::dashboard_id"))]
    pub id: DbId,
}

/// Create a dashboard and return its new id.
pub async fn create_dashboard(
    uow: &mut UnitOfWork,
    cmd: CreateDashboard,
    cancel: &CancellationToken,
) -> Result<OperationResult<DbId>, StateError> {
    settle("Failed to create dashboard.", try_create(uow, cmd, cancel).await)
}

async fn try_create(uow: &mut UnitOfWork, cmd: CreateDashboard, cancel: &CancellationToken) -> Handled<DbId> {
    ensure_live(cancel)?;
    let dashboard = Dashboard::new(new_id(), cmd.name, cmd.description)?;

    uow.dashboards().add(&dashboard);
    uow.save_changes(cancel).await?;

    tracing::info!(dashboard_id = %dashboard.id(), name = dashboard.name(), "Dashboard created");
    Ok(OperationResult::success(dashboard.id()))
}

/// Rename and/or re-describe a dashboard.
pub async fn update_dashboard(
    uow: &mut UnitOfWork,
    cmd: UpdateDashboard,
    cancel: &CancellationToken,
) -> Result<OperationResult<bool>, StateError> {
    settle("Failed to update dashboard.", try_update(uow, cmd, cancel).await)
}

async fn try_update(uow: &mut UnitOfWork, cmd: UpdateDashboard, cancel: &CancellationToken) -> Handled<bool> {
    ensure_live(cancel)?;
    let Some(mut dashboard) = uow.dashboards().get_by_id(cmd.id).await? else {
        return Ok(OperationResult::not_found(Dashboard::KIND, cmd.id));
    };

    dashboard.update_name(cmd.name)?;
    dashboard.update_description(cmd.description)?;

    uow.dashboards().update(&dashboard).await?;
    uow.save_changes(cancel).await?;

    tracing::info!(dashboard_id = %cmd.id, "Dashboard updated");
    Ok(OperationResult::success(true))
}

/// Delete a dashboard together with all of its components.
pub async fn delete_dashboard(
    uow: &mut UnitOfWork,
    cmd: DeleteDashboard,
    cancel: &CancellationToken,
) -> Result<OperationResult<bool>, StateError> {
    settle("Failed to delete dashboard.", try_delete(uow, cmd, cancel).await)
}

async fn try_delete(uow: &mut UnitOfWork, cmd: DeleteDashboard, cancel: &CancellationToken) -> Handled<bool> {
    ensure_live(cancel)?;
    let Some(dashboard) = uow.dashboards().get_by_id(cmd.id).await? else {
        return Ok(OperationResult::not_found(Dashboard::KIND, cmd.id));
    };

    uow.dashboards().delete(&dashboard);
    uow.save_changes(cancel).await?;

    tracing::info!(
        dashboard_id = %cmd.id,
        components = dashboard.component_count(),
        "Dashboard deleted"
    );
    Ok(OperationResult::success(true))
}
