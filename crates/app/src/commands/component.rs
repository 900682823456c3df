use dashlens_core::component::{ComponentStatus, ComponentType, DashboardComponent};
use dashlens_core::dashboard::Dashboard;
use dashlens_core::entity::Entity;
use dashlens_core::events::DomainEvent;
use dashlens_core::operation::OperationResult;
use dashlens_core::types::{new_id, DbId};
use dashlens_db::UnitOfWork;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::error::StateError;
use crate::outcome::{ensure_live, publish, settle, Handled};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddComponent {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::dashboard_id"))]
    pub dashboard_id: DbId,
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::component_name"))]
    pub name: String,
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::component_description"))]
    pub description: String,
    #[serde(alias = "type", default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::component_type"))]
    pub component_type: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateComponent {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::component_id"))]
    pub id: DbId,
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::component_name"))]
    pub name: String,
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::component_description"))]
    pub description: String,
}

#[derive(Debug, Clone, Validate)]
pub struct RemoveComponent {
    #[validate(custom(function = "crate::validation::component_id"))]
    pub id: DbId,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeComponentStatus {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::component_id"))]
    pub component_id: DbId,
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::component_status"))]
    pub new_status: String,
    #[validate(length(max = 500, message = "Reason cannot exceed 500 characters."))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MoveComponent {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::component_id"))]
    pub component_id: DbId,
    #[serde(default, deserialize_with = "super::nullable")]
    #[validate(custom(function = "crate::validation::target_dashboard_id"))]
    pub target_dashboard_id: DbId,
}

/// Add a component to an existing dashboard and return its new id.
pub async fn add_component(
    uow: &mut UnitOfWork,
    cmd: AddComponent,
    cancel: &CancellationToken,
) -> Result<OperationResult<DbId>, StateError> {
    settle("Failed to add component.", try_add(uow, cmd, cancel).await)
}

async fn try_add(uow: &mut UnitOfWork, cmd: AddComponent, cancel: &CancellationToken) -> Handled<DbId> {
    ensure_live(cancel)?;
    let Some(mut dashboard) = uow.dashboards().get_by_id(cmd.dashboard_id).await? else {
        return Ok(OperationResult::not_found(Dashboard::KIND, cmd.dashboard_id));
    };
    let Ok(component_type) = cmd.component_type.parse::<ComponentType>() else {
        return Ok(OperationResult::invalid(
            format!("Invalid component type: {}", cmd.component_type),
            None,
        ));
    };

    let component = DashboardComponent::new(
        new_id(),
        cmd.name,
        cmd.description,
        component_type,
        dashboard.id(),
    )?;
    let event = dashboard.add_component(component.clone())?;

    uow.components().add(&component);
    uow.save_changes(cancel).await?;

    publish([event]);
    Ok(OperationResult::success(component.id()))
}

/// Rename and/or re-describe a component.
pub async fn update_component(
    uow: &mut UnitOfWork,
    cmd: UpdateComponent,
    cancel: &CancellationToken,
) -> Result<OperationResult<bool>, StateError> {
    settle("Failed to update component.", try_update(uow, cmd, cancel).await)
}

async fn try_update(uow: &mut UnitOfWork, cmd: UpdateComponent, cancel: &CancellationToken) -> Handled<bool> {
    ensure_live(cancel)?;
    let Some(mut component) = uow.components().get_by_id(cmd.id).await? else {
        return Ok(OperationResult::not_found(DashboardComponent::KIND, cmd.id));
    };

    component.update_name(cmd.name)?;
    component.update_description(cmd.description)?;

    uow.components().update(&component).await?;
    uow.save_changes(cancel).await?;
    Ok(OperationResult::success(true))
}

/// Remove a component from its dashboard.
pub async fn remove_component(
    uow: &mut UnitOfWork,
    cmd: RemoveComponent,
    cancel: &CancellationToken,
) -> Result<OperationResult<bool>, StateError> {
    settle("Failed to remove component.", try_remove(uow, cmd, cancel).await)
}

async fn try_remove(uow: &mut UnitOfWork, cmd: RemoveComponent, cancel: &CancellationToken) -> Handled<bool> {
    ensure_live(cancel)?;
    let Some(component) = uow.components().get_by_id(cmd.id).await? else {
        return Ok(OperationResult::not_found(DashboardComponent::KIND, cmd.id));
    };

    let event = match uow.dashboards().get_by_id(component.dashboard_id()).await? {
        Some(mut dashboard) => dashboard.remove_component(component.id()),
        None => None,
    };

    uow.components().delete(&component);
    uow.save_changes(cancel).await?;

    publish(event);
    Ok(OperationResult::success(true))
}

/// Move a component to a new status. Re-applying the current status is a
/// successful no-op.
pub async fn change_component_status(
    uow: &mut UnitOfWork,
    cmd: ChangeComponentStatus,
    cancel: &CancellationToken,
) -> Result<OperationResult<bool>, StateError> {
    settle(
        "Failed to change component status.",
        try_change_status(uow, cmd, cancel).await,
    )
}

async fn try_change_status(
    uow: &mut UnitOfWork,
    cmd: ChangeComponentStatus,
    cancel: &CancellationToken,
) -> Handled<bool> {
    ensure_live(cancel)?;
    let Some(mut component) = uow.components().get_by_id(cmd.component_id).await? else {
        return Ok(OperationResult::not_found(DashboardComponent::KIND, cmd.component_id));
    };
    let Ok(new_status) = cmd.new_status.parse::<ComponentStatus>() else {
        return Ok(OperationResult::invalid(
            format!("Invalid component status: {}", cmd.new_status),
            None,
        ));
    };

    let Some(event) = component.change_status(new_status, cmd.reason.as_deref()) else {
        tracing::debug!(component_id = %cmd.component_id, status = %new_status, "Status unchanged");
        return Ok(OperationResult::success(true));
    };

    uow.components().update(&component).await?;
    uow.save_changes(cancel).await?;

    publish([event]);
    Ok(OperationResult::success(true))
}

/// Reassign a component to another dashboard inside an explicit
/// transaction: both dashboards are checked and the move commits as one.
pub async fn move_component(
    uow: &mut UnitOfWork,
    cmd: MoveComponent,
    cancel: &CancellationToken,
) -> Result<OperationResult<bool>, StateError> {
    settle("Failed to move component.", try_move(uow, cmd, cancel).await)
}

async fn try_move(uow: &mut UnitOfWork, cmd: MoveComponent, cancel: &CancellationToken) -> Handled<bool> {
    ensure_live(cancel)?;
    uow.begin_transaction(cancel).await?;

    let outcome = match move_within_transaction(uow, &cmd, cancel).await {
        Ok(outcome) => outcome,
        Err(e) => {
            abandon(uow).await;
            return Err(e);
        }
    };

    let events = match outcome {
        OperationResult::Success(events) => events,
        failed => {
            abandon(uow).await;
            return Ok(failed.map(|_| false));
        }
    };

    uow.commit_transaction(cancel).await?;

    tracing::info!(
        component_id = %cmd.component_id,
        target_dashboard_id = %cmd.target_dashboard_id,
        "Component moved"
    );
    publish(events);
    Ok(OperationResult::success(true))
}

async fn move_within_transaction(
    uow: &mut UnitOfWork,
    cmd: &MoveComponent,
    cancel: &CancellationToken,
) -> Handled<Vec<DomainEvent>> {
    let Some(mut component) = uow.components().get_by_id(cmd.component_id).await? else {
        return Ok(OperationResult::not_found(DashboardComponent::KIND, cmd.component_id));
    };
    let source_id = component.dashboard_id();
    if source_id == cmd.target_dashboard_id {
        return Ok(OperationResult::success(Vec::new()));
    }

    let mut source = uow.dashboards().require(source_id).await?;
    let Some(mut target) = uow.dashboards().get_by_id(cmd.target_dashboard_id).await? else {
        return Ok(OperationResult::not_found(Dashboard::KIND, cmd.target_dashboard_id));
    };

    component.move_to_dashboard(target.id())?;
    let mut events: Vec<DomainEvent> = source.remove_component(component.id()).into_iter().collect();
    events.push(target.add_component(component.clone())?);

    uow.components().update(&component).await?;
    uow.save_changes(cancel).await?;
    Ok(OperationResult::success(events))
}

/// Roll back after a failed move. The original outcome is what the caller
/// sees, so a rollback failure is only logged.
async fn abandon(uow: &mut UnitOfWork) {
    if let Err(e) = uow.rollback_transaction().await {
        tracing::warn!(error = %e, "Rollback of component move failed");
    }
}
