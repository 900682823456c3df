//! Handlers for components, both nested under `/dashboards/{id}` and at
//! `/components`.

use axum::extract::State;
use dashlens_app::commands::{
    self, AddComponent, ChangeComponentStatus, MoveComponent, RemoveComponent, UpdateComponent,
};
use dashlens_app::dto::ComponentDto;
use dashlens_app::queries::{
    self, GetAllComponents, GetComponentById, GetComponentsByDashboardId,
};
use dashlens_app::validation::reject;
use dashlens_core::types::DbId;

use super::path_id;
use crate::error::AppResult;
use crate::extract::{Body, Id, Params};
use crate::response::Reply;
use crate::state::AppState;

/// POST /api/v1/dashboards/{id}/components
pub async fn add(
    State(state): State<AppState>,
    Id(dashboard_id): Id,
    Body(mut input): Body<AddComponent>,
) -> AppResult<Reply<DbId>> {
    input.dashboard_id = path_id(dashboard_id, input.dashboard_id)?;
    if let Some(rejected) = reject(&input) {
        return Ok(Reply::created(rejected));
    }
    let outcome =
        commands::add_component(&mut state.unit_of_work(), input, &state.request_token()).await?;
    Ok(Reply::created(outcome))
}

/// GET /api/v1/dashboards/{id}/components
pub async fn list_by_dashboard(
    State(state): State<AppState>,
    Id(dashboard_id): Id,
    Params(mut params): Params<GetComponentsByDashboardId>,
) -> AppResult<Reply<Vec<ComponentDto>>> {
    params.dashboard_id = dashboard_id;
    if let Some(rejected) = reject(&params) {
        return Ok(Reply::ok(rejected));
    }
    let outcome = queries::get_components_by_dashboard_id(
        &mut state.unit_of_work(),
        params,
        &state.request_token(),
    )
    .await?;
    Ok(Reply::ok(outcome))
}

/// GET /api/v1/components
pub async fn list(
    State(state): State<AppState>,
    Params(params): Params<GetAllComponents>,
) -> AppResult<Reply<Vec<ComponentDto>>> {
    if let Some(rejected) = reject(&params) {
        return Ok(Reply::ok(rejected));
    }
    let outcome =
        queries::get_all_components(&mut state.unit_of_work(), params, &state.request_token())
            .await?;
    Ok(Reply::ok(outcome))
}

/// GET /api/v1/components/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Id(id): Id,
) -> AppResult<Reply<ComponentDto>> {
    let query = GetComponentById { id };
    if let Some(rejected) = reject(&query) {
        return Ok(Reply::ok(rejected));
    }
    let outcome =
        queries::get_component_by_id(&mut state.unit_of_work(), query, &state.request_token())
            .await?;
    Ok(Reply::ok(outcome))
}

/// PUT /api/v1/components/{id}
pub async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    Body(mut input): Body<UpdateComponent>,
) -> AppResult<Reply<bool>> {
    input.id = path_id(id, input.id)?;
    if let Some(rejected) = reject(&input) {
        return Ok(Reply::ok(rejected));
    }
    let outcome =
        commands::update_component(&mut state.unit_of_work(), input, &state.request_token())
            .await?;
    Ok(Reply::ok(outcome))
}

/// DELETE /api/v1/components/{id}
pub async fn remove(State(state): State<AppState>, Id(id): Id) -> AppResult<Reply<bool>> {
    let cmd = RemoveComponent { id };
    if let Some(rejected) = reject(&cmd) {
        return Ok(Reply::ok(rejected));
    }
    let outcome =
        commands::remove_component(&mut state.unit_of_work(), cmd, &state.request_token()).await?;
    Ok(Reply::ok(outcome))
}

/// PUT /api/v1/components/{id}/status
pub async fn change_status(
    State(state): State<AppState>,
    Id(id): Id,
    Body(mut input): Body<ChangeComponentStatus>,
) -> AppResult<Reply<bool>> {
    input.component_id = path_id(id, input.component_id)?;
    if let Some(rejected) = reject(&input) {
        return Ok(Reply::ok(rejected));
    }
    let outcome = commands::change_component_status(
        &mut state.unit_of_work(),
        input,
        &state.request_token(),
    )
    .await?;
    Ok(Reply::ok(outcome))
}

/// PUT /api/v1/components/{id}/dashboard
pub async fn move_to_dashboard(
    State(state): State<AppState>,
    Id(id): Id,
    Body(mut input): Body<MoveComponent>,
) -> AppResult<Reply<bool>> {
    input.component_id = path_id(id, input.component_id)?;
    if let Some(rejected) = reject(&input) {
        return Ok(Reply::ok(rejected));
    }
    let outcome =
        commands::move_component(&mut state.unit_of_work(), input, &state.request_token()).await?;
    Ok(Reply::ok(outcome))
}
