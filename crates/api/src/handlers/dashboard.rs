//! Handlers for the `/dashboards` resource.

use axum::extract::State;
use dashlens_app::commands::{self, CreateDashboard, DeleteDashboard, UpdateDashboard};
use dashlens_app::dto::DashboardDto;
use dashlens_app::queries::{self, GetAllDashboards, GetDashboardById, GetDashboardsPaged};
use dashlens_app::validation::reject;
use dashlens_core::paging::PagedResult;
use dashlens_core::types::DbId;

use super::path_id;
use crate::error::AppResult;
use crate::extract::{Body, Id, Params};
use crate::response::Reply;
use crate::state::AppState;

/// POST /api/v1/dashboards
pub async fn create(
    State(state): State<AppState>,
    Body(input): Body<CreateDashboard>,
) -> AppResult<Reply<DbId>> {
    if let Some(rejected) = reject(&input) {
        return Ok(Reply::created(rejected));
    }
    let outcome =
        commands::create_dashboard(&mut state.unit_of_work(), input, &state.request_token()).await?;
    Ok(Reply::created(outcome))
}

/// GET /api/v1/dashboards
pub async fn list(
    State(state): State<AppState>,
    Params(params): Params<GetAllDashboards>,
) -> AppResult<Reply<Vec<DashboardDto>>> {
    if let Some(rejected) = reject(&params) {
        return Ok(Reply::ok(rejected));
    }
    let outcome =
        queries::get_all_dashboards(&mut state.unit_of_work(), params, &state.request_token()).await?;
    Ok(Reply::ok(outcome))
}

/// GET /api/v1/dashboards/paged
pub async fn paged(
    State(state): State<AppState>,
    Params(params): Params<GetDashboardsPaged>,
) -> AppResult<Reply<PagedResult<DashboardDto>>> {
    if let Some(rejected) = reject(&params) {
        return Ok(Reply::ok(rejected));
    }
    let outcome =
        queries::get_dashboards_paged(&mut state.unit_of_work(), params, &state.request_token())
            .await?;
    Ok(Reply::ok(outcome))
}

/// GET /api/v1/dashboards/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Id(id): Id,
) -> AppResult<Reply<DashboardDto>> {
    let query = GetDashboardById { id };
    if let Some(rejected) = reject(&query) {
        return Ok(Reply::ok(rejected));
    }
    let outcome =
        queries::get_dashboard_by_id(&mut state.unit_of_work(), query, &state.request_token())
            .await?;
    Ok(Reply::ok(outcome))
}

/// PUT /api/v1/dashboards/{id}
pub async fn update(
    State(state): State<AppState>,
    Id(id): Id,
    Body(mut input): Body<UpdateDashboard>,
) -> AppResult<Reply<bool>> {
    input.id = path_id(id, input.id)?;
    if let Some(rejected) = reject(&input) {
        return Ok(Reply::ok(rejected));
    }
    let outcome =
        commands::update_dashboard(&mut state.unit_of_work(), input, &state.request_token()).await?;
    Ok(Reply::ok(outcome))
}

/// DELETE /api/v1/dashboards/{id}
pub async fn delete(State(state): State<AppState>, Id(id): Id) -> AppResult<Reply<bool>> {
    let cmd = DeleteDashboard { id };
    if let Some(rejected) = reject(&cmd) {
        return Ok(Reply::ok(rejected));
    }
    let outcome =
        commands::delete_dashboard(&mut state.unit_of_work(), cmd, &state.request_token()).await?;
    Ok(Reply::ok(outcome))
}
