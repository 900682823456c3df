pub mod component;
pub mod dashboard;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /dashboards                                     list, create
/// /dashboards/paged                               paged list with name filter
/// /dashboards/{id}                                get, update, delete (cascade)
/// /dashboards/{id}/components                     list by dashboard, add
///
/// /components                                     list all
/// /components/{id}                                get, update, remove
/// /components/{id}/status                         change status (PUT)
/// /components/{id}/dashboard                      move to dashboard (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dashboards", dashboard::router())
        .nest("/components", component::router())
}
