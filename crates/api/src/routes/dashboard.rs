//! Route definitions for the `/dashboards` resource, including the
//! components nested under each dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::{component, dashboard};
use crate::state::AppState;

/// Routes mounted at `/dashboards`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /paged                   -> paged
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
///
/// GET    /{id}/components         -> component::list_by_dashboard
/// POST   /{id}/components         -> component::add
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::list).post(dashboard::create))
        .route("/paged", get(dashboard::paged))
        .route(
            "/{id}",
            get(dashboard::get_by_id)
                .put(dashboard::update)
                .delete(dashboard::delete),
        )
        .route(
            "/{id}/components",
            get(component::list_by_dashboard).post(component::add),
        )
}
