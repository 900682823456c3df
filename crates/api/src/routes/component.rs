//! Route definitions for the `/components` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::component;
use crate::state::AppState;

/// Routes mounted at `/components`.
///
/// ```text
/// GET    /                        -> list
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> remove
/// PUT    /{id}/status             -> change_status
/// PUT    /{id}/dashboard          -> move_to_dashboard
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(component::list))
        .route(
            "/{id}",
            get(component::get_by_id)
                .put(component::update)
                .delete(component::remove),
        )
        .route("/{id}/status", put(component::change_status))
        .route("/{id}/dashboard", put(component::move_to_dashboard))
}
