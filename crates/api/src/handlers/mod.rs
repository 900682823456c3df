pub mod component;
pub mod dashboard;

use dashlens_core::types::DbId;

use crate::error::AppError;

/// Reconcile the id in the path with the one a body may carry. A body id of
/// nil means "not given".
fn path_id(path: DbId, body: DbId) -> Result<DbId, AppError> {
    if !body.is_nil() && body != path {
        return Err(AppError::malformed(
            "id",
            format!("ID in body ({body}) does not match ID in path ({path})."),
        ));
    }
    Ok(path)
}
