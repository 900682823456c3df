//! The handler boundary: turns persistence errors into `OperationResult`s.

use dashlens_core::error::CoreError;
use dashlens_core::events::DomainEvent;
use dashlens_core::operation::OperationResult;
use dashlens_db::DbError;
use tokio_util::sync::CancellationToken;

use crate::error::StateError;

/// What a handler body produces before the boundary runs.
pub(crate) type Handled<T> = Result<OperationResult<T>, DbError>;

/// Convert a handler body's result into its public form.
///
/// `failed` is the generic message used for every error-derived failure,
/// e.g. `"Failed to create dashboard."`; the error text goes into the
/// details.
pub(crate) fn settle<T>(failed: &'static str, result: Handled<T>) -> Result<OperationResult<T>, StateError> {
    let err = match result {
        Ok(outcome) => return Ok(outcome),
        Err(err) if err.is_state_error() => return Err(StateError(err)),
        Err(err) => err,
    };

    match err {
        DbError::Core(CoreError::NotFound { entity, id }) => {
            Ok(OperationResult::not_found(entity, id))
        }
        DbError::Core(CoreError::Validation(msg)) | DbError::InvalidArgument(msg) => {
            tracing::warn!(error = %msg, "{failed}");
            Ok(OperationResult::invalid(failed, Some(msg)))
        }
        other => {
            tracing::error!(error = %other, "{failed}");
            Ok(OperationResult::failure(failed, Some(other.to_string())))
        }
    }
}

/// Bail out before touching the store if the caller has given up.
pub(crate) fn ensure_live(cancel: &CancellationToken) -> Result<(), DbError> {
    if cancel.is_cancelled() {
        return Err(DbError::Cancelled);
    }
    Ok(())
}

/// Events are not dispatched anywhere yet; they are logged once the change
/// that raised them is durable.
pub(crate) fn publish(events: impl IntoIterator<Item = DomainEvent>) {
    for event in events {
        tracing::debug!(
            event = event.name(),
            event_id = %event.event_id,
            payload = ?event.kind,
            "Domain event raised"
        );
    }
}
