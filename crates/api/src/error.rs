use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dashlens_app::StateError;
use dashlens_core::operation::{OperationResult, ValidationErrors};
use serde_json::json;

use crate::response::Reply;

/// Application-level error type for HTTP handlers.
///
/// Handlers answer with an `OperationResult` envelope for every expected
/// outcome; only the cases below bypass the normal handler flow.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The unit of work was driven into an illegal state. A bug, never a
    /// client error.
    #[error(transparent)]
    State(#[from] StateError),

    /// The request could not be read into its command or query: a body that
    /// is not the expected JSON, a query value of the wrong type, a path id
    /// that is not a UUID, or a body id contradicting the path.
    #[error("Malformed {field}: {message}")]
    Malformed { field: &'static str, message: String },
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn malformed(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Malformed {
            field,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::State(err) => {
                tracing::error!(error = %err, "Unit of work misuse");
                let body = json!({
                    "error": "An internal error occurred",
                    "code": "INTERNAL_ERROR",
                });
                (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
            }
            AppError::Malformed { field, message } => {
                tracing::debug!(field, %message, "Rejected malformed request");
                let mut errors = ValidationErrors::new();
                errors.insert(field.to_string(), vec![message]);
                Reply::<()>::ok(OperationResult::validation_failure(errors)).into_response()
            }
        }
    }
}
