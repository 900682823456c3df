//! Maps handler outcomes onto HTTP responses.
//!
//! Every body is the serialized [`OperationResult`] envelope; only the
//! status code varies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dashlens_core::operation::{FailureCode, OperationResult};
use serde::Serialize;

/// An [`OperationResult`] plus the status to use when it succeeded.
#[derive(Debug)]
pub struct Reply<T> {
    pub outcome: OperationResult<T>,
    pub success: StatusCode,
}

impl<T> Reply<T> {
    /// 200 on success.
    pub fn ok(outcome: OperationResult<T>) -> Self {
        Self {
            outcome,
            success: StatusCode::OK,
        }
    }

    /// 201 on success.
    pub fn created(outcome: OperationResult<T>) -> Self {
        Self {
            outcome,
            success: StatusCode::CREATED,
        }
    }

    fn status(&self) -> StatusCode {
        match &self.outcome {
            OperationResult::Success(_) => self.success,
            OperationResult::ValidationFailure(_) => StatusCode::BAD_REQUEST,
            OperationResult::Failure { code, .. } => match code {
                FailureCode::NotFound => StatusCode::NOT_FOUND,
                FailureCode::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
                FailureCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self.outcome)).into_response()
    }
}
