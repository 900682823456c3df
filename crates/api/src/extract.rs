//! Extractors that reject unreadable input with a `ValidationFailure`
//! envelope rather than axum's plain-text rejection.
//!
//! Handlers take [`Body`], [`Params`] and [`Id`] where they would otherwise
//! take `Json`, `Query` and `Path<DbId>`.

use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use dashlens_core::types::DbId;
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// A JSON request body.
#[derive(Debug, Clone)]
pub struct Body<T>(pub T);

impl<S, T> FromRequest<S> for Body<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::malformed("body", rejection.body_text()))?;
        Ok(Body(value))
    }
}

/// Query-string parameters.
#[derive(Debug, Clone)]
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::malformed("query", rejection.body_text()))?;
        Ok(Params(value))
    }
}

/// The `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct Id(pub DbId);

impl<S> FromRequestParts<S> for Id
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<DbId>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(error = %rejection.body_text(), "Unreadable path id");
                AppError::malformed("id", "ID must be a valid UUID.")
            })?;
        Ok(Id(id))
    }
}
