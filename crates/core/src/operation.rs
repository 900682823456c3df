//! The `OperationResult` envelope returned by every command and query
//! handler.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::types::DbId;

/// Fixed message carried by a validation failure.
pub const VALIDATION_FAILED: &str = "Validation failed";

/// Machine-readable category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureCode {
    /// A referenced entity does not exist.
    NotFound,
    /// The request was well-formed but broke a domain rule.
    Invalid,
    /// Anything else: store failures, cancellation, bugs.
    Internal,
}

/// Field name to list of messages.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

/// Outcome of a handler. Exactly one of data, error, or validation errors
/// is present.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Success(T),
    Failure {
        code: FailureCode,
        message: String,
        details: Option<String>,
    },
    ValidationFailure(ValidationErrors),
}

impl<T> OperationResult<T> {
    pub fn success(data: T) -> Self {
        Self::Success(data)
    }

    /// A generic failure (`INTERNAL`).
    pub fn failure(message: impl Into<String>, details: Option<String>) -> Self {
        Self::Failure {
            code: FailureCode::Internal,
            message: message.into(),
            details,
        }
    }

    /// A rejected request (`INVALID`).
    pub fn invalid(message: impl Into<String>, details: Option<String>) -> Self {
        Self::Failure {
            code: FailureCode::Invalid,
            message: message.into(),
            details,
        }
    }

    /// `"{entity} with ID {id} not found."`
    pub fn not_found(entity: &str, id: DbId) -> Self {
        Self::Failure {
            code: FailureCode::NotFound,
            message: format!("{entity} with ID {id} not found."),
            details: None,
        }
    }

    pub fn validation_failure(errors: ValidationErrors) -> Self {
        Self::ValidationFailure(errors)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<FailureCode> {
        match self {
            Self::Failure { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { message, .. } => Some(message),
            Self::ValidationFailure(_) => Some(VALIDATION_FAILED),
        }
    }

    pub fn error_details(&self) -> Option<&str> {
        match self {
            Self::Failure { details, .. } => details.as_deref(),
            _ => None,
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::ValidationFailure(errors) => Some(errors),
            _ => None,
        }
    }

    /// Transform the success payload, keeping failures as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        match self {
            Self::Success(data) => OperationResult::Success(f(data)),
            Self::Failure {
                code,
                message,
                details,
            } => OperationResult::Failure {
                code,
                message,
                details,
            },
            Self::ValidationFailure(errors) => OperationResult::ValidationFailure(errors),
        }
    }
}

/// Wire shape: a flat object with `is_success` and whichever of the payload
/// fields apply.
#[derive(Serialize)]
struct Envelope<'a, T> {
    is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<FailureCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_details: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation_errors: Option<&'a ValidationErrors>,
}

impl<T: Serialize> Serialize for OperationResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Envelope {
            is_success: self.is_success(),
            data: self.data(),
            error_code: self.code(),
            error_message: self.error_message(),
            error_details: self.error_details(),
            validation_errors: self.validation_errors(),
        }
        .serialize(serializer)
    }
}
