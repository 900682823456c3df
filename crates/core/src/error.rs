use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with ID {id} not found.")]
    NotFound { entity: &'static str, id: DbId },

    /// An entity invariant was violated (the input error of the domain layer).
    #[error("{0}")]
    Validation(String),
}
