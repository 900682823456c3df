use dashlens_core::error::CoreError;
use dashlens_core::types::DbId;

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The caller passed an argument the store cannot act on (nil id).
    #[error("{0}")]
    InvalidArgument(String),

    #[error("A transaction is already active.")]
    TransactionAlreadyActive,

    #[error("No active transaction.")]
    NoActiveTransaction,

    #[error("The operation was cancelled.")]
    Cancelled,

    /// An update or delete matched no row.
    #[error("{entity} with ID {id} no longer exists.")]
    Stale { entity: &'static str, id: DbId },

    #[error("{entity} with ID {id} already exists.")]
    Duplicate { entity: &'static str, id: DbId },

    /// A row references a parent that does not exist.
    #[error("{0}")]
    ForeignKey(String),

    /// A stored value could not be mapped back onto the domain model.
    #[error("Invalid stored value: {0}")]
    Decode(String),
}

impl DbError {
    /// Misuse of the unit-of-work transaction state machine.
    pub fn is_state_error(&self) -> bool {
        matches!(self, Self::TransactionAlreadyActive | Self::NoActiveTransaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transaction_misuse_is_a_state_error() {
        assert!(DbError::TransactionAlreadyActive.is_state_error());
        assert!(DbError::NoActiveTransaction.is_state_error());
        assert!(!DbError::Cancelled.is_state_error());
        assert!(!DbError::Sqlx(sqlx::Error::RowNotFound).is_state_error());
    }

    #[test]
    fn stale_message_names_the_row() {
        let err = DbError::Stale {
            entity: "Dashboard",
            id: DbId::nil(),
        };
        assert_eq!(
            err.to_string(),
            "Dashboard with ID 00000000-0000-0000-0000-000000000000 no longer exists."
        );
    }
}
