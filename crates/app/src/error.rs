use dashlens_db::DbError;

/// The unit of work was driven through an illegal transaction sequence.
///
/// Signals a bug in the caller, so handlers pass it on instead of folding it
/// into a `Failure`.
#[derive(Debug, thiserror::Error)]
#[error("Illegal unit-of-work state: {0}")]
pub struct StateError(#[source] pub DbError);
