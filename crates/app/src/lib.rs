//! Command and query handlers.
//!
//! Every handler takes a [`UnitOfWork`](dashlens_db::UnitOfWork), its input
//! and a cancellation token, and answers with an
//! [`OperationResult`](dashlens_core::operation::OperationResult). Only
//! misuse of the unit-of-work transaction state escapes as an error
//! ([`StateError`]); everything else, from a missing row to a dropped
//! database connection, comes back as a `Failure`.

pub mod commands;
pub mod dto;
pub mod error;
mod outcome;
pub mod queries;
pub mod validation;

pub use error::StateError;
