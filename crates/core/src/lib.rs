//! Dashlens domain core.
//!
//! Pure domain logic with no database or HTTP dependencies: entity identity,
//! the `Dashboard` and `DashboardComponent` entities with their invariants,
//! domain events, and the response envelopes shared by every handler.

pub mod component;
pub mod dashboard;
pub mod entity;
pub mod error;
pub mod events;
pub mod operation;
pub mod paging;
pub mod types;
pub mod validation;
