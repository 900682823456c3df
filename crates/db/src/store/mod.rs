//! The storage seam.
//!
//! A [`Store`] hands out read sessions and transactions. The unit of work
//! drives a transaction through [`StoreTransaction::apply`] and never sees
//! SQL. Two backends exist: [`postgres::PgStore`] for production and
//! [`memory::MemoryStore`] for tests and database-less local runs.

use async_trait::async_trait;
use dashlens_core::types::DbId;

use crate::change::Change;
use crate::criteria::{ComponentCriteria, DashboardCriteria};
use crate::error::DbError;
use crate::models::component::{ComponentRow, ComponentSummary};
use crate::models::dashboard::{DashboardRow, DashboardSummary};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Read access to persisted rows.
///
/// Plain lists are ordered by `(created_at, id)` ascending.
#[async_trait]
pub trait ReadSession: Send {
    async fn find_dashboard(&mut self, id: DbId) -> Result<Option<DashboardRow>, DbError>;

    async fn list_dashboards(&mut self) -> Result<Vec<DashboardRow>, DbError>;

    async fn find_component(&mut self, id: DbId) -> Result<Option<ComponentRow>, DbError>;

    /// Components of one dashboard, or of all dashboards when `None`.
    async fn list_components(
        &mut self,
        dashboard_id: Option<DbId>,
    ) -> Result<Vec<ComponentRow>, DbError>;

    /// Matching dashboards (one page if requested) and the total match count.
    async fn query_dashboards(
        &mut self,
        criteria: &DashboardCriteria,
    ) -> Result<(Vec<DashboardSummary>, u64), DbError>;

    async fn query_components(
        &mut self,
        criteria: &ComponentCriteria,
    ) -> Result<Vec<ComponentSummary>, DbError>;
}

/// A backend transaction. Reads see its own uncommitted writes.
///
/// Dropping a transaction without committing discards it.
#[async_trait]
pub trait StoreTransaction: ReadSession {
    fn as_reader(&mut self) -> &mut dyn ReadSession;

    /// Apply one change, returning the number of rows written.
    ///
    /// Updates and deletes that match nothing fail with [`DbError::Stale`].
    async fn apply(&mut self, change: &Change) -> Result<u64, DbError>;

    async fn commit(self: Box<Self>) -> Result<(), DbError>;

    async fn rollback(self: Box<Self>) -> Result<(), DbError>;
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Short name for logs (`"postgres"`, `"memory"`).
    fn backend(&self) -> &'static str;

    async fn reader(&self) -> Result<Box<dyn ReadSession>, DbError>;

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DbError>;

    async fn ping(&self) -> Result<(), DbError>;
}

/// Map a zero-row update/delete onto [`DbError::Stale`].
pub(crate) fn expect_rows(change: &Change, rows: u64) -> Result<u64, DbError> {
    if rows == 0 {
        return Err(DbError::Stale {
            entity: change.entity(),
            id: change.entity_id(),
        });
    }
    Ok(rows)
}
