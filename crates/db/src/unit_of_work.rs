//! Unit of work: one change tracker plus at most one open transaction.
//!
//! ```text
//! NoTransaction --begin_transaction--> TransactionActive
//! TransactionActive --commit_transaction | rollback_transaction--> NoTransaction
//! ```
//!
//! Without an explicit transaction, [`UnitOfWork::save_changes`] wraps the
//! staged changes in a transaction of its own. With one open, it flushes
//! into that transaction and the writes become visible on commit.

use std::sync::Arc;

use dashlens_core::component::DashboardComponent;
use dashlens_core::dashboard::Dashboard;
use tokio_util::sync::CancellationToken;

use crate::change::{Change, ChangeTracker};
use crate::error::DbError;
use crate::repository::Repository;
use crate::store::{ReadSession, Store, StoreTransaction};

pub struct UnitOfWork {
    store: Arc<dyn Store>,
    tracker: ChangeTracker,
    transaction: Option<Box<dyn StoreTransaction>>,
}

/// Where repository reads are served from.
pub(crate) enum Session<'a> {
    Transaction(&'a mut (dyn StoreTransaction + 'static)),
    Standalone(Box<dyn ReadSession>),
}

impl Session<'_> {
    pub(crate) fn reader(&mut self) -> &mut dyn ReadSession {
        match self {
            Session::Transaction(tx) => tx.as_reader(),
            Session::Standalone(reader) => reader.as_mut(),
        }
    }
}

impl UnitOfWork {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            tracker: ChangeTracker::new(),
            transaction: None,
        }
    }

    pub fn dashboards(&mut self) -> Repository<'_, Dashboard> {
        Repository::new(self)
    }

    pub fn components(&mut self) -> Repository<'_, DashboardComponent> {
        Repository::new(self)
    }

    pub fn has_active_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    /// Number of changes staged and not yet saved.
    pub fn pending_changes(&self) -> usize {
        self.tracker.len()
    }

    pub(crate) fn stage(&mut self, changes: Vec<Change>) {
        self.tracker.extend(changes);
    }

    pub(crate) async fn session(&mut self) -> Result<Session<'_>, DbError> {
        match self.transaction.as_deref_mut() {
            Some(tx) => Ok(Session::Transaction(tx)),
            None => Ok(Session::Standalone(self.store.reader().await?)),
        }
    }

    /// Persist every staged change atomically. Returns the number of rows
    /// written; nothing staged writes nothing.
    ///
    /// On failure the staged changes are kept.
    pub async fn save_changes(&mut self, cancel: &CancellationToken) -> Result<u64, DbError> {
        if self.tracker.is_empty() {
            return Ok(0);
        }
        if cancel.is_cancelled() {
            return Err(DbError::Cancelled);
        }

        if let Some(tx) = self.transaction.as_deref_mut() {
            let rows = flush(tx, self.tracker.changes()).await?;
            self.tracker.clear();
            tracing::debug!(rows, "Changes flushed into active transaction");
            return Ok(rows);
        }

        let mut tx = self.store.begin().await?;
        let rows = match flush(tx.as_mut(), self.tracker.changes()).await {
            Ok(rows) => rows,
            Err(e) => {
                discard(tx).await;
                return Err(e);
            }
        };
        tx.commit().await?;

        tracing::debug!(rows, changes = self.tracker.len(), "Changes saved");
        self.tracker.clear();
        Ok(rows)
    }

    pub async fn begin_transaction(&mut self, cancel: &CancellationToken) -> Result<(), DbError> {
        if self.transaction.is_some() {
            return Err(DbError::TransactionAlreadyActive);
        }
        if cancel.is_cancelled() {
            return Err(DbError::Cancelled);
        }

        self.transaction = Some(self.store.begin().await?);
        tracing::debug!(backend = self.store.backend(), "Transaction started");
        Ok(())
    }

    /// Flush staged changes and commit. If either step fails the
    /// transaction is rolled back, staged changes are dropped and the
    /// original error is returned.
    pub async fn commit_transaction(&mut self, cancel: &CancellationToken) -> Result<(), DbError> {
        let mut tx = self.transaction.take().ok_or(DbError::NoActiveTransaction)?;

        if cancel.is_cancelled() {
            self.tracker.clear();
            discard(tx).await;
            return Err(DbError::Cancelled);
        }

        if let Err(e) = flush(tx.as_mut(), self.tracker.changes()).await {
            tracing::warn!(error = %e, "Flush failed, rolling back transaction");
            self.tracker.clear();
            discard(tx).await;
            return Err(e);
        }
        self.tracker.clear();

        tx.commit().await?;
        tracing::debug!("Transaction committed");
        Ok(())
    }

    /// Discard the open transaction and everything staged.
    pub async fn rollback_transaction(&mut self) -> Result<(), DbError> {
        let tx = self.transaction.take().ok_or(DbError::NoActiveTransaction)?;
        self.tracker.clear();
        tx.rollback().await?;
        tracing::debug!("Transaction rolled back");
        Ok(())
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            tracing::warn!(
                pending = self.tracker.len(),
                "Unit of work dropped with an open transaction; discarding it"
            );
        }
    }
}

async fn flush(tx: &mut dyn StoreTransaction, changes: &[Change]) -> Result<u64, DbError> {
    let mut rows = 0;
    for change in changes {
        rows += tx.apply(change).await?;
    }
    Ok(rows)
}

/// Roll back after a failure. A rollback error is logged; the caller
/// reports the failure that caused it.
async fn discard(tx: Box<dyn StoreTransaction>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "Rollback failed");
    }
}
