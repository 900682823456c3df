//! Staged writes awaiting `save_changes`.

use dashlens_core::types::DbId;

use crate::models::component::ComponentRow;
use crate::models::dashboard::DashboardRow;

/// A single pending write, applied by a store transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    InsertDashboard(DashboardRow),
    UpdateDashboard(DashboardRow),
    DeleteDashboard(DbId),
    InsertComponent(ComponentRow),
    UpdateComponent(ComponentRow),
    DeleteComponent(DbId),
}

impl Change {
    /// Entity kind the change targets.
    pub fn entity(&self) -> &'static str {
        match self {
            Self::InsertDashboard(_) | Self::UpdateDashboard(_) | Self::DeleteDashboard(_) => {
                "Dashboard"
            }
            Self::InsertComponent(_) | Self::UpdateComponent(_) | Self::DeleteComponent(_) => {
                "Component"
            }
        }
    }

    pub fn entity_id(&self) -> DbId {
        match self {
            Self::InsertDashboard(row) | Self::UpdateDashboard(row) => row.id,
            Self::InsertComponent(row) | Self::UpdateComponent(row) => row.id,
            Self::DeleteDashboard(id) | Self::DeleteComponent(id) => *id,
        }
    }
}

/// Ordered log of staged changes. Changes are applied in staging order.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    changes: Vec<Change>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&mut self, change: Change) {
        tracing::trace!(entity = change.entity(), id = %change.entity_id(), "Change staged");
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }
}

impl Extend<Change> for ChangeTracker {
    fn extend<I: IntoIterator<Item = Change>>(&mut self, iter: I) {
        for change in iter {
            self.stage(change);
        }
    }
}
