//! In-memory backend.
//!
//! Keeps committed rows behind a mutex. A transaction works on a private
//! copy of the state and records every change it applies; commit replays
//! that log against the latest committed state, so a transaction that
//! conflicts with one committed in the meantime fails instead of
//! overwriting it.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use dashlens_core::types::DbId;

use super::{expect_rows, ReadSession, Store, StoreTransaction};
use crate::change::Change;
use crate::criteria::{
    ComponentCriteria, ComponentSort, DashboardCriteria, DashboardSort, SortDirection,
};
use crate::error::DbError;
use crate::models::component::{ComponentRow, ComponentSummary};
use crate::models::dashboard::{DashboardRow, DashboardSummary};

#[derive(Debug, Clone, Default)]
struct State {
    dashboards: HashMap<DbId, DashboardRow>,
    components: HashMap<DbId, ComponentRow>,
}

fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

impl State {
    fn find_dashboard(&self, id: DbId) -> Option<DashboardRow> {
        self.dashboards.get(&id).cloned()
    }

    fn list_dashboards(&self) -> Vec<DashboardRow> {
        let mut rows: Vec<_> = self.dashboards.values().cloned().collect();
        rows.sort_by_key(|r| (r.created_at, r.id));
        rows
    }

    fn find_component(&self, id: DbId) -> Option<ComponentRow> {
        self.components.get(&id).cloned()
    }

    fn list_components(&self, dashboard_id: Option<DbId>) -> Vec<ComponentRow> {
        let mut rows: Vec<_> = self
            .components
            .values()
            .filter(|c| dashboard_id.is_none_or(|id| c.dashboard_id == id))
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.created_at, r.id));
        rows
    }

    fn component_count(&self, dashboard_id: DbId) -> i64 {
        self.components
            .values()
            .filter(|c| c.dashboard_id == dashboard_id)
            .count() as i64
    }

    fn query_dashboards(&self, criteria: &DashboardCriteria) -> (Vec<DashboardSummary>, u64) {
        let needle = criteria.name_filter.as_deref().map(str::to_lowercase);
        let mut matches: Vec<&DashboardRow> = self
            .dashboards
            .values()
            .filter(|d| {
                needle
                    .as_deref()
                    .is_none_or(|n| d.name.to_lowercase().contains(n))
            })
            .collect();

        matches.sort_by(|a, b| {
            let primary = match criteria.sort {
                DashboardSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                DashboardSort::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            directed(primary.then(a.id.cmp(&b.id)), criteria.direction)
        });

        let total = matches.len() as u64;
        let (skip, take) = match criteria.page {
            Some(page) => (page.offset() as usize, page.limit() as usize),
            None => (0, usize::MAX),
        };

        let items = matches
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|d| DashboardSummary {
                id: d.id,
                name: d.name.clone(),
                description: d.description.clone(),
                created_at: d.created_at,
                component_count: self.component_count(d.id),
            })
            .collect();

        (items, total)
    }

    fn query_components(&self, criteria: &ComponentCriteria) -> Vec<ComponentSummary> {
        let mut matches: Vec<&ComponentRow> = self
            .components
            .values()
            .filter(|c| criteria.dashboard_id.is_none_or(|id| c.dashboard_id == id))
            .filter(|c| {
                criteria
                    .component_type
                    .is_none_or(|t| c.component_type == t.as_str())
            })
            .filter(|c| criteria.status.is_none_or(|s| c.status == s.as_str()))
            .collect();

        matches.sort_by(|a, b| {
            let primary = match criteria.sort {
                ComponentSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                ComponentSort::Type => a.component_type.cmp(&b.component_type),
                ComponentSort::Status => a.status.cmp(&b.status),
                ComponentSort::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            directed(primary.then(a.id.cmp(&b.id)), criteria.direction)
        });

        matches
            .into_iter()
            .filter_map(|c| {
                let dashboard = self.dashboards.get(&c.dashboard_id)?;
                Some(ComponentSummary {
                    component: c.clone(),
                    dashboard_name: dashboard.name.clone(),
                })
            })
            .collect()
    }

    fn require_dashboard(&self, id: DbId) -> Result<(), DbError> {
        if self.dashboards.contains_key(&id) {
            Ok(())
        } else {
            Err(DbError::ForeignKey(format!(
                "Dashboard with ID {id} does not exist."
            )))
        }
    }

    fn apply(&mut self, change: &Change) -> Result<u64, DbError> {
        let rows = match change {
            Change::InsertDashboard(row) => {
                if self.dashboards.contains_key(&row.id) {
                    return Err(DbError::Duplicate {
                        entity: "Dashboard",
                        id: row.id,
                    });
                }
                self.dashboards.insert(row.id, row.clone());
                1
            }
            Change::UpdateDashboard(row) => match self.dashboards.get_mut(&row.id) {
                Some(existing) => {
                    existing.name.clone_from(&row.name);
                    existing.description.clone_from(&row.description);
                    1
                }
                None => 0,
            },
            Change::DeleteDashboard(id) => match self.dashboards.remove(id) {
                Some(_) => {
                    self.components.retain(|_, c| c.dashboard_id != *id);
                    1
                }
                None => 0,
            },
            Change::InsertComponent(row) => {
                if self.components.contains_key(&row.id) {
                    return Err(DbError::Duplicate {
                        entity: "Component",
                        id: row.id,
                    });
                }
                self.require_dashboard(row.dashboard_id)?;
                self.components.insert(row.id, row.clone());
                1
            }
            Change::UpdateComponent(row) => {
                if !self.components.contains_key(&row.id) {
                    0
                } else {
                    self.require_dashboard(row.dashboard_id)?;
                    if let Some(existing) = self.components.get_mut(&row.id) {
                        existing.dashboard_id = row.dashboard_id;
                        existing.name.clone_from(&row.name);
                        existing.description.clone_from(&row.description);
                        existing.status.clone_from(&row.status);
                    }
                    1
                }
            }
            Change::DeleteComponent(id) => u64::from(self.components.remove(id).is_some()),
        };
        expect_rows(change, rows)
    }
}

/// Store holding every row in process memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn reader(&self) -> Result<Box<dyn ReadSession>, DbError> {
        Ok(Box::new(MemoryReader {
            shared: Arc::clone(&self.state),
        }))
    }

    async fn begin(&self) -> Result<Box<dyn StoreTransaction>, DbError> {
        let working = lock(&self.state).clone();
        Ok(Box::new(MemoryTransaction {
            shared: Arc::clone(&self.state),
            working,
            log: Vec::new(),
        }))
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}

/// Reads the latest committed state on every call.
pub struct MemoryReader {
    shared: Arc<Mutex<State>>,
}

pub struct MemoryTransaction {
    shared: Arc<Mutex<State>>,
    working: State,
    log: Vec<Change>,
}

impl MemoryReader {
    fn view(&self) -> MutexGuard<'_, State> {
        lock(&self.shared)
    }
}

impl MemoryTransaction {
    fn view(&self) -> &State {
        &self.working
    }
}

/// Implement [`ReadSession`] over the `State` returned by the session's
/// `view()`.
macro_rules! state_reads {
    ($ty:ty) => {
        #[async_trait]
        impl ReadSession for $ty {
            async fn find_dashboard(&mut self, id: DbId) -> Result<Option<DashboardRow>, DbError> {
                Ok(self.view().find_dashboard(id))
            }

            async fn list_dashboards(&mut self) -> Result<Vec<DashboardRow>, DbError> {
                Ok(self.view().list_dashboards())
            }

            async fn find_component(&mut self, id: DbId) -> Result<Option<ComponentRow>, DbError> {
                Ok(self.view().find_component(id))
            }

            async fn list_components(
                &mut self,
                dashboard_id: Option<DbId>,
            ) -> Result<Vec<ComponentRow>, DbError> {
                Ok(self.view().list_components(dashboard_id))
            }

            async fn query_dashboards(
                &mut self,
                criteria: &DashboardCriteria,
            ) -> Result<(Vec<DashboardSummary>, u64), DbError> {
                Ok(self.view().query_dashboards(criteria))
            }

            async fn query_components(
                &mut self,
                criteria: &ComponentCriteria,
            ) -> Result<Vec<ComponentSummary>, DbError> {
                Ok(self.view().query_components(criteria))
            }
        }
    };
}

state_reads!(MemoryReader);
state_reads!(MemoryTransaction);

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    fn as_reader(&mut self) -> &mut dyn ReadSession {
        self
    }

    async fn apply(&mut self, change: &Change) -> Result<u64, DbError> {
        let rows = self.working.apply(change)?;
        self.log.push(change.clone());
        Ok(rows)
    }

    async fn commit(self: Box<Self>) -> Result<(), DbError> {
        let mut shared = lock(&self.shared);
        let mut next = shared.clone();
        for change in &self.log {
            next.apply(change)?;
        }
        *shared = next;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DbError> {
        Ok(())
    }
}
