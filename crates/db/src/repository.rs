//! Generic repository over a unit of work.
//!
//! Reads go straight to the store (through the active transaction when
//! there is one). Writes are only staged; nothing reaches the store until
//! [`UnitOfWork::save_changes`] or a commit.

use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use async_trait::async_trait;
use dashlens_core::component::DashboardComponent;
use dashlens_core::dashboard::Dashboard;
use dashlens_core::entity::Entity;
use dashlens_core::error::CoreError;
use dashlens_core::types::DbId;

use crate::change::Change;
use crate::criteria::{ComponentCriteria, DashboardCriteria};
use crate::error::DbError;
use crate::models::component::{ComponentRow, ComponentSummary};
use crate::models::dashboard::{DashboardRow, DashboardSummary};
use crate::store::ReadSession;
use crate::unit_of_work::UnitOfWork;

/// Maps an entity kind onto store reads and staged changes.
#[async_trait]
pub trait Persisted: Entity + Sized + Send {
    async fn fetch(session: &mut dyn ReadSession, id: DbId) -> Result<Option<Self>, DbError>;

    async fn fetch_all(session: &mut dyn ReadSession) -> Result<Vec<Self>, DbError>;

    fn insert_changes(&self) -> Vec<Change>;

    /// Changes that bring the stored copy in line with `self`.
    async fn update_changes(&self, session: &mut dyn ReadSession) -> Result<Vec<Change>, DbError>;

    fn delete_changes(&self) -> Vec<Change>;
}

fn to_components(rows: Vec<ComponentRow>) -> Result<Vec<DashboardComponent>, DbError> {
    rows.into_iter().map(DashboardComponent::try_from).collect()
}

#[async_trait]
impl Persisted for Dashboard {
    async fn fetch(session: &mut dyn ReadSession, id: DbId) -> Result<Option<Self>, DbError> {
        let Some(row) = session.find_dashboard(id).await? else {
            return Ok(None);
        };
        let components = to_components(session.list_components(Some(id)).await?)?;
        Ok(Some(row.into_entity(components)))
    }

    async fn fetch_all(session: &mut dyn ReadSession) -> Result<Vec<Self>, DbError> {
        let rows = session.list_dashboards().await?;
        let mut by_dashboard: HashMap<DbId, Vec<DashboardComponent>> = HashMap::new();
        for component in to_components(session.list_components(None).await?)? {
            by_dashboard
                .entry(component.dashboard_id())
                .or_default()
                .push(component);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let components = by_dashboard.remove(&row.id).unwrap_or_default();
                row.into_entity(components)
            })
            .collect())
    }

    /// The dashboard row followed by every component it already holds.
    fn insert_changes(&self) -> Vec<Change> {
        std::iter::once(Change::InsertDashboard(DashboardRow::from(self)))
            .chain(
                self.components()
                    .iter()
                    .map(|c| Change::InsertComponent(ComponentRow::from(c))),
            )
            .collect()
    }

    /// The dashboard row, then the components gained or lost since it was
    /// stored. A gained component that is stored under another dashboard is
    /// re-parented rather than inserted. Fields of components it kept are
    /// left alone; those go through the component repository.
    async fn update_changes(&self, session: &mut dyn ReadSession) -> Result<Vec<Change>, DbError> {
        let stored = session.list_components(Some(self.id())).await?;
        let stored_ids: HashSet<DbId> = stored.iter().map(|row| row.id).collect();
        let held_ids: HashSet<DbId> = self.components().iter().map(Entity::id).collect();

        let mut changes = vec![Change::UpdateDashboard(DashboardRow::from(self))];
        for component in self.components() {
            if stored_ids.contains(&component.id()) {
                continue;
            }
            let row = ComponentRow::from(component);
            changes.push(match session.find_component(component.id()).await? {
                Some(_) => Change::UpdateComponent(row),
                None => Change::InsertComponent(row),
            });
        }
        changes.extend(
            stored
                .iter()
                .filter(|row| !held_ids.contains(&row.id))
                .map(|row| Change::DeleteComponent(row.id)),
        );
        Ok(changes)
    }

    /// Components go with it.
    fn delete_changes(&self) -> Vec<Change> {
        vec![Change::DeleteDashboard(self.id())]
    }
}

#[async_trait]
impl Persisted for DashboardComponent {
    async fn fetch(session: &mut dyn ReadSession, id: DbId) -> Result<Option<Self>, DbError> {
        session
            .find_component(id)
            .await?
            .map(DashboardComponent::try_from)
            .transpose()
    }

    async fn fetch_all(session: &mut dyn ReadSession) -> Result<Vec<Self>, DbError> {
        to_components(session.list_components(None).await?)
    }

    fn insert_changes(&self) -> Vec<Change> {
        vec![Change::InsertComponent(ComponentRow::from(self))]
    }

    async fn update_changes(&self, _session: &mut dyn ReadSession) -> Result<Vec<Change>, DbError> {
        Ok(vec![Change::UpdateComponent(ComponentRow::from(self))])
    }

    fn delete_changes(&self) -> Vec<Change> {
        vec![Change::DeleteComponent(self.id())]
    }
}

/// Repository for one entity kind, borrowing the unit of work it stages into.
pub struct Repository<'u, T> {
    uow: &'u mut UnitOfWork,
    _entity: PhantomData<fn() -> T>,
}

impl<'u, T: Persisted> Repository<'u, T> {
    pub(crate) fn new(uow: &'u mut UnitOfWork) -> Self {
        Self {
            uow,
            _entity: PhantomData,
        }
    }

    /// Load one entity. A nil id is rejected as an invalid argument.
    pub async fn get_by_id(&mut self, id: DbId) -> Result<Option<T>, DbError> {
        require_id(T::KIND, id)?;
        let mut session = self.uow.session().await?;
        T::fetch(session.reader(), id).await
    }

    /// Load one entity that must exist.
    pub async fn require(&mut self, id: DbId) -> Result<T, DbError> {
        self.get_by_id(id).await?.ok_or(DbError::Core(CoreError::NotFound {
            entity: T::KIND,
            id,
        }))
    }

    /// Load every entity of this kind, oldest first.
    pub async fn get_all(&mut self) -> Result<Vec<T>, DbError> {
        let mut session = self.uow.session().await?;
        T::fetch_all(session.reader()).await
    }

    pub fn add(&mut self, entity: &T) {
        self.uow.stage(entity.insert_changes());
    }

    /// Stage the writes that make the stored copy match `entity`, worked
    /// out against what the store (or the open transaction) holds now.
    pub async fn update(&mut self, entity: &T) -> Result<(), DbError> {
        let changes = {
            let mut session = self.uow.session().await?;
            entity.update_changes(session.reader()).await?
        };
        self.uow.stage(changes);
        Ok(())
    }

    pub fn delete(&mut self, entity: &T) {
        self.uow.stage(entity.delete_changes());
    }
}

impl Repository<'_, Dashboard> {
    /// Dashboards with component counts, filtered, ordered and optionally
    /// paged. Also returns the total number of matches.
    pub async fn query(
        &mut self,
        criteria: &DashboardCriteria,
    ) -> Result<(Vec<DashboardSummary>, u64), DbError> {
        let mut session = self.uow.session().await?;
        session.reader().query_dashboards(criteria).await
    }
}

impl Repository<'_, DashboardComponent> {
    /// Components of one dashboard, oldest first.
    pub async fn get_by_dashboard_id(
        &mut self,
        dashboard_id: DbId,
    ) -> Result<Vec<DashboardComponent>, DbError> {
        require_id("Dashboard", dashboard_id)?;
        let mut session = self.uow.session().await?;
        to_components(session.reader().list_components(Some(dashboard_id)).await?)
    }

    /// Components with their dashboard names, filtered and ordered.
    pub async fn query(
        &mut self,
        criteria: &ComponentCriteria,
    ) -> Result<Vec<ComponentSummary>, DbError> {
        let mut session = self.uow.session().await?;
        session.reader().query_components(criteria).await
    }
}

fn require_id(kind: &str, id: DbId) -> Result<(), DbError> {
    if id.is_nil() {
        return Err(DbError::InvalidArgument(format!("{kind} ID cannot be empty.")));
    }
    Ok(())
}
