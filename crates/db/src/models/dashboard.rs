use dashlens_core::component::DashboardComponent;
use dashlens_core::dashboard::Dashboard;
use dashlens_core::entity::Entity;
use dashlens_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `dashboards` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DashboardRow {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
}

impl DashboardRow {
    /// Rehydrate the entity with its already-loaded components.
    pub fn into_entity(self, components: Vec<DashboardComponent>) -> Dashboard {
        Dashboard::from_parts(
            self.id,
            self.name,
            self.description,
            self.created_at,
            components,
        )
    }
}

impl From<&Dashboard> for DashboardRow {
    fn from(dashboard: &Dashboard) -> Self {
        Self {
            id: dashboard.id(),
            name: dashboard.name().to_owned(),
            description: dashboard.description().to_owned(),
            created_at: dashboard.created_at(),
        }
    }
}

/// A dashboard with the number of components it owns.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct DashboardSummary {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    pub component_count: i64,
}
