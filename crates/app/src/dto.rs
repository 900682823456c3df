//! Response shapes returned by the query handlers.

use dashlens_core::component::DashboardComponent;
use dashlens_core::dashboard::Dashboard;
use dashlens_core::entity::Entity;
use dashlens_core::types::{DbId, Timestamp};
use dashlens_db::models::component::ComponentSummary;
use dashlens_db::models::dashboard::DashboardSummary;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardDto {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_at: Timestamp,
    /// Zero when the query did not ask for counts.
    pub component_count: u64,
}

impl From<&Dashboard> for DashboardDto {
    fn from(dashboard: &Dashboard) -> Self {
        Self {
            id: dashboard.id(),
            name: dashboard.name().to_owned(),
            description: dashboard.description().to_owned(),
            created_at: dashboard.created_at(),
            component_count: dashboard.component_count() as u64,
        }
    }
}

impl DashboardDto {
    pub(crate) fn from_summary(summary: DashboardSummary, include_count: bool) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            description: summary.description,
            created_at: summary.created_at,
            component_count: if include_count {
                summary.component_count.max(0) as u64
            } else {
                0
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentDto {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub component_type: String,
    pub status: String,
    pub created_at: Timestamp,
    pub dashboard_id: DbId,
    /// Empty when the query did not ask for it.
    pub dashboard_name: String,
}

impl ComponentDto {
    pub(crate) fn from_entity(component: &DashboardComponent, dashboard_name: String) -> Self {
        Self {
            id: component.id(),
            name: component.name().to_owned(),
            description: component.description().to_owned(),
            component_type: component.component_type().to_string(),
            status: component.status().to_string(),
            created_at: component.created_at(),
            dashboard_id: component.dashboard_id(),
            dashboard_name,
        }
    }

    pub(crate) fn from_summary(summary: ComponentSummary, include_dashboard_name: bool) -> Self {
        let row = summary.component;
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            component_type: row.component_type,
            status: row.status,
            created_at: row.created_at,
            dashboard_id: row.dashboard_id,
            dashboard_name: if include_dashboard_name {
                summary.dashboard_name
            } else {
                String::new()
            },
        }
    }
}
