use dashlens_core::component::{ComponentStatus, ComponentType, DashboardComponent};
use dashlens_core::entity::Entity;
use dashlens_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::error::DbError;

/// A row from the `dashboard_components` table. Type and status are stored
/// as their variant names.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ComponentRow {
    pub id: DbId,
    pub dashboard_id: DbId,
    pub name: String,
    pub description: String,
    pub component_type: String,
    pub status: String,
    pub created_at: Timestamp,
}

impl From<&DashboardComponent> for ComponentRow {
    fn from(component: &DashboardComponent) -> Self {
        Self {
            id: component.id(),
            dashboard_id: component.dashboard_id(),
            name: component.name().to_owned(),
            description: component.description().to_owned(),
            component_type: component.component_type().as_str().to_owned(),
            status: component.status().as_str().to_owned(),
            created_at: component.created_at(),
        }
    }
}

impl TryFrom<ComponentRow> for DashboardComponent {
    type Error = DbError;

    fn try_from(row: ComponentRow) -> Result<Self, Self::Error> {
        let component_type: ComponentType = row
            .component_type
            .parse()
            .map_err(|e: dashlens_core::error::CoreError| DbError::Decode(e.to_string()))?;
        let status: ComponentStatus = row
            .status
            .parse()
            .map_err(|e: dashlens_core::error::CoreError| DbError::Decode(e.to_string()))?;

        Ok(DashboardComponent::from_parts(
            row.id,
            row.dashboard_id,
            row.name,
            row.description,
            component_type,
            status,
            row.created_at,
        ))
    }
}

/// A component row joined with the name of its dashboard.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct ComponentSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub component: ComponentRow,
    pub dashboard_name: String,
}
