use dashlens_core::component::DashboardComponent;
use dashlens_core::entity::Entity;
use dashlens_core::operation::OperationResult;
use dashlens_core::types::DbId;
use dashlens_db::criteria::{ComponentCriteria, ComponentSort, SortDirection};
use dashlens_db::UnitOfWork;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use super::{default_sort_by, default_true, filter, ordering};
use crate::dto::ComponentDto;
use crate::error::StateError;
use crate::outcome::{ensure_live, settle, Handled};

const DEFAULT_ORDER: (ComponentSort, SortDirection) = (ComponentSort::CreatedAt, SortDirection::Asc);

#[derive(Debug, Clone, Validate)]
pub struct GetComponentById {
    #[validate(custom(function = "crate::validation::component_id"))]
    pub id: DbId,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetComponentsByDashboardId {
    #[serde(default)]
    #[validate(custom(function = "crate::validation::dashboard_id"))]
    pub dashboard_id: DbId,
    #[validate(custom(function = "crate::validation::type_filter"))]
    pub type_filter: Option<String>,
    #[validate(custom(function = "crate::validation::status_filter"))]
    pub status_filter: Option<String>,
    #[serde(default = "default_sort_by")]
    #[validate(custom(function = "crate::validation::component_sort"))]
    pub sort_by: String,
    #[serde(default = "default_asc")]
    #[validate(custom(function = "crate::validation::sort_direction"))]
    pub sort_direction: String,
}

impl GetComponentsByDashboardId {
    pub fn new(dashboard_id: DbId) -> Self {
        Self {
            dashboard_id,
            type_filter: None,
            status_filter: None,
            sort_by: default_sort_by(),
            sort_direction: default_asc(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetAllComponents {
    #[validate(custom(function = "crate::validation::type_filter"))]
    pub type_filter: Option<String>,
    #[validate(custom(function = "crate::validation::status_filter"))]
    pub status_filter: Option<String>,
    #[serde(default = "default_true")]
    pub include_dashboard_name: bool,
}

impl Default for GetAllComponents {
    fn default() -> Self {
        Self {
            type_filter: None,
            status_filter: None,
            include_dashboard_name: true,
        }
    }
}

fn default_asc() -> String {
    "Asc".to_owned()
}

/// One component with the name of its dashboard.
pub async fn get_component_by_id(
    uow: &mut UnitOfWork,
    query: GetComponentById,
    cancel: &CancellationToken,
) -> Result<OperationResult<ComponentDto>, StateError> {
    settle("Failed to retrieve component.", try_get_by_id(uow, query, cancel).await)
}

async fn try_get_by_id(
    uow: &mut UnitOfWork,
    query: GetComponentById,
    cancel: &CancellationToken,
) -> Handled<ComponentDto> {
    ensure_live(cancel)?;
    let Some(component) = uow.components().get_by_id(query.id).await? else {
        return Ok(OperationResult::not_found(DashboardComponent::KIND, query.id));
    };
    let dashboard_name = uow
        .dashboards()
        .get_by_id(component.dashboard_id())
        .await?
        .map(|d| d.name().to_owned())
        .unwrap_or_default();

    Ok(OperationResult::success(ComponentDto::from_entity(
        &component,
        dashboard_name,
    )))
}

/// Components of one dashboard, filtered and ordered as requested. An
/// unknown dashboard yields an empty list.
pub async fn get_components_by_dashboard_id(
    uow: &mut UnitOfWork,
    query: GetComponentsByDashboardId,
    cancel: &CancellationToken,
) -> Result<OperationResult<Vec<ComponentDto>>, StateError> {
    settle("Failed to retrieve components.", try_get_by_dashboard(uow, query, cancel).await)
}

async fn try_get_by_dashboard(
    uow: &mut UnitOfWork,
    query: GetComponentsByDashboardId,
    cancel: &CancellationToken,
) -> Handled<Vec<ComponentDto>> {
    ensure_live(cancel)?;
    if query.dashboard_id.is_nil() {
        return Ok(OperationResult::invalid(
            "Failed to retrieve components.",
            Some("Dashboard ID cannot be empty.".to_owned()),
        ));
    }
    let (sort, direction) = ordering(&query.sort_by, &query.sort_direction, DEFAULT_ORDER);
    let criteria = ComponentCriteria {
        dashboard_id: Some(query.dashboard_id),
        component_type: filter(query.type_filter.as_deref()),
        status: filter(query.status_filter.as_deref()),
        sort,
        direction,
    };

    let rows = uow.components().query(&criteria).await?;
    let dtos = rows
        .into_iter()
        .map(|row| ComponentDto::from_summary(row, true))
        .collect();
    Ok(OperationResult::success(dtos))
}

/// Every component, oldest first.
pub async fn get_all_components(
    uow: &mut UnitOfWork,
    query: GetAllComponents,
    cancel: &CancellationToken,
) -> Result<OperationResult<Vec<ComponentDto>>, StateError> {
    settle("Failed to retrieve all components.", try_get_all(uow, query, cancel).await)
}

async fn try_get_all(
    uow: &mut UnitOfWork,
    query: GetAllComponents,
    cancel: &CancellationToken,
) -> Handled<Vec<ComponentDto>> {
    ensure_live(cancel)?;
    let criteria = ComponentCriteria {
        component_type: filter(query.type_filter.as_deref()),
        status: filter(query.status_filter.as_deref()),
        ..ComponentCriteria::default()
    };

    let rows = uow.components().query(&criteria).await?;
    let dtos = rows
        .into_iter()
        .map(|row| ComponentDto::from_summary(row, query.include_dashboard_name))
        .collect();
    Ok(OperationResult::success(dtos))
}
