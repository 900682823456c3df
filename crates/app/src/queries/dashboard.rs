use dashlens_core::dashboard::Dashboard;
use dashlens_core::entity::Entity;
use dashlens_core::operation::OperationResult;
use dashlens_core::paging::{PageRequest, PagedResult, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use dashlens_core::types::DbId;
use dashlens_db::criteria::{DashboardCriteria, DashboardSort, SortDirection};
use dashlens_db::UnitOfWork;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use super::{default_sort_by, default_true, ordering};
use crate::dto::DashboardDto;
use crate::error::StateError;
use crate::outcome::{ensure_live, settle, Handled};

const DEFAULT_ORDER: (DashboardSort, SortDirection) = (DashboardSort::CreatedAt, SortDirection::Desc);

#[derive(Debug, Clone, Validate)]
pub struct GetDashboardById {
    #[validate(custom(function = "crate::validation::dashboard_id"))]
    pub id: DbId,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetAllDashboards {
    #[serde(default = "default_true")]
    pub include_component_count: bool,
    #[serde(default = "default_sort_by")]
    #[validate(custom(function = "crate::validation::dashboard_sort"))]
    pub sort_by: String,
    #[serde(default = "default_desc")]
    #[validate(custom(function = "crate::validation::sort_direction"))]
    pub sort_direction: String,
}

impl Default for GetAllDashboards {
    fn default() -> Self {
        Self {
            include_component_count: true,
            sort_by: default_sort_by(),
            sort_direction: default_desc(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GetDashboardsPaged {
    #[serde(default = "default_page_number")]
    #[validate(range(min = 1, message = "Page number must be greater than 0."))]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    #[validate(custom(function = "crate::validation::page_size"))]
    pub page_size: i64,
    #[validate(length(max = 200, message = "Name filter cannot exceed 200 characters."))]
    pub name_filter: Option<String>,
    #[serde(default = "default_sort_by")]
    #[validate(custom(function = "crate::validation::dashboard_sort"))]
    pub sort_by: String,
    #[serde(default = "default_desc")]
    #[validate(custom(function = "crate::validation::sort_direction"))]
    pub sort_direction: String,
}

impl Default for GetDashboardsPaged {
    fn default() -> Self {
        Self {
            page_number: default_page_number(),
            page_size: default_page_size(),
            name_filter: None,
            sort_by: default_sort_by(),
            sort_direction: default_desc(),
        }
    }
}

impl GetDashboardsPaged {
    /// The requested window, clamped into range for callers that skipped
    /// validation.
    fn page(&self) -> PageRequest {
        let number = self.page_number.clamp(1, i64::from(u32::MAX)) as u32;
        let size = if self.page_size < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size.min(i64::from(MAX_PAGE_SIZE)) as u32
        };
        PageRequest::new(number, size)
    }
}

fn default_desc() -> String {
    "Desc".to_owned()
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    i64::from(DEFAULT_PAGE_SIZE)
}

/// One dashboard with its component count.
pub async fn get_dashboard_by_id(
    uow: &mut UnitOfWork,
    query: GetDashboardById,
    cancel: &CancellationToken,
) -> Result<OperationResult<DashboardDto>, StateError> {
    settle("Failed to retrieve dashboard.", try_get_by_id(uow, query, cancel).await)
}

async fn try_get_by_id(
    uow: &mut UnitOfWork,
    query: GetDashboardById,
    cancel: &CancellationToken,
) -> Handled<DashboardDto> {
    ensure_live(cancel)?;
    match uow.dashboards().get_by_id(query.id).await? {
        Some(dashboard) => Ok(OperationResult::success(DashboardDto::from(&dashboard))),
        None => Ok(OperationResult::not_found(Dashboard::KIND, query.id)),
    }
}

/// Every dashboard, ordered as requested.
pub async fn get_all_dashboards(
    uow: &mut UnitOfWork,
    query: GetAllDashboards,
    cancel: &CancellationToken,
) -> Result<OperationResult<Vec<DashboardDto>>, StateError> {
    settle("Failed to retrieve dashboards.", try_get_all(uow, query, cancel).await)
}

async fn try_get_all(
    uow: &mut UnitOfWork,
    query: GetAllDashboards,
    cancel: &CancellationToken,
) -> Handled<Vec<DashboardDto>> {
    ensure_live(cancel)?;
    let (sort, direction) = ordering(&query.sort_by, &query.sort_direction, DEFAULT_ORDER);
    let criteria = DashboardCriteria {
        sort,
        direction,
        ..DashboardCriteria::default()
    };

    let (rows, _) = uow.dashboards().query(&criteria).await?;
    let dtos = rows
        .into_iter()
        .map(|row| DashboardDto::from_summary(row, query.include_component_count))
        .collect();
    Ok(OperationResult::success(dtos))
}

/// One page of dashboards, optionally filtered by name.
pub async fn get_dashboards_paged(
    uow: &mut UnitOfWork,
    query: GetDashboardsPaged,
    cancel: &CancellationToken,
) -> Result<OperationResult<PagedResult<DashboardDto>>, StateError> {
    settle("Failed to retrieve paged dashboards.", try_get_paged(uow, query, cancel).await)
}

async fn try_get_paged(
    uow: &mut UnitOfWork,
    query: GetDashboardsPaged,
    cancel: &CancellationToken,
) -> Handled<PagedResult<DashboardDto>> {
    ensure_live(cancel)?;
    let page = query.page();
    let (sort, direction) = ordering(&query.sort_by, &query.sort_direction, DEFAULT_ORDER);
    let criteria = DashboardCriteria {
        name_filter: query
            .name_filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_owned),
        sort,
        direction,
        page: Some(page),
    };

    let (rows, total) = uow.dashboards().query(&criteria).await?;
    let items = rows
        .into_iter()
        .map(|row| DashboardDto::from_summary(row, true))
        .collect();
    Ok(OperationResult::success(PagedResult::new(items, page, total)))
}
