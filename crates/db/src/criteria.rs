//! Filter and ordering criteria for list queries.
//!
//! Sort keys map onto a fixed set of column expressions, so nothing from the
//! caller is ever spliced into SQL.

use std::str::FromStr;

use dashlens_core::component::{ComponentStatus, ComponentType};
use dashlens_core::paging::PageRequest;
use dashlens_core::types::DbId;

use crate::error::DbError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(DbError::InvalidArgument(format!(
                "Unknown sort direction: {other}"
            ))),
        }
    }
}

/// Normalise a sort key: case-insensitive, `_` and `-` ignored, so
/// `CreatedAt`, `created_at` and `created-at` all match.
fn sort_key(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Text keys sort case-insensitively, comparing code points (`COLLATE "C"`)
/// so the result does not depend on the database locale. `MemoryStore`
/// orders the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardSort {
    Name,
    CreatedAt,
}

impl DashboardSort {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Name => r#"lower(d.name) COLLATE "C""#,
            Self::CreatedAt => "d.created_at",
        }
    }
}

impl FromStr for DashboardSort {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match sort_key(s).as_str() {
            "name" => Ok(Self::Name),
            "createdat" => Ok(Self::CreatedAt),
            _ => Err(DbError::InvalidArgument(format!("Unknown dashboard sort key: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentSort {
    Name,
    Type,
    Status,
    CreatedAt,
}

impl ComponentSort {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Name => r#"lower(c.name) COLLATE "C""#,
            Self::Type => r#"c.component_type COLLATE "C""#,
            Self::Status => r#"c.status COLLATE "C""#,
            Self::CreatedAt => "c.created_at",
        }
    }
}

impl FromStr for ComponentSort {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match sort_key(s).as_str() {
            "name" => Ok(Self::Name),
            "type" | "componenttype" => Ok(Self::Type),
            "status" => Ok(Self::Status),
            "createdat" => Ok(Self::CreatedAt),
            _ => Err(DbError::InvalidArgument(format!("Unknown component sort key: {s}"))),
        }
    }
}

/// Criteria for listing dashboards with their component counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardCriteria {
    /// Case-insensitive substring match on the name.
    pub name_filter: Option<String>,
    pub sort: DashboardSort,
    pub direction: SortDirection,
    /// `None` returns every matching row.
    pub page: Option<PageRequest>,
}

impl Default for DashboardCriteria {
    /// Newest first, unfiltered, unpaged.
    fn default() -> Self {
        Self {
            name_filter: None,
            sort: DashboardSort::CreatedAt,
            direction: SortDirection::Desc,
            page: None,
        }
    }
}

/// Criteria for listing components joined with their dashboard names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentCriteria {
    pub dashboard_id: Option<DbId>,
    pub component_type: Option<ComponentType>,
    pub status: Option<ComponentStatus>,
    pub sort: ComponentSort,
    pub direction: SortDirection,
}

impl Default for ComponentCriteria {
    /// Oldest first, unfiltered.
    fn default() -> Self {
        Self {
            dashboard_id: None,
            component_type: None,
            status: None,
            sort: ComponentSort::CreatedAt,
            direction: SortDirection::Asc,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn sort_keys_ignore_case_and_separators() {
        assert_eq!("CreatedAt".parse::<DashboardSort>().unwrap(), DashboardSort::CreatedAt);
        assert_eq!("created_at".parse::<DashboardSort>().unwrap(), DashboardSort::CreatedAt);
        assert_eq!("NAME".parse::<DashboardSort>().unwrap(), DashboardSort::Name);
        assert_eq!("type".parse::<ComponentSort>().unwrap(), ComponentSort::Type);
        assert_eq!("Status".parse::<ComponentSort>().unwrap(), ComponentSort::Status);
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        assert_matches!("colour".parse::<DashboardSort>(), Err(DbError::InvalidArgument(_)));
        assert_matches!("".parse::<ComponentSort>(), Err(DbError::InvalidArgument(_)));
    }

    #[test]
    fn directions() {
        assert_eq!("Desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!("ascending".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn defaults() {
        let d = DashboardCriteria::default();
        assert_eq!((d.sort, d.direction), (DashboardSort::CreatedAt, SortDirection::Desc));

        let c = ComponentCriteria::default();
        assert_eq!((c.sort, c.direction), (ComponentSort::CreatedAt, SortDirection::Asc));
    }
}
