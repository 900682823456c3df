//! Read-side handlers.

mod component;
mod dashboard;

pub use component::{
    get_all_components, get_component_by_id, get_components_by_dashboard_id, GetAllComponents,
    GetComponentById, GetComponentsByDashboardId,
};
pub use dashboard::{
    get_all_dashboards, get_dashboard_by_id, get_dashboards_paged, GetAllDashboards,
    GetDashboardById, GetDashboardsPaged,
};

use std::str::FromStr;

use dashlens_db::criteria::SortDirection;

/// Resolve sort key and direction strings. If either fails to parse the
/// query's default ordering is used as a whole.
fn ordering<S: FromStr>(
    sort_by: &str,
    direction: &str,
    default: (S, SortDirection),
) -> (S, SortDirection) {
    match (sort_by.parse::<S>(), direction.parse::<SortDirection>()) {
        (Ok(sort), Ok(direction)) => (sort, direction),
        _ => default,
    }
}

/// Parse an optional filter; blank or unknown values mean "no filter".
fn filter<T: FromStr>(value: Option<&str>) -> Option<T> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
}

fn default_sort_by() -> String {
    "CreatedAt".to_owned()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use dashlens_core::component::ComponentType;
    use dashlens_db::criteria::DashboardSort;

    use super::*;

    #[test]
    fn unknown_sort_key_uses_the_whole_default() {
        let got = ordering("Colour", "Asc", (DashboardSort::CreatedAt, SortDirection::Desc));
        assert_eq!(got, (DashboardSort::CreatedAt, SortDirection::Desc));
    }

    #[test]
    fn unknown_direction_uses_the_whole_default() {
        let got = ordering("Name", "Up", (DashboardSort::CreatedAt, SortDirection::Desc));
        assert_eq!(got, (DashboardSort::CreatedAt, SortDirection::Desc));
    }

    #[test]
    fn parsed_ordering_wins() {
        let got = ordering("name", "asc", (DashboardSort::CreatedAt, SortDirection::Desc));
        assert_eq!(got, (DashboardSort::Name, SortDirection::Asc));
    }

    #[test]
    fn blank_and_unknown_filters_are_ignored() {
        assert_eq!(filter::<ComponentType>(Some("  ")), None);
        assert_eq!(filter::<ComponentType>(Some("Gauge")), None);
        assert_eq!(filter::<ComponentType>(Some("Metric")), Some(ComponentType::Metric));
        assert_eq!(filter::<ComponentType>(None), None);
    }
}
