//! Row shapes for the `dashboards` and `dashboard_components` tables.

pub mod component;
pub mod dashboard;
