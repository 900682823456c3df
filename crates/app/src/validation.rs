//! Request validation, run before a handler sees its input.
//!
//! Commands and queries derive [`Validate`]; the rule functions below carry
//! the user-facing messages. [`check`] flattens the result into the
//! field-to-messages map a `ValidationFailure` carries.

use std::borrow::Cow;

use dashlens_core::component::{ComponentStatus, ComponentType};
use dashlens_core::operation::{OperationResult, ValidationErrors};
use dashlens_core::paging::MAX_PAGE_SIZE;
use dashlens_core::types::DbId;
use dashlens_core::validation::{DESCRIPTION_MAX_LEN, NAME_MAX_LEN, NAME_MIN_LEN};
use dashlens_db::criteria::{ComponentSort, DashboardSort, SortDirection};
use validator::{Validate, ValidationError};

/// Validate a request, collecting every failing field.
pub fn check<T: Validate>(request: &T) -> Result<(), ValidationErrors> {
    request.validate().map_err(|errors| {
        errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect()
    })
}

/// Validate and, on failure, produce the `ValidationFailure` to return.
pub fn reject<T: Validate, R>(request: &T) -> Option<OperationResult<R>> {
    check(request).err().map(OperationResult::validation_failure)
}

fn rule(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn one_of<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn name_rule(subject: &str, name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(rule("required", format!("{subject} name is required.")));
    }
    let len = name.chars().count();
    if len > NAME_MAX_LEN {
        return Err(rule(
            "length",
            format!("{subject} name cannot exceed {NAME_MAX_LEN} characters."),
        ));
    }
    if len < NAME_MIN_LEN {
        return Err(rule(
            "length",
            format!("{subject} name must be at least {NAME_MIN_LEN} characters."),
        ));
    }
    Ok(())
}

fn description_rule(subject: &str, description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(rule(
            "length",
            format!("{subject} description cannot exceed {DESCRIPTION_MAX_LEN} characters."),
        ));
    }
    Ok(())
}

fn id_rule(subject: &str, id: &DbId) -> Result<(), ValidationError> {
    if id.is_nil() {
        return Err(rule("required", format!("{subject} ID is required.")));
    }
    Ok(())
}

pub(crate) fn dashboard_name(name: &str) -> Result<(), ValidationError> {
    name_rule("Dashboard", name)
}

pub(crate) fn component_name(name: &str) -> Result<(), ValidationError> {
    name_rule("Component", name)
}

pub(crate) fn dashboard_description(description: &str) -> Result<(), ValidationError> {
    description_rule("Dashboard", description)
}

pub(crate) fn component_description(description: &str) -> Result<(), ValidationError> {
    description_rule("Component", description)
}

pub(crate) fn dashboard_id(id: &DbId) -> Result<(), ValidationError> {
    id_rule("Dashboard", id)
}

pub(crate) fn component_id(id: &DbId) -> Result<(), ValidationError> {
    id_rule("Component", id)
}

pub(crate) fn target_dashboard_id(id: &DbId) -> Result<(), ValidationError> {
    id_rule("Target dashboard", id)
}

pub(crate) fn component_type(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("required", "Component type is required."));
    }
    value.parse::<ComponentType>().map(drop).map_err(|_| {
        rule(
            "one_of",
            format!("Component type must be one of: {}.", one_of(ComponentType::ALL)),
        )
    })
}

pub(crate) fn component_status(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(rule("required", "New status is required."));
    }
    value.parse::<ComponentStatus>().map(drop).map_err(|_| {
        rule(
            "one_of",
            format!("Status must be one of: {}.", one_of(ComponentStatus::ALL)),
        )
    })
}

/// Optional filter: blank means "no filter".
pub(crate) fn type_filter(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.parse::<ComponentType>().is_ok() {
        return Ok(());
    }
    Err(rule(
        "one_of",
        format!("Type filter must be one of: {}.", one_of(ComponentType::ALL)),
    ))
}

pub(crate) fn status_filter(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.parse::<ComponentStatus>().is_ok() {
        return Ok(());
    }
    Err(rule(
        "one_of",
        format!("Status filter must be one of: {}.", one_of(ComponentStatus::ALL)),
    ))
}

pub(crate) fn dashboard_sort(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<DashboardSort>()
        .map(drop)
        .map_err(|_| rule("one_of", "SortBy must be one of: Name, CreatedAt."))
}

pub(crate) fn component_sort(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<ComponentSort>()
        .map(drop)
        .map_err(|_| rule("one_of", "SortBy must be one of: Name, Type, Status, CreatedAt."))
}

pub(crate) fn sort_direction(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<SortDirection>()
        .map(drop)
        .map_err(|_| rule("one_of", "SortDirection must be one of: Asc, Desc."))
}

pub(crate) fn page_size(size: i64) -> Result<(), ValidationError> {
    if size <= 0 {
        return Err(rule("range", "Page size must be greater than 0."));
    }
    if size > i64::from(MAX_PAGE_SIZE) {
        return Err(rule(
            "range",
            format!("Page size cannot exceed {MAX_PAGE_SIZE}."),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<(), ValidationError>) -> String {
        result.unwrap_err().message.unwrap().to_string()
    }

    #[test]
    fn name_messages() {
        assert_eq!(message(dashboard_name("  ")), "Dashboard name is required.");
        assert_eq!(
            message(component_name("ab")),
            "Component name must be at least 3 characters."
        );
        assert_eq!(
            message(dashboard_name(&"x".repeat(201))),
            "Dashboard name cannot exceed 200 characters."
        );
        assert!(dashboard_name(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn description_bound_counts_characters() {
        assert!(dashboard_description(&"é".repeat(1000)).is_ok());
        assert_eq!(
            message(component_description(&"é".repeat(1001))),
            "Component description cannot exceed 1000 characters."
        );
    }

    #[test]
    fn enum_messages_list_the_choices() {
        assert_eq!(
            message(component_type("Gauge")),
            "Component type must be one of: Chart, DataGrid, Metric, Custom."
        );
        assert_eq!(
            message(component_status("Paused")),
            "Status must be one of: Active, Inactive, Error, Loading."
        );
        assert!(type_filter("").is_ok());
        assert!(status_filter("Error").is_ok());
    }

    #[test]
    fn page_size_bounds() {
        assert_eq!(message(page_size(0)), "Page size must be greater than 0.");
        assert_eq!(message(page_size(101)), "Page size cannot exceed 100.");
        assert!(page_size(100).is_ok());
    }

    #[test]
    fn nil_ids_are_required() {
        assert_eq!(message(dashboard_id(&DbId::nil())), "Dashboard ID is required.");
        assert_eq!(
            message(target_dashboard_id(&DbId::nil())),
            "Target dashboard ID is required."
        );
    }
}
