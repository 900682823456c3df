//! Invariant checks shared by every named entity.
//!
//! Lengths are counted in Unicode scalar values. Values are never trimmed;
//! a whitespace-only name counts as empty.

use crate::error::CoreError;

/// Minimum length of an entity name.
pub const NAME_MIN_LEN: usize = 3;

/// Maximum length of an entity name.
pub const NAME_MAX_LEN: usize = 200;

/// Maximum length of an entity description.
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Check a name against the required/length rules.
///
/// `subject` prefixes the message, e.g. `"Dashboard"` produces
/// `"Dashboard name cannot be empty."`.
pub fn validate_name(subject: &str, name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!(
            "{subject} name cannot be empty."
        )));
    }

    let len = name.chars().count();
    if len > NAME_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "{subject} name cannot exceed {NAME_MAX_LEN} characters."
        )));
    }
    if len < NAME_MIN_LEN {
        return Err(CoreError::Validation(format!(
            "{subject} name must be at least {NAME_MIN_LEN} characters."
        )));
    }

    Ok(())
}

/// Check an optional description against the maximum length.
pub fn validate_description(subject: &str, description: &str) -> Result<(), CoreError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(CoreError::Validation(format!(
            "{subject} description cannot exceed {DESCRIPTION_MAX_LEN} characters."
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn name_bounds_are_inclusive() {
        assert!(validate_name("Dashboard", "abc").is_ok());
        assert!(validate_name("Dashboard", &"x".repeat(NAME_MAX_LEN)).is_ok());
    }

    #[test]
    fn short_name_rejected() {
        let err = validate_name("Dashboard", "ab").unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation("Dashboard name must be at least 3 characters.".into())
        );
    }

    #[test]
    fn long_name_rejected() {
        let err = validate_name("Component", &"x".repeat(NAME_MAX_LEN + 1)).unwrap_err();
        assert_eq!(
            err,
            CoreError::Validation("Component name cannot exceed 200 characters.".into())
        );
    }

    #[test]
    fn blank_name_rejected_as_empty() {
        assert_matches!(
            validate_name("Dashboard", "    "),
            Err(CoreError::Validation(msg)) if msg == "Dashboard name cannot be empty."
        );
        assert_matches!(validate_name("Dashboard", ""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn multibyte_names_count_characters_not_bytes() {
        // Three characters, nine bytes.
        assert!(validate_name("Dashboard", "äöü").is_ok());
        assert!(validate_name("Dashboard", &"é".repeat(NAME_MAX_LEN)).is_ok());
    }

    #[test]
    fn description_limit() {
        assert!(validate_description("Dashboard", "").is_ok());
        assert!(validate_description("Dashboard", &"d".repeat(DESCRIPTION_MAX_LEN)).is_ok());
        assert_matches!(
            validate_description("Dashboard", &"d".repeat(DESCRIPTION_MAX_LEN + 1)),
            Err(CoreError::Validation(_))
        );
    }
}
