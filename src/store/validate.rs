//! Input preconditions shared by the create and update operations

use crate::error::{AppError, AppResult};

/// Column width of `department.name` and `role.title`
pub(crate) const TITLE_MAX_LEN: usize = 64;
/// Column width of `employee.first_name` and `employee.last_name`
pub(crate) const NAME_MAX_LEN: usize = 32;

/// Trimmed value, or a validation error naming the field
pub(crate) fn non_empty(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} cannot be empty.", field)));
    }
    Ok(trimmed.to_string())
}

/// Like [`non_empty`], and the trimmed value must fit in `max_len` characters
pub(crate) fn text(field: &str, value: &str, max_len: usize) -> AppResult<String> {
    let trimmed = non_empty(field, value)?;
    if trimmed.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{} must be at most {} characters.",
            field, max_len
        )));
    }
    Ok(trimmed)
}

pub(crate) fn salary(value: f64) -> AppResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(format!(
            "Salary must be a non-negative number, got {}.",
            value
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty("Title", "  Engineer ").unwrap(), "Engineer");
        assert!(matches!(non_empty("Title", "   "), Err(AppError::Validation(_))));
        assert!(matches!(non_empty("Title", ""), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_text_length_limit() {
        let exact = "x".repeat(NAME_MAX_LEN);
        assert_eq!(text("Last name", &exact, NAME_MAX_LEN).unwrap(), exact);

        // Surrounding whitespace does not count
        let padded = format!("  {}  ", exact);
        assert_eq!(text("Last name", &padded, NAME_MAX_LEN).unwrap(), exact);

        // Counted in characters, not bytes
        let accented = "é".repeat(NAME_MAX_LEN);
        assert!(text("Last name", &accented, NAME_MAX_LEN).is_ok());

        let long = "x".repeat(NAME_MAX_LEN + 1);
        match text("Last name", &long, NAME_MAX_LEN) {
            Err(AppError::Validation(msg)) => {
                assert_eq!(msg, "Last name must be at most 32 characters.")
            }
            other => panic!("expected a validation error, got {:?}", other),
        }
        assert!(matches!(
            text("Last name", " ", NAME_MAX_LEN),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_salary_bounds() {
        assert_eq!(salary(0.0).unwrap(), 0.0);
        assert_eq!(salary(75000.0).unwrap(), 75000.0);
        assert!(salary(-1.0).is_err());
        assert!(salary(f64::NAN).is_err());
        assert!(salary(f64::INFINITY).is_err());
    }
}
