//! Argument validation shared by the service operations.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Negative number where only zero or more is allowed.
    Negative { field: String, value: i64 },
    /// Number outside its allowed range.
    OutOfRange { field: String, min: i64, max: i64, actual: i64 },
    /// Value not in a closed set of choices.
    Unrecognized { field: String, value: String },
    /// Text where a whole number was expected.
    NotANumber { field: String, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Negative { field, value } => {
                write!(f, "{} must not be negative (got {})", field, value)
            }
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(f, "{} must be between {} and {} (got {})", field, min, max, actual),
            ValidationError::Unrecognized { field, value } => {
                write!(f, "unrecognized {} '{}'", field, value)
            }
            ValidationError::NotANumber { field, value } => {
                write!(f, "{} must be a whole number (got '{}')", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for identifiers (game, user, school ids).
pub const MAX_ID_LENGTH: usize = 128;

/// Maximum allowed length for display name snapshots.
pub const MAX_DISPLAY_NAME_LENGTH: usize = 64;

/// Validate a required identifier and return it trimmed.
pub fn validate_id<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    if value.len() > MAX_ID_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_ID_LENGTH,
            actual: value.len(),
        });
    }

    Ok(value)
}

/// Validate an optional display name.
///
/// Blank names are treated as absent.
pub fn validate_display_name(name: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };

    let chars = name.chars().count();
    if chars > MAX_DISPLAY_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "displayName".to_string(),
            max: MAX_DISPLAY_NAME_LENGTH,
            actual: chars,
        });
    }

    Ok(Some(name.to_string()))
}

/// Validate that a number is zero or more.
pub fn validate_non_negative(field: &str, value: i64) -> Result<i64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}
