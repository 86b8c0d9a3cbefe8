//! Field-level validation predicates.
//!
//! # Responsibility
//! - Check candidate field values before they reach a store.
//! - Produce human-readable rejection reasons.
//!
//! # Invariants
//! - Validation is pure: it never reads or writes any store.
//! - Whitespace-only text is treated exactly like empty text.
//! - Length limits count Unicode scalar values and are inclusive.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum task title length.
pub const MAX_TITLE_CHARS: usize = 200;
/// Maximum project name length.
pub const MAX_PROJECT_NAME_CHARS: usize = 200;
/// Maximum user name length.
pub const MAX_USER_NAME_CHARS: usize = 200;

/// Reason a candidate entity was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace-only.
    Blank { field: &'static str },
    /// Text field exceeds its maximum length.
    TooLong {
        field: &'static str,
        max_chars: usize,
        actual_chars: usize,
    },
    /// Email does not contain `@`.
    InvalidEmail,
    /// Scheduling window is not strictly increasing.
    InvalidSchedule { starts_at: i64, due_at: i64 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} must not be blank"),
            Self::TooLong {
                field, max_chars, ..
            } => write!(f, "{field} exceeds {max_chars} characters"),
            Self::InvalidEmail => write!(f, "email must contain '@'"),
            Self::InvalidSchedule { starts_at, due_at } => write!(
                f,
                "starts_at ({starts_at}) must be earlier than due_at ({due_at})"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Checks a required, length-bounded text field.
pub fn require_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError::TooLong {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}

/// Checks an email address: non-blank and containing `@`.
pub fn require_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field: "email" });
    }
    if !value.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Checks that `starts_at` is strictly before `due_at` when both are set.
pub fn require_schedule(starts_at: Option<i64>, due_at: Option<i64>) -> Result<(), ValidationError> {
    match (starts_at, due_at) {
        (Some(starts_at), Some(due_at)) if starts_at >= due_at => {
            Err(ValidationError::InvalidSchedule { starts_at, due_at })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{require_email, require_schedule, require_text, ValidationError};

    #[test]
    fn blank_and_whitespace_are_rejected_alike() {
        for value in ["", "   ", "\t\n"] {
            assert_eq!(
                require_text("title", value, 10),
                Err(ValidationError::Blank { field: "title" })
            );
        }
    }

    #[test]
    fn length_limit_is_inclusive_and_counts_chars() {
        assert!(require_text("title", "ééééé", 5).is_ok());
        let err = require_text("title", "éééééé", 5).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TooLong {
                field: "title",
                max_chars: 5,
                actual_chars: 6
            }
        );
        assert_eq!(err.to_string(), "title exceeds 5 characters");
    }

    #[test]
    fn email_requires_at_sign() {
        assert!(require_email("a@b.com").is_ok());
        assert_eq!(require_email("ab.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(
            require_email("  "),
            Err(ValidationError::Blank { field: "email" })
        );
        assert_eq!(
            ValidationError::InvalidEmail.to_string(),
            "email must contain '@'"
        );
    }

    #[test]
    fn schedule_requires_strict_order() {
        assert!(require_schedule(Some(1), Some(2)).is_ok());
        assert!(require_schedule(None, Some(2)).is_ok());
        assert!(require_schedule(Some(2), None).is_ok());
        assert!(require_schedule(Some(2), Some(2)).is_err());
        assert!(require_schedule(Some(3), Some(2)).is_err());
    }
}
