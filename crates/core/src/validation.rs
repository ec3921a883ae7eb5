//! Field validation shared by every entity kind.
//!
//! Validation runs before any state change or network call; a failing check
//! leaves the collection exactly as it was.

use thiserror::Error;

/// Minimum length for passwords set through the admin panel.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A draft or patch that cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The `name` (or title) is missing or blank after trimming.
    #[error("Name is required")]
    MissingName,

    /// The entity kind has no active/inactive status to toggle.
    #[error("This record has no status to toggle")]
    NoStatus,

    /// Another active account already uses this email.
    #[error("An active account already uses {0}")]
    DuplicateEmail(String),

    /// Password shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },

    /// A field holds a value outside its allowed format.
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// Require a non-blank name.
///
/// # Errors
///
/// Returns [`ValidationError::MissingName`] if `name` is empty after trimming.
pub fn require_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    Ok(())
}

/// Reject blank names in partial updates; `None` leaves the name unchanged.
///
/// # Errors
///
/// Returns [`ValidationError::MissingName`] if a replacement name is blank.
pub fn require_name_if_set(name: Option<&str>) -> Result<(), ValidationError> {
    name.map_or(Ok(()), require_name)
}

/// Require a password of at least [`MIN_PASSWORD_LENGTH`] characters.
///
/// # Errors
///
/// Returns [`ValidationError::WeakPassword`] if the password is too short.
pub fn require_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::WeakPassword {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_names_rejected() {
        assert_eq!(require_name(""), Err(ValidationError::MissingName));
        assert_eq!(require_name(" \t\n"), Err(ValidationError::MissingName));
        assert_eq!(require_name("  Fintech "), Ok(()));
    }

    #[test]
    fn test_optional_name() {
        assert_eq!(require_name_if_set(None), Ok(()));
        assert_eq!(require_name_if_set(Some(" ")), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_password_length() {
        assert!(require_password("short").is_err());
        assert!(require_password("long enough").is_ok());
    }
}
