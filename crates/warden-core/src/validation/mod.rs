//! Input validation and normalization.
//!
//! Every user-supplied identity field passes through here before it reaches
//! the credential store.

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use validator::ValidateEmail;

/// Validation error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was missing or blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// Input exceeds maximum allowed length.
    #[error("{field} exceeds maximum length ({max})")]
    TooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum allowed length.
        max: usize,
    },

    /// Not a syntactically valid email address.
    #[error("Invalid email address")]
    InvalidEmail,
}

/// Size limits per field.
pub mod limits {
    /// Maximum email length in bytes (RFC 5321 path limit).
    pub const MAX_EMAIL_LENGTH: usize = 254;

    /// Maximum display name length in characters.
    pub const MAX_NAME_LENGTH: usize = 100;
}

/// Trim `value` and reject it if nothing is left.
///
/// # Errors
///
/// Returns `ValidationError::Required` naming `field` if the value is blank.
pub fn require_non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(trimmed)
}

/// Normalize an email address for storage and lookup.
///
/// Trims, applies NFKC normalization, and lowercases.
///
/// # Errors
///
/// Returns error if the address is blank, too long, or malformed.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let trimmed = require_non_empty("email", raw)?;
    let normalized: String = trimmed.nfkc().collect::<String>().to_lowercase();

    if normalized.len() > limits::MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email",
            max: limits::MAX_EMAIL_LENGTH,
        });
    }

    if !normalized.validate_email() {
        return Err(ValidationError::InvalidEmail);
    }

    Ok(normalized)
}

/// Normalize a display name.
///
/// # Errors
///
/// Returns error if the name is blank or too long.
pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = require_non_empty("name", raw)?;
    let normalized: String = trimmed.nfkc().collect();

    if normalized.chars().count() > limits::MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name",
            max: limits::MAX_NAME_LENGTH,
        });
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert_eq!(require_non_empty("name", "  Ana "), Ok("Ana"));
        assert_eq!(
            require_non_empty("password", "   "),
            Err(ValidationError::Required("password"))
        );
        assert_eq!(
            require_non_empty("email", ""),
            Err(ValidationError::Required("email"))
        );
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" A@X.com ").unwrap(), "a@x.com");
        assert_eq!(normalize_email("Test@Example.COM").unwrap(), "test@example.com");
    }

    #[test]
    fn test_normalize_email_fullwidth() {
        // NFKC folds fullwidth forms before lowercasing
        assert_eq!(normalize_email("ＡＢＣ@x.com").unwrap(), "abc@x.com");
    }

    #[test]
    fn test_invalid_email() {
        assert_eq!(normalize_email("not-an-email"), Err(ValidationError::InvalidEmail));
        assert_eq!(normalize_email(""), Err(ValidationError::Required("email")));

        let long = format!("{}@x.com", "a".repeat(300));
        assert!(matches!(
            normalize_email(&long),
            Err(ValidationError::TooLong { field: "email", .. })
        ));
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Test User ").unwrap(), "Test User");
        assert_eq!(normalize_name(" "), Err(ValidationError::Required("name")));
        assert!(normalize_name(&"x".repeat(101)).is_err());
        assert!(normalize_name(&"x".repeat(100)).is_ok());
    }
}
