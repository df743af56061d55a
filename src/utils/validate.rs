//! Input validation for create/update payloads.
//!
//! Validation runs before any row is written, so a failing payload never
//! leaves partial state behind.

use thiserror::Error;

/// A single rejected field. Carries the field name so the admin UI can
/// attach the message to the right input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field} {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Reject empty or whitespace-only values for a required field.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(())
}

/// Shape check for email addresses: one local part, one domain with a dot,
/// no whitespace. Deliverability is not our problem.
pub fn validate_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require(field, value)?;

    let invalid = || ValidationError::new(field, "must be a valid email address");

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;

    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || value.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }

    Ok(())
}
