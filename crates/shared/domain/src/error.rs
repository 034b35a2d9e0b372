//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, database).

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Required field missing/blank, or a numeric field fails a positivity rule
    #[error("{0}")]
    Validation(String),

    /// Password-related errors
    #[error("{0}")]
    Password(String),

    /// Entity not found
    #[error("{0} not found")]
    NotFound(String),

    /// A uniqueness rule on a name was violated
    #[error("{0}")]
    DuplicateName(String),

    /// The exercise is already linked into the routine
    #[error("{0}")]
    DuplicateExercise(String),

    /// Delete blocked by records that still reference the entity
    #[error("{0}")]
    InUse(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Reject empty and whitespace-only values.
pub fn require_text(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Reject values whose character count exceeds `max`.
pub fn check_max_len(value: &str, max: usize, field: &str) -> DomainResult<()> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {} characters",
            field, max
        )));
    }
    Ok(())
}

/// Reject ids that can never address a stored row.
pub fn check_id(id: i64, entity: &str) -> DomainResult<()> {
    if id <= 0 {
        return Err(DomainError::validation(format!(
            "{} ID must be a positive number",
            entity
        )));
    }
    Ok(())
}
