//! Unified error handling for the HTTP services.
//!
//! Every service returns `AppError`; the axum boundary turns it into the
//! JSON error body clients see.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Caller-fixable input
    #[error("{0}")]
    Validation(String),

    // Resource errors
    #[error("{0}")]
    NotFound(String),

    // Uniqueness invariants
    #[error("{0}")]
    DuplicateName(String),

    #[error("{0}")]
    DuplicateUsername(String),

    #[error("{0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    DuplicateExercise(String),

    // Referential protection
    #[error("{0}")]
    InUse(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP.
///
/// `path` is filled in by [`crate::middleware::error_path_middleware`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::DuplicateName(_) => "DUPLICATE_NAME",
            AppError::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            AppError::DuplicateEmail(_) => "DUPLICATE_EMAIL",
            AppError::DuplicateExercise(_) => "DUPLICATE_EXERCISE",
            AppError::InUse(_) => "IN_USE",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateName(_)
            | AppError::DuplicateUsername(_)
            | AppError::DuplicateEmail(_)
            | AppError::DuplicateExercise(_)
            | AppError::InUse(_) => StatusCode::CONFLICT,
            #[cfg(feature = "database")]
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Build the wire body, without the request path.
    pub fn body(&self) -> ErrorBody {
        let status = self.status();
        ErrorBody {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            code: self.code().to_string(),
            message: self.user_message(),
            path: None,
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = self.body();
        let mut response = (self.status(), Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::Password(msg) => AppError::Validation(msg),
            DomainError::NotFound(_) => AppError::NotFound(err.to_string()),
            DomainError::DuplicateName(msg) => AppError::DuplicateName(msg),
            DomainError::DuplicateExercise(msg) => AppError::DuplicateExercise(msg),
            DomainError::InUse(msg) => AppError::InUse(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

#[cfg(feature = "database")]
impl AppError {
    /// Map a unique-constraint violation to `on_unique`, anything else to
    /// `Database`. Backs the read-then-write uniqueness checks.
    pub fn from_db_unique(err: sea_orm::DbErr, on_unique: impl FnOnce() -> AppError) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::warn!("Unique constraint rejected write: {}", detail);
                on_unique()
            }
            _ => AppError::Database(err),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, msg: impl Into<String>) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, msg: impl Into<String>) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(msg.into()))
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// `"<entity> not found with ID: <id>"`
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{} not found with ID: {}", entity, id))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
