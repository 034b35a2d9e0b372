//! Common utilities shared across all microservices.
//!
//! This crate provides:
//! - Unified error handling and the JSON error body
//! - Configuration structures
//! - Extractors that reject with `AppError`, and the error-path middleware

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;

pub use config::*;
pub use error::{AppError, AppResult, ErrorBody, OptionExt};
pub use extract::{Path, Query, ValidatedJson};
pub use middleware::error_path_middleware;
