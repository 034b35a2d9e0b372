//! Health check handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: DatabaseHealth,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Reported to clients instead of the driver error, which is only logged.
const DATABASE_UNAVAILABLE: &str = "Database unavailable";

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

/// Health check endpoint - pings the database.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let database = match state.db.ping().await {
        Ok(()) => DatabaseHealth {
            status: "healthy",
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            DatabaseHealth {
                status: "unhealthy",
                error: Some(DATABASE_UNAVAILABLE.to_string()),
            }
        }
    };

    if database.error.is_none() {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database,
            }),
        )
            .into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded",
                database,
            }),
        )
            .into_response()
    }
}
