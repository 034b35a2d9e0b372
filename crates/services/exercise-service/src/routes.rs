//! Route configuration.

use axum::{middleware, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::error_path_middleware;

use crate::handlers::{exercise_routes, health_routes, routine_exercise_routes, routine_routes};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/v1/exercises", exercise_routes())
        .nest("/api/v1/workout-routines", routine_routes())
        .nest("/api/v1/routine-exercises", routine_exercise_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(error_path_middleware)),
        )
        .with_state(state)
}
