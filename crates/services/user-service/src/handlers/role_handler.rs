//! Role handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppResult, Path, ValidatedJson};
use domain::RoleResponse;

use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RoleRequest {
    #[validate(length(min = 1, max = 50, message = "Role name must be between 1 and 50 characters"))]
    #[schema(example = "ROLE_COACH")]
    pub name: String,
}

pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:id", delete(delete_role))
}

/// List roles
#[utoipa::path(
    get,
    path = "/api/roles",
    tag = "Roles",
    responses((status = 200, description = "All roles", body = Vec<RoleResponse>))
)]
pub async fn list_roles(State(state): State<AppState>) -> AppResult<Json<Vec<RoleResponse>>> {
    let roles = state.role_service.list_roles().await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}

/// Create a role
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = "Roles",
    request_body = RoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Role already exists")
    )
)]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RoleRequest>,
) -> AppResult<(StatusCode, Json<RoleResponse>)> {
    let role = state.role_service.create_role(req.name).await?;
    Ok((StatusCode::CREATED, Json(role.into())))
}

/// Delete a role and revoke it from every user
#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = "Roles",
    params(("id" = i64, Path, description = "Role ID")),
    responses(
        (status = 204, description = "Role deleted"),
        (status = 404, description = "Role not found")
    )
)]
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.role_service.delete_role(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
