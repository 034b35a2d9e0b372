//! User account handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppResult, Path, ValidatedJson};
use domain::{User, UserChanges, UserProfile, UserResponse};

use crate::state::AppState;

/// Registration request; profile fields sit next to the account fields
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be between 1 and 50 characters"))]
    #[schema(example = "alice")]
    pub username: String,
    #[validate(email(message = "Email must be a valid address"))]
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "Password123")]
    pub password: String,
    #[serde(flatten)]
    pub profile: UserProfile,
}

/// Partial account update; omitted fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 50, message = "Username must be between 1 and 50 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "Email must be a valid address"))]
    pub email: Option<String>,
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        UserChanges {
            username: req.username,
            email: req.email,
            profile: req.profile,
        }
    }
}

/// Profile-only update
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(flatten)]
    pub profile: UserProfile,
}

fn to_responses(users: Vec<User>) -> Json<Vec<UserResponse>> {
    Json(users.into_iter().map(UserResponse::from).collect())
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/username/:username", get(get_user_by_username))
        .route("/email/:email", get(get_user_by_email))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/profile", patch(update_profile))
}

/// Register a user
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .create_user(req.username, req.email, req.password, req.profile)
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses((status = 200, description = "All users", body = Vec<UserResponse>))
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    Ok(to_responses(state.user_service.list_users().await?))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(user.into()))
}

/// Get user by username
#[utoipa::path(
    get,
    path = "/api/users/username/{username}",
    tag = "Users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user_by_username(&username).await?;
    Ok(Json(user.into()))
}

/// Get user by email
#[utoipa::path(
    get,
    path = "/api/users/email/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "Email address")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user_by_email(&email).await?;
    Ok(Json(user.into()))
}

/// Update account and profile fields
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update_user(id, req.into()).await?;
    Ok(Json(user.into()))
}

/// Update profile fields only
#[utoipa::path(
    patch,
    path = "/api/users/{id}/profile",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update_profile(id, req.profile).await?;
    Ok(Json(user.into()))
}

/// Delete a user and their role memberships
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.user_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
