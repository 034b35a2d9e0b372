//! Direct routine-exercise link handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{AppResult, Path, ValidatedJson};
use domain::{LinkChanges, LinkParams, RoutineExerciseDetail, RoutineExerciseResponse};

use crate::state::AppState;

/// Link creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoutineExerciseRequest {
    #[validate(range(min = 1, message = "Exercise ID must be a positive number"))]
    pub exercise_id: i64,
    #[validate(range(min = 1, message = "Workout routine ID must be a positive number"))]
    pub workout_routine_id: i64,
    #[validate(range(min = 1, message = "Sets must be greater than 0"))]
    pub sets: i32,
    #[validate(range(min = 1, message = "Reps must be greater than 0"))]
    pub reps: i32,
    #[validate(range(min = 1, message = "Rest time must be positive"))]
    pub rest_time: Option<i32>,
}

/// Partial link update
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoutineExerciseRequest {
    #[validate(range(min = 1, message = "Sets must be greater than 0"))]
    pub sets: Option<i32>,
    #[validate(range(min = 1, message = "Reps must be greater than 0"))]
    pub reps: Option<i32>,
    #[validate(range(min = 1, message = "Rest time must be positive"))]
    pub rest_time: Option<i32>,
}

fn to_responses(details: Vec<RoutineExerciseDetail>) -> Json<Vec<RoutineExerciseResponse>> {
    Json(details.into_iter().map(RoutineExerciseResponse::from).collect())
}

pub fn routine_exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_links).post(create_link))
        .route("/workout-routine/:routine_id", get(links_by_routine))
        .route("/exercise/:exercise_id", get(links_by_exercise))
        .route("/:id", get(get_link).put(update_link).delete(delete_link))
        .route("/:id/exists", get(link_exists))
}

/// Link an exercise into a routine
#[utoipa::path(
    post,
    path = "/api/v1/routine-exercises",
    tag = "Routine Exercises",
    request_body = RoutineExerciseRequest,
    responses(
        (status = 201, description = "Link created", body = RoutineExerciseResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Routine or exercise not found"),
        (status = 409, description = "Exercise already in routine")
    )
)]
pub async fn create_link(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RoutineExerciseRequest>,
) -> AppResult<(StatusCode, Json<RoutineExerciseResponse>)> {
    let params = LinkParams {
        sets: req.sets,
        reps: req.reps,
        rest_time: req.rest_time,
    };
    let detail = state
        .routine_exercise_service
        .create_link(req.workout_routine_id, req.exercise_id, params)
        .await?;
    Ok((StatusCode::CREATED, Json(detail.into())))
}

/// List every link
#[utoipa::path(
    get,
    path = "/api/v1/routine-exercises",
    tag = "Routine Exercises",
    responses((status = 200, description = "All links", body = Vec<RoutineExerciseResponse>))
)]
pub async fn list_links(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RoutineExerciseResponse>>> {
    Ok(to_responses(state.routine_exercise_service.list_links().await?))
}

/// Get link by ID
#[utoipa::path(
    get,
    path = "/api/v1/routine-exercises/{id}",
    tag = "Routine Exercises",
    params(("id" = i64, Path, description = "Link ID")),
    responses(
        (status = 200, description = "Link", body = RoutineExerciseResponse),
        (status = 404, description = "Link not found")
    )
)]
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RoutineExerciseResponse>> {
    let detail = state.routine_exercise_service.get_link(id).await?;
    Ok(Json(detail.into()))
}

/// Links owned by a routine
#[utoipa::path(
    get,
    path = "/api/v1/routine-exercises/workout-routine/{routine_id}",
    tag = "Routine Exercises",
    params(("routine_id" = i64, Path, description = "Routine ID")),
    responses((status = 200, description = "Routine's links", body = Vec<RoutineExerciseResponse>))
)]
pub async fn links_by_routine(
    State(state): State<AppState>,
    Path(routine_id): Path<i64>,
) -> AppResult<Json<Vec<RoutineExerciseResponse>>> {
    let details = state
        .routine_exercise_service
        .list_links_by_routine(routine_id)
        .await?;
    Ok(to_responses(details))
}

/// Links that reference an exercise
#[utoipa::path(
    get,
    path = "/api/v1/routine-exercises/exercise/{exercise_id}",
    tag = "Routine Exercises",
    params(("exercise_id" = i64, Path, description = "Exercise ID")),
    responses((status = 200, description = "Exercise's links", body = Vec<RoutineExerciseResponse>))
)]
pub async fn links_by_exercise(
    State(state): State<AppState>,
    Path(exercise_id): Path<i64>,
) -> AppResult<Json<Vec<RoutineExerciseResponse>>> {
    let details = state
        .routine_exercise_service
        .list_links_by_exercise(exercise_id)
        .await?;
    Ok(to_responses(details))
}

/// Update sets, reps or rest time
#[utoipa::path(
    put,
    path = "/api/v1/routine-exercises/{id}",
    tag = "Routine Exercises",
    params(("id" = i64, Path, description = "Link ID")),
    request_body = UpdateRoutineExerciseRequest,
    responses(
        (status = 200, description = "Link updated", body = RoutineExerciseResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Link not found")
    )
)]
pub async fn update_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateRoutineExerciseRequest>,
) -> AppResult<Json<RoutineExerciseResponse>> {
    let changes = LinkChanges {
        sets: req.sets,
        reps: req.reps,
        rest_time: req.rest_time,
    };
    let detail = state
        .routine_exercise_service
        .update_link(id, changes)
        .await?;
    Ok(Json(detail.into()))
}

/// Delete a link
#[utoipa::path(
    delete,
    path = "/api/v1/routine-exercises/{id}",
    tag = "Routine Exercises",
    params(("id" = i64, Path, description = "Link ID")),
    responses(
        (status = 204, description = "Link deleted"),
        (status = 404, description = "Link not found")
    )
)]
pub async fn delete_link(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.routine_exercise_service.delete_link(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Whether a link exists
#[utoipa::path(
    get,
    path = "/api/v1/routine-exercises/{id}/exists",
    tag = "Routine Exercises",
    params(("id" = i64, Path, description = "Link ID")),
    responses((status = 200, description = "Existence flag", body = bool))
)]
pub async fn link_exists(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    Ok(Json(state.routine_exercise_service.link_exists(id).await?))
}
