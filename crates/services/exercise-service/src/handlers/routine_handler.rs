//! Workout routine handlers, including the embedded link operations.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppResult, Path, Query, ValidatedJson};
use domain::{
    LinkChanges, LinkParams, NewWorkoutRoutine, RoutineChanges, WorkoutRoutine,
    WorkoutRoutineResponse,
};

use crate::handlers::exercise_handler::NameQuery;
use crate::state::AppState;

/// Workout routine creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRoutineRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    #[schema(example = "Push Day")]
    pub name: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 50, message = "Duration cannot exceed 50 characters"))]
    #[schema(example = "45 min")]
    pub duration: Option<String>,
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "alice")]
    pub username: String,
}

/// Partial routine update. The owner cannot be changed.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutRoutineRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,
    #[validate(length(max = 50, message = "Duration cannot exceed 50 characters"))]
    pub duration: Option<String>,
}

/// Link an exercise into a routine
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddExerciseToRoutineRequest {
    #[validate(range(min = 1, message = "Exercise ID must be a positive number"))]
    pub exercise_id: i64,
    #[validate(range(min = 1, message = "Sets must be greater than 0"))]
    #[schema(example = 3)]
    pub sets: i32,
    #[validate(range(min = 1, message = "Reps must be greater than 0"))]
    #[schema(example = 10)]
    pub reps: i32,
    /// Seconds
    #[validate(range(min = 1, message = "Rest time must be positive"))]
    #[schema(example = 90)]
    pub rest_time: Option<i32>,
}

/// Change sets, reps or rest time of a linked exercise
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseInRoutineRequest {
    #[validate(range(min = 1, message = "Sets must be greater than 0"))]
    pub sets: Option<i32>,
    #[validate(range(min = 1, message = "Reps must be greater than 0"))]
    pub reps: Option<i32>,
    #[validate(range(min = 1, message = "Rest time must be positive"))]
    pub rest_time: Option<i32>,
}

/// `?name=&username=` search parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserSearchQuery {
    pub name: Option<String>,
    pub username: Option<String>,
}

fn to_responses(routines: Vec<WorkoutRoutine>) -> Json<Vec<WorkoutRoutineResponse>> {
    Json(
        routines
            .into_iter()
            .map(WorkoutRoutineResponse::from)
            .collect(),
    )
}

/// Create workout routine routes
pub fn routine_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routines).post(create_routine))
        .route("/search", get(search_routines))
        .route("/search/user", get(search_user_routines))
        .route("/user/:username", get(routines_by_username))
        .route("/exercise/:exercise_id", get(routines_by_exercise))
        .route(
            "/:id",
            get(get_routine).put(update_routine).delete(delete_routine),
        )
        .route("/:id/exists", get(routine_exists))
        .route(
            "/:id/user/:username",
            get(get_user_routine).delete(delete_user_routine),
        )
        .route("/:id/owner/:username", get(is_owner))
        .route("/:id/exercises", post(add_exercise))
        .route(
            "/:id/exercises/:exercise_id",
            put(update_exercise_in_routine).delete(remove_exercise),
        )
}

/// Create a workout routine
#[utoipa::path(
    post,
    path = "/api/v1/workout-routines",
    tag = "Workout Routines",
    request_body = WorkoutRoutineRequest,
    responses(
        (status = 201, description = "Routine created", body = WorkoutRoutineResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Owner already has a routine with this name")
    )
)]
pub async fn create_routine(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<WorkoutRoutineRequest>,
) -> AppResult<(StatusCode, Json<WorkoutRoutineResponse>)> {
    let routine = state
        .routine_service
        .create_routine(NewWorkoutRoutine {
            name: req.name,
            description: req.description,
            duration: req.duration,
            username: req.username,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(routine.into())))
}

/// List every routine
#[utoipa::path(
    get,
    path = "/api/v1/workout-routines",
    tag = "Workout Routines",
    responses(
        (status = 200, description = "All routines", body = Vec<WorkoutRoutineResponse>)
    )
)]
pub async fn list_routines(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<WorkoutRoutineResponse>>> {
    Ok(to_responses(state.routine_service.list_routines().await?))
}

/// Get routine by ID
#[utoipa::path(
    get,
    path = "/api/v1/workout-routines/{id}",
    tag = "Workout Routines",
    params(("id" = i64, Path, description = "Routine ID")),
    responses(
        (status = 200, description = "Routine with its exercises", body = WorkoutRoutineResponse),
        (status = 404, description = "Routine not found")
    )
)]
pub async fn get_routine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<WorkoutRoutineResponse>> {
    let routine = state.routine_service.get_routine(id).await?;
    Ok(Json(routine.into()))
}

/// Search routines by name fragment
#[utoipa::path(
    get,
    path = "/api/v1/workout-routines/search",
    tag = "Workout Routines",
    params(NameQuery),
    responses(
        (status = 200, description = "Matching routines", body = Vec<WorkoutRoutineResponse>),
        (status = 400, description = "Missing or blank name")
    )
)]
pub async fn search_routines(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> AppResult<Json<Vec<WorkoutRoutineResponse>>> {
    let routines = state
        .routine_service
        .search_routines(query.name.as_deref().unwrap_or_default(), None)
        .await?;
    Ok(to_responses(routines))
}

/// Search one user's routines by name fragment
#[utoipa::path(
    get,
    path = "/api/v1/workout-routines/search/user",
    tag = "Workout Routines",
    params(UserSearchQuery),
    responses(
        (status = 200, description = "Matching routines", body = Vec<WorkoutRoutineResponse>),
        (status = 400, description = "Missing or blank name or username")
    )
)]
pub async fn search_user_routines(
    State(state): State<AppState>,
    Query(query): Query<UserSearchQuery>,
) -> AppResult<Json<Vec<WorkoutRoutineResponse>>> {
    let routines = state
        .routine_service
        .search_routines(
            query.name.as_deref().unwrap_or_default(),
            Some(query.username.unwrap_or_default()),
        )
        .await?;
    Ok(to_responses(routines))
}

/// Routines owned by a user
#[utoipa::path(
    get,
    path = "/api/v1/workout-routines/user/{username}",
    tag = "Workout Routines",
    params(("username" = String, Path, description = "Owner username")),
    responses(
        (status = 200, description = "Owner's routines", body = Vec<WorkoutRoutineResponse>)
    )
)]
pub async fn routines_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Vec<WorkoutRoutineResponse>>> {
    let routines = state
        .routine_service
        .list_routines_by_username(&username)
        .await?;
    Ok(to_responses(routines))
}

/// Routines that include an exercise
#[utoipa::path(
    get,
    path = "/api/v1/workout-routines/exercise/{exercise_id}",
    tag = "Workout Routines",
    params(("exercise_id" = i64, Path, description = "Exercise ID")),
    responses(
        (status = 200, description = "Routines linking the exercise", body = Vec<WorkoutRoutineResponse>)
    )
)]
pub async fn routines_by_exercise(
    State(state): State<AppState>,
    Path(exercise_id): Path<i64>,
) -> AppResult<Json<Vec<WorkoutRoutineResponse>>> {
    let routines = state
        .routine_service
        .list_routines_by_exercise(exercise_id)
        .await?;
    Ok(to_responses(routines))
}

/// Update routine name, description or duration
#[utoipa::path(
    put,
    path = "/api/v1/workout-routines/{id}",
    tag = "Workout Routines",
    params(("id" = i64, Path, description = "Routine ID")),
    request_body = UpdateWorkoutRoutineRequest,
    responses(
        (status = 200, description = "Routine updated", body = WorkoutRoutineResponse),
        (status = 404, description = "Routine not found"),
        (status = 409, description = "Owner already has a routine with this name")
    )
)]
pub async fn update_routine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateWorkoutRoutineRequest>,
) -> AppResult<Json<WorkoutRoutineResponse>> {
    let routine = state
        .routine_service
        .update_routine(
            id,
            RoutineChanges {
                name: req.name,
                description: req.description,
                duration: req.duration,
            },
        )
        .await?;
    Ok(Json(routine.into()))
}

/// Delete a routine and its links
#[utoipa::path(
    delete,
    path = "/api/v1/workout-routines/{id}",
    tag = "Workout Routines",
    params(("id" = i64, Path, description = "Routine ID")),
    responses(
        (status = 204, description = "Routine deleted"),
        (status = 404, description = "Routine not found")
    )
)]
pub async fn delete_routine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.routine_service.delete_routine(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Whether a routine exists
#[utoipa::path(
    get,
    path = "/api/v1/workout-routines/{id}/exists",
    tag = "Workout Routines",
    params(("id" = i64, Path, description = "Routine ID")),
    responses((status = 200, description = "Existence flag", body = bool))
)]
pub async fn routine_exists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let Ok(id) = id.parse::<i64>() else {
        return Ok(Json(false));
    };
    Ok(Json(state.routine_service.routine_exists(id).await?))
}

/// Get a routine only if the user owns it
#[utoipa::path(
    get,
    path = "/api/v1/workout-routines/{id}/user/{username}",
    tag = "Workout Routines",
    params(
        ("id" = i64, Path, description = "Routine ID"),
        ("username" = String, Path, description = "Owner username")
    ),
    responses(
        (status = 200, description = "Routine", body = WorkoutRoutineResponse),
        (status = 404, description = "No such routine for this user")
    )
)]
pub async fn get_user_routine(
    State(state): State<AppState>,
    Path((id, username)): Path<(i64, String)>,
) -> AppResult<Json<WorkoutRoutineResponse>> {
    let routine = state
        .routine_service
        .get_routine_for_user(id, &username)
        .await?;
    Ok(Json(routine.into()))
}

/// Delete a routine only if the user owns it
#[utoipa::path(
    delete,
    path = "/api/v1/workout-routines/{id}/user/{username}",
    tag = "Workout Routines",
    params(
        ("id" = i64, Path, description = "Routine ID"),
        ("username" = String, Path, description = "Owner username")
    ),
    responses(
        (status = 204, description = "Routine deleted"),
        (status = 404, description = "No such routine for this user")
    )
)]
pub async fn delete_user_routine(
    State(state): State<AppState>,
    Path((id, username)): Path<(i64, String)>,
) -> AppResult<StatusCode> {
    state
        .routine_service
        .delete_routine_for_user(id, &username)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Whether the user owns the routine
#[utoipa::path(
    get,
    path = "/api/v1/workout-routines/{id}/owner/{username}",
    tag = "Workout Routines",
    params(
        ("id" = i64, Path, description = "Routine ID"),
        ("username" = String, Path, description = "Candidate owner")
    ),
    responses((status = 200, description = "Ownership flag", body = bool))
)]
pub async fn is_owner(
    State(state): State<AppState>,
    Path((id, username)): Path<(String, String)>,
) -> AppResult<Json<bool>> {
    let Ok(id) = id.parse::<i64>() else {
        return Ok(Json(false));
    };
    Ok(Json(state.routine_service.is_owner(id, &username).await?))
}

/// Add an exercise to a routine
#[utoipa::path(
    post,
    path = "/api/v1/workout-routines/{id}/exercises",
    tag = "Workout Routines",
    params(("id" = i64, Path, description = "Routine ID")),
    request_body = AddExerciseToRoutineRequest,
    responses(
        (status = 200, description = "Routine with the new exercise", body = WorkoutRoutineResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Routine or exercise not found"),
        (status = 409, description = "Exercise already in routine")
    )
)]
pub async fn add_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<AddExerciseToRoutineRequest>,
) -> AppResult<Json<WorkoutRoutineResponse>> {
    let params = LinkParams {
        sets: req.sets,
        reps: req.reps,
        rest_time: req.rest_time,
    };
    let routine = state
        .routine_service
        .add_exercise(id, req.exercise_id, params)
        .await?;
    Ok(Json(routine.into()))
}

/// Update sets, reps or rest time of an exercise in a routine
#[utoipa::path(
    put,
    path = "/api/v1/workout-routines/{id}/exercises/{exercise_id}",
    tag = "Workout Routines",
    params(
        ("id" = i64, Path, description = "Routine ID"),
        ("exercise_id" = i64, Path, description = "Exercise ID")
    ),
    request_body = UpdateExerciseInRoutineRequest,
    responses(
        (status = 200, description = "Updated routine", body = WorkoutRoutineResponse),
        (status = 404, description = "Routine not found or exercise not in routine")
    )
)]
pub async fn update_exercise_in_routine(
    State(state): State<AppState>,
    Path((id, exercise_id)): Path<(i64, i64)>,
    ValidatedJson(req): ValidatedJson<UpdateExerciseInRoutineRequest>,
) -> AppResult<Json<WorkoutRoutineResponse>> {
    let changes = LinkChanges {
        sets: req.sets,
        reps: req.reps,
        rest_time: req.rest_time,
    };
    let routine = state
        .routine_service
        .update_exercise_in_routine(id, exercise_id, changes)
        .await?;
    Ok(Json(routine.into()))
}

/// Remove an exercise from a routine
#[utoipa::path(
    delete,
    path = "/api/v1/workout-routines/{id}/exercises/{exercise_id}",
    tag = "Workout Routines",
    params(
        ("id" = i64, Path, description = "Routine ID"),
        ("exercise_id" = i64, Path, description = "Exercise ID")
    ),
    responses(
        (status = 200, description = "Routine without the exercise", body = WorkoutRoutineResponse),
        (status = 404, description = "Routine not found or exercise not in routine")
    )
)]
pub async fn remove_exercise(
    State(state): State<AppState>,
    Path((id, exercise_id)): Path<(i64, i64)>,
) -> AppResult<Json<WorkoutRoutineResponse>> {
    let routine = state
        .routine_service
        .remove_exercise(id, exercise_id)
        .await?;
    Ok(Json(routine.into()))
}
