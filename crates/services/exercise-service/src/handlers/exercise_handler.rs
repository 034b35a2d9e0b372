//! Exercise catalog handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::{AppResult, Path, Query, ValidatedJson};
use domain::{Exercise, ExerciseChanges, ExerciseResponse, NewExercise};

use crate::repository::ExerciseFilter;
use crate::state::AppState;

/// Exercise creation request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    #[schema(example = "Bench Press")]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50, message = "Type is required"))]
    #[schema(example = "strength")]
    pub exercise_type: String,
    #[validate(length(min = 1, max = 50, message = "Muscle is required"))]
    #[schema(example = "chest")]
    pub muscle: String,
    #[schema(example = "barbell")]
    pub equipment: Option<String>,
    #[schema(example = "intermediate")]
    pub difficulty: Option<String>,
    pub instructions: Option<String>,
}

impl From<ExerciseRequest> for NewExercise {
    fn from(req: ExerciseRequest) -> Self {
        NewExercise {
            name: req.name,
            exercise_type: req.exercise_type,
            muscle: req.muscle,
            equipment: req.equipment,
            difficulty: req.difficulty,
            instructions: req.instructions,
        }
    }
}

/// Partial exercise update; omitted fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub exercise_type: Option<String>,
    pub muscle: Option<String>,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
    pub instructions: Option<String>,
}

impl From<UpdateExerciseRequest> for ExerciseChanges {
    fn from(req: UpdateExerciseRequest) -> Self {
        ExerciseChanges {
            name: req.name,
            exercise_type: req.exercise_type,
            muscle: req.muscle,
            equipment: req.equipment,
            difficulty: req.difficulty,
            instructions: req.instructions,
        }
    }
}

/// `?name=` search parameter
#[derive(Debug, Deserialize, IntoParams)]
pub struct NameQuery {
    /// Case-insensitive name fragment
    pub name: Option<String>,
}

fn to_responses(exercises: Vec<Exercise>) -> Json<Vec<ExerciseResponse>> {
    Json(exercises.into_iter().map(ExerciseResponse::from).collect())
}

/// Create exercise routes
pub fn exercise_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exercises).post(create_exercise))
        .route("/search", get(search_exercises))
        .route("/muscle/:muscle", get(exercises_by_muscle))
        .route("/type/:type", get(exercises_by_type))
        .route("/difficulty/:difficulty", get(exercises_by_difficulty))
        .route("/equipment/:equipment", get(exercises_by_equipment))
        .route(
            "/:id",
            get(get_exercise).put(update_exercise).delete(delete_exercise),
        )
        .route("/:id/exists", get(exercise_exists))
}

/// Create a catalog exercise
#[utoipa::path(
    post,
    path = "/api/v1/exercises",
    tag = "Exercises",
    request_body = ExerciseRequest,
    responses(
        (status = 201, description = "Exercise created", body = ExerciseResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Exercise name already exists")
    )
)]
pub async fn create_exercise(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ExerciseRequest>,
) -> AppResult<(StatusCode, Json<ExerciseResponse>)> {
    let exercise = state.exercise_service.create_exercise(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ExerciseResponse::from(exercise))))
}

/// List every exercise
#[utoipa::path(
    get,
    path = "/api/v1/exercises",
    tag = "Exercises",
    responses(
        (status = 200, description = "All exercises", body = Vec<ExerciseResponse>)
    )
)]
pub async fn list_exercises(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ExerciseResponse>>> {
    let exercises = state.exercise_service.list_exercises().await?;
    Ok(to_responses(exercises))
}

/// Get exercise by ID
#[utoipa::path(
    get,
    path = "/api/v1/exercises/{id}",
    tag = "Exercises",
    params(("id" = i64, Path, description = "Exercise ID")),
    responses(
        (status = 200, description = "Exercise", body = ExerciseResponse),
        (status = 404, description = "Exercise not found")
    )
)]
pub async fn get_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ExerciseResponse>> {
    let exercise = state.exercise_service.get_exercise(id).await?;
    Ok(Json(ExerciseResponse::from(exercise)))
}

/// Exercises targeting one muscle
#[utoipa::path(
    get,
    path = "/api/v1/exercises/muscle/{muscle}",
    tag = "Exercises",
    params(("muscle" = String, Path, description = "Exact muscle value")),
    responses(
        (status = 200, description = "Matching exercises", body = Vec<ExerciseResponse>)
    )
)]
pub async fn exercises_by_muscle(
    State(state): State<AppState>,
    Path(muscle): Path<String>,
) -> AppResult<Json<Vec<ExerciseResponse>>> {
    let exercises = state
        .exercise_service
        .filter_exercises(ExerciseFilter::Muscle, &muscle)
        .await?;
    Ok(to_responses(exercises))
}

/// Exercises of one type
#[utoipa::path(
    get,
    path = "/api/v1/exercises/type/{type}",
    tag = "Exercises",
    params(("type" = String, Path, description = "Exact type value")),
    responses(
        (status = 200, description = "Matching exercises", body = Vec<ExerciseResponse>)
    )
)]
pub async fn exercises_by_type(
    State(state): State<AppState>,
    Path(exercise_type): Path<String>,
) -> AppResult<Json<Vec<ExerciseResponse>>> {
    let exercises = state
        .exercise_service
        .filter_exercises(ExerciseFilter::Type, &exercise_type)
        .await?;
    Ok(to_responses(exercises))
}

/// Exercises of one difficulty
#[utoipa::path(
    get,
    path = "/api/v1/exercises/difficulty/{difficulty}",
    tag = "Exercises",
    params(("difficulty" = String, Path, description = "Exact difficulty value")),
    responses(
        (status = 200, description = "Matching exercises", body = Vec<ExerciseResponse>)
    )
)]
pub async fn exercises_by_difficulty(
    State(state): State<AppState>,
    Path(difficulty): Path<String>,
) -> AppResult<Json<Vec<ExerciseResponse>>> {
    let exercises = state
        .exercise_service
        .filter_exercises(ExerciseFilter::Difficulty, &difficulty)
        .await?;
    Ok(to_responses(exercises))
}

/// Exercises using one piece of equipment
#[utoipa::path(
    get,
    path = "/api/v1/exercises/equipment/{equipment}",
    tag = "Exercises",
    params(("equipment" = String, Path, description = "Exact equipment value")),
    responses(
        (status = 200, description = "Matching exercises", body = Vec<ExerciseResponse>)
    )
)]
pub async fn exercises_by_equipment(
    State(state): State<AppState>,
    Path(equipment): Path<String>,
) -> AppResult<Json<Vec<ExerciseResponse>>> {
    let exercises = state
        .exercise_service
        .filter_exercises(ExerciseFilter::Equipment, &equipment)
        .await?;
    Ok(to_responses(exercises))
}

/// Search exercises by name fragment
#[utoipa::path(
    get,
    path = "/api/v1/exercises/search",
    tag = "Exercises",
    params(NameQuery),
    responses(
        (status = 200, description = "Matching exercises", body = Vec<ExerciseResponse>),
        (status = 400, description = "Missing or blank name")
    )
)]
pub async fn search_exercises(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> AppResult<Json<Vec<ExerciseResponse>>> {
    let exercises = state
        .exercise_service
        .search_exercises(query.name.as_deref().unwrap_or_default())
        .await?;
    Ok(to_responses(exercises))
}

/// Update an exercise
#[utoipa::path(
    put,
    path = "/api/v1/exercises/{id}",
    tag = "Exercises",
    params(("id" = i64, Path, description = "Exercise ID")),
    request_body = UpdateExerciseRequest,
    responses(
        (status = 200, description = "Exercise updated", body = ExerciseResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Exercise not found"),
        (status = 409, description = "Exercise name already exists")
    )
)]
pub async fn update_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateExerciseRequest>,
) -> AppResult<Json<ExerciseResponse>> {
    let exercise = state
        .exercise_service
        .update_exercise(id, req.into())
        .await?;
    Ok(Json(ExerciseResponse::from(exercise)))
}

/// Delete an exercise that no routine references
#[utoipa::path(
    delete,
    path = "/api/v1/exercises/{id}",
    tag = "Exercises",
    params(("id" = i64, Path, description = "Exercise ID")),
    responses(
        (status = 204, description = "Exercise deleted"),
        (status = 404, description = "Exercise not found"),
        (status = 409, description = "Exercise is used in a workout routine")
    )
)]
pub async fn delete_exercise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    state.exercise_service.delete_exercise(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Whether an exercise exists
#[utoipa::path(
    get,
    path = "/api/v1/exercises/{id}/exists",
    tag = "Exercises",
    params(("id" = i64, Path, description = "Exercise ID")),
    responses(
        (status = 200, description = "Existence flag", body = bool)
    )
)]
pub async fn exercise_exists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    // An id that is not a number names no exercise
    let Ok(id) = id.parse::<i64>() else {
        return Ok(Json(false));
    };
    Ok(Json(state.exercise_service.exercise_exists(id).await?))
}
