//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::exercise_handler::{ExerciseRequest, UpdateExerciseRequest};
use crate::handlers::routine_exercise_handler::{
    RoutineExerciseRequest, UpdateRoutineExerciseRequest,
};
use crate::handlers::routine_handler::{
    AddExerciseToRoutineRequest, UpdateExerciseInRoutineRequest, UpdateWorkoutRoutineRequest,
    WorkoutRoutineRequest,
};
use domain::{
    ExerciseResponse, RoutineExerciseResponse, RoutineSummaryResponse, WorkoutRoutineResponse,
};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::exercise_handler::create_exercise,
        crate::handlers::exercise_handler::list_exercises,
        crate::handlers::exercise_handler::get_exercise,
        crate::handlers::exercise_handler::exercises_by_muscle,
        crate::handlers::exercise_handler::exercises_by_type,
        crate::handlers::exercise_handler::exercises_by_difficulty,
        crate::handlers::exercise_handler::exercises_by_equipment,
        crate::handlers::exercise_handler::search_exercises,
        crate::handlers::exercise_handler::update_exercise,
        crate::handlers::exercise_handler::delete_exercise,
        crate::handlers::exercise_handler::exercise_exists,
        crate::handlers::routine_handler::create_routine,
        crate::handlers::routine_handler::list_routines,
        crate::handlers::routine_handler::get_routine,
        crate::handlers::routine_handler::search_routines,
        crate::handlers::routine_handler::search_user_routines,
        crate::handlers::routine_handler::routines_by_username,
        crate::handlers::routine_handler::routines_by_exercise,
        crate::handlers::routine_handler::update_routine,
        crate::handlers::routine_handler::delete_routine,
        crate::handlers::routine_handler::routine_exists,
        crate::handlers::routine_handler::get_user_routine,
        crate::handlers::routine_handler::delete_user_routine,
        crate::handlers::routine_handler::is_owner,
        crate::handlers::routine_handler::add_exercise,
        crate::handlers::routine_handler::update_exercise_in_routine,
        crate::handlers::routine_handler::remove_exercise,
        crate::handlers::routine_exercise_handler::create_link,
        crate::handlers::routine_exercise_handler::list_links,
        crate::handlers::routine_exercise_handler::get_link,
        crate::handlers::routine_exercise_handler::links_by_routine,
        crate::handlers::routine_exercise_handler::links_by_exercise,
        crate::handlers::routine_exercise_handler::update_link,
        crate::handlers::routine_exercise_handler::delete_link,
        crate::handlers::routine_exercise_handler::link_exists,
    ),
    components(
        schemas(
            ExerciseRequest,
            UpdateExerciseRequest,
            ExerciseResponse,
            WorkoutRoutineRequest,
            UpdateWorkoutRoutineRequest,
            AddExerciseToRoutineRequest,
            UpdateExerciseInRoutineRequest,
            WorkoutRoutineResponse,
            RoutineSummaryResponse,
            RoutineExerciseRequest,
            UpdateRoutineExerciseRequest,
            RoutineExerciseResponse,
        )
    ),
    tags(
        (name = "Exercises", description = "Exercise catalog"),
        (name = "Workout Routines", description = "User-owned workout routines"),
        (name = "Routine Exercises", description = "Direct access to routine-exercise links"),
    )
)]
pub struct ApiDoc;
