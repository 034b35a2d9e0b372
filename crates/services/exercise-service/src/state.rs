//! Application state for dependency injection.

use std::sync::Arc;

use crate::infra::Database;
use crate::service::{ExerciseService, RoutineExerciseService, WorkoutRoutineService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub exercise_service: Arc<dyn ExerciseService>,
    pub routine_service: Arc<dyn WorkoutRoutineService>,
    pub routine_exercise_service: Arc<dyn RoutineExerciseService>,
    pub db: Database,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        exercise_service: Arc<dyn ExerciseService>,
        routine_service: Arc<dyn WorkoutRoutineService>,
        routine_exercise_service: Arc<dyn RoutineExerciseService>,
        db: Database,
    ) -> Self {
        Self {
            exercise_service,
            routine_service,
            routine_exercise_service,
            db,
        }
    }
}
