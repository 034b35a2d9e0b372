//! Service layer for business logic.

mod exercise_service;
mod routine_exercise_service;
mod routine_service;

pub use exercise_service::{ExerciseManager, ExerciseService};
pub use routine_exercise_service::{RoutineExerciseManager, RoutineExerciseService};
pub use routine_service::{WorkoutRoutineManager, WorkoutRoutineService};
