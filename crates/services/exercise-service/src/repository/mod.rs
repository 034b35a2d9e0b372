//! Repository layer for data access.

pub mod entities;
mod exercise_repository;
mod links;
mod routine_exercise_repository;
mod routine_repository;

pub use exercise_repository::{ExerciseFilter, ExerciseRepository, ExerciseStore};
pub use routine_exercise_repository::{RoutineExerciseRepository, RoutineExerciseStore};
pub use routine_repository::{WorkoutRoutineRepository, WorkoutRoutineStore};

pub(crate) use exercise_repository::{
    duplicate_name as duplicate_exercise_name, in_use as exercise_in_use,
};
pub(crate) use links::duplicate_link;
pub(crate) use routine_repository::duplicate_name as duplicate_routine_name;

#[cfg(any(test, feature = "test-utils"))]
pub use exercise_repository::MockExerciseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use routine_exercise_repository::MockRoutineExerciseRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use routine_repository::MockWorkoutRoutineRepository;
