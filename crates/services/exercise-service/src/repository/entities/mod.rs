//! SeaORM entities for the exercise-service tables.

pub mod exercise;
pub mod routine_exercise;
pub mod workout_routine;
