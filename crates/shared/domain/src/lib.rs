//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Both services share these types; the response structs double as the
//! HTTP wire format.

pub mod constants;
pub mod error;
pub mod exercise;
pub mod password;
pub mod role;
pub mod routine;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use exercise::{Exercise, ExerciseChanges, ExerciseResponse, NewExercise};
pub use password::Password;
pub use role::{validate_role_name, Role, RoleResponse};
pub use routine::{
    LinkChanges, LinkParams, NewWorkoutRoutine, RoutineChanges, RoutineExercise,
    RoutineExerciseDetail, RoutineExerciseResponse, RoutineSummary, RoutineSummaryResponse,
    WorkoutRoutine, WorkoutRoutineResponse,
};
pub use user::{
    validate_account, Credentials, NewUser, User, UserChanges, UserProfile, UserResponse,
};
