//! HTTP handlers.

pub mod exercise_handler;
pub mod health_handler;
pub mod routine_exercise_handler;
pub mod routine_handler;

pub use exercise_handler::exercise_routes;
pub use health_handler::health_routes;
pub use routine_exercise_handler::routine_exercise_routes;
pub use routine_handler::routine_routes;
