//! HTTP handlers.

pub mod health_handler;
pub mod role_handler;
pub mod user_handler;

pub use health_handler::health_routes;
pub use role_handler::role_routes;
pub use user_handler::user_routes;
