//! Exercise Service Library
//!
//! HTTP API for the exercise catalog, workout routines and routine-exercise
//! links. It can be run as a standalone service or embedded in the combined
//! binary.

pub mod config;
pub mod handlers;
pub mod infra;
pub mod openapi;
pub mod repository;
pub mod routes;
pub mod service;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use crate::config::ExerciseServiceConfig;
use crate::infra::Database;
use crate::repository::{ExerciseStore, RoutineExerciseStore, WorkoutRoutineStore};
use crate::routes::create_router;
use crate::service::{ExerciseManager, RoutineExerciseManager, WorkoutRoutineManager};
use crate::state::AppState;

/// Run the exercise service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = ExerciseServiceConfig::from_env();
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = ExerciseServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            for (name, applied) in db.migration_status().await? {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Wire stores, managers and handlers over one database.
pub fn build_state(db: Database) -> AppState {
    let conn = db.get_connection();

    let exercise_repo = Arc::new(ExerciseStore::new(conn.clone()));
    let routine_repo = Arc::new(WorkoutRoutineStore::new(conn.clone()));
    let link_repo = Arc::new(RoutineExerciseStore::new(conn));

    let exercise_service = Arc::new(ExerciseManager::new(exercise_repo.clone()));
    let routine_service = Arc::new(WorkoutRoutineManager::new(
        routine_repo.clone(),
        exercise_repo.clone(),
    ));
    let routine_exercise_service = Arc::new(RoutineExerciseManager::new(
        link_repo,
        routine_repo,
        exercise_repo,
    ));

    AppState::new(exercise_service, routine_service, routine_exercise_service, db)
}

/// Run the HTTP server with the given configuration.
async fn run_server_with_config(
    host: &str,
    port: u16,
    config: ExerciseServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let app = create_router(build_state(db));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!(service = %config.service.service_name, "Exercise service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
