//! User Service Library
//!
//! HTTP API for user accounts, fitness profiles and roles. It can be run as a
//! standalone service or embedded in the combined binary.

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

use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::{RoleStore, UserStore};
use crate::routes::create_router;
use crate::service::{RoleManager, UserManager};
use crate::state::AppState;

/// Run the user service as an embedded component (for combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
    run_server_with_config(host, port, config).await
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = UserServiceConfig::from_env();
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
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset, roles seeded");
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

pub fn build_state(db: Database) -> AppState {
    let conn = db.get_connection();
    let user_service = Arc::new(UserManager::new(Arc::new(UserStore::new(conn.clone()))));
    let role_service = Arc::new(RoleManager::new(Arc::new(RoleStore::new(conn))));
    AppState::new(user_service, role_service, db)
}

async fn run_server_with_config(
    host: &str,
    port: u16,
    config: UserServiceConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let app = create_router(build_state(db));

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!(service = %config.service.service_name, "User service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
