//! Combined binary for development - runs both services in one process.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fitness-api")]
#[command(about = "Combined fitness microservices binary for development")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run both services in a single process (development mode)
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "EXERCISE_SERVICE_PORT", default_value = "8081")]
        exercise_port: u16,
        #[arg(long, env = "USER_SERVICE_PORT", default_value = "8082")]
        user_port: u16,
    },
    /// Run database migrations for both services
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            exercise_port,
            user_port,
        } => {
            info!("Starting combined services in development mode");
            info!("  Exercise service: http://{}:{}", host, exercise_port);
            info!("  User service:     http://{}:{}", host, user_port);

            let exercise_host = host.clone();
            let exercise_handle = tokio::spawn(async move {
                if let Err(e) =
                    exercise_service_lib::run_embedded(&exercise_host, exercise_port).await
                {
                    error!("Exercise service failed: {}", e);
                }
            });

            let user_handle = tokio::spawn(async move {
                if let Err(e) = user_service_lib::run_embedded(&host, user_port).await {
                    error!("User service failed: {}", e);
                }
            });

            // Either service exiting means something went wrong
            tokio::select! {
                _ = exercise_handle => {
                    error!("Exercise service exited unexpectedly");
                }
                _ = user_handle => {
                    error!("User service exited unexpectedly");
                }
            }
        }
        Commands::Migrate { action } => {
            let (exercise_action, user_action) = match action {
                MigrateAction::Up => (
                    exercise_service_lib::MigrateAction::Up,
                    user_service_lib::MigrateAction::Up,
                ),
                MigrateAction::Down => (
                    exercise_service_lib::MigrateAction::Down,
                    user_service_lib::MigrateAction::Down,
                ),
                MigrateAction::Status => (
                    exercise_service_lib::MigrateAction::Status,
                    user_service_lib::MigrateAction::Status,
                ),
                MigrateAction::Fresh => (
                    exercise_service_lib::MigrateAction::Fresh,
                    user_service_lib::MigrateAction::Fresh,
                ),
            };

            // Each service keeps its own migration table
            info!("Exercise service migrations");
            exercise_service_lib::run_migrations(exercise_action).await?;
            info!("User service migrations");
            user_service_lib::run_migrations(user_action).await?;
        }
    }

    Ok(())
}
