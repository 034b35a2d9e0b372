//! Infrastructure layer - database connection, migrations and role seeding.

mod db;
pub mod migrations;

pub use db::Database;
pub use migrations::Migrator;
