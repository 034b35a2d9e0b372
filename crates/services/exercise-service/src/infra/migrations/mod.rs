//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_exercises_table;
mod m20240101_000002_create_workout_routines_table;
mod m20240101_000003_create_routine_exercises_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_exercises_table::Migration),
            Box::new(m20240101_000002_create_workout_routines_table::Migration),
            Box::new(m20240101_000003_create_routine_exercises_table::Migration),
        ]
    }

    /// Own bookkeeping table so both services can share one database.
    fn migration_table_name() -> DynIden {
        Alias::new("exercise_service_migrations").into_iden()
    }
}
