//! Database migrations.
//!
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_roles_table;
mod m20240101_000002_create_users_table;
mod m20240101_000003_create_user_roles_table;
mod m20240101_000004_seed_default_roles;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_roles_table::Migration),
            Box::new(m20240101_000002_create_users_table::Migration),
            Box::new(m20240101_000003_create_user_roles_table::Migration),
            Box::new(m20240101_000004_seed_default_roles::Migration),
        ]
    }

    fn migration_table_name() -> DynIden {
        Alias::new("user_service_migrations").into_iden()
    }
}
