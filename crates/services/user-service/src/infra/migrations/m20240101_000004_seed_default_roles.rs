//! Migration: Seed the built-in roles.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::OnConflict;

use domain::SEEDED_ROLES;

use super::m20240101_000001_create_roles_table::Roles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Roles::Table)
            .columns([Roles::Name])
            .on_conflict(OnConflict::column(Roles::Name).do_nothing().to_owned());
        for role in SEEDED_ROLES {
            insert.values_panic([(*role).into()]);
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Roles::Table)
            .and_where(Expr::col(Roles::Name).is_in(SEEDED_ROLES.iter().copied()))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
