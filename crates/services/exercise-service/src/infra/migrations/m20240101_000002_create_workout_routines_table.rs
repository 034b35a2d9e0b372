//! Migration: Create workout_routines table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkoutRoutines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkoutRoutines::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkoutRoutines::Name).string_len(100).not_null())
                    .col(ColumnDef::new(WorkoutRoutines::Description).text().null())
                    .col(ColumnDef::new(WorkoutRoutines::Duration).string_len(50).null())
                    .col(
                        ColumnDef::new(WorkoutRoutines::Username)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WorkoutRoutines::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WorkoutRoutines::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // One name per owner
        manager
            .create_index(
                Index::create()
                    .name("idx_workout_routines_name_username")
                    .table(WorkoutRoutines::Table)
                    .col(WorkoutRoutines::Name)
                    .col(WorkoutRoutines::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workout_routines_username")
                    .table(WorkoutRoutines::Table)
                    .col(WorkoutRoutines::Username)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkoutRoutines::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum WorkoutRoutines {
    Table,
    Id,
    Name,
    Description,
    Duration,
    Username,
    CreatedAt,
    UpdatedAt,
}
