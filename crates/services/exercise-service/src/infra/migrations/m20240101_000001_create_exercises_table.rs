//! Migration: Create exercises table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Exercises::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exercises::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Exercises::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Exercises::Type).string_len(50).not_null())
                    .col(ColumnDef::new(Exercises::Muscle).string_len(50).not_null())
                    .col(ColumnDef::new(Exercises::Equipment).string_len(50).null())
                    .col(ColumnDef::new(Exercises::Difficulty).string_len(20).null())
                    .col(ColumnDef::new(Exercises::Instructions).text().null())
                    .col(
                        ColumnDef::new(Exercises::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Exercises::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Filter endpoints hit these columns
        manager
            .create_index(
                Index::create()
                    .name("idx_exercises_muscle")
                    .table(Exercises::Table)
                    .col(Exercises::Muscle)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_exercises_type")
                    .table(Exercises::Table)
                    .col(Exercises::Type)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Exercises::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Exercises {
    Table,
    Id,
    Name,
    Type,
    Muscle,
    Equipment,
    Difficulty,
    Instructions,
    CreatedAt,
    UpdatedAt,
}
