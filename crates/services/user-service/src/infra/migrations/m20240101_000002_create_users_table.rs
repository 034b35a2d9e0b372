//! Migration: Create users table with profile columns.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::Phone).string_len(30).null())
                    .col(ColumnDef::new(Users::Weight).double().null())
                    .col(ColumnDef::new(Users::Height).integer().null())
                    .col(ColumnDef::new(Users::PhotoUrl).string().null())
                    .col(ColumnDef::new(Users::DateOfBirth).date().null())
                    .col(ColumnDef::new(Users::Gender).string_len(20).null())
                    .col(ColumnDef::new(Users::FitnessGoal).string().null())
                    .col(ColumnDef::new(Users::ExperienceLevel).string_len(50).null())
                    .col(ColumnDef::new(Users::WeeklyWorkouts).integer().null())
                    .col(ColumnDef::new(Users::WorkoutDuration).integer().null())
                    .col(ColumnDef::new(Users::PreferredWorkoutTimes).string().null())
                    .col(
                        ColumnDef::new(Users::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::Locked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::FailedLoginAttempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    DisplayName,
    Phone,
    Weight,
    Height,
    PhotoUrl,
    DateOfBirth,
    Gender,
    FitnessGoal,
    ExperienceLevel,
    WeeklyWorkouts,
    WorkoutDuration,
    PreferredWorkoutTimes,
    Enabled,
    Locked,
    FailedLoginAttempts,
    CreatedAt,
    UpdatedAt,
}
