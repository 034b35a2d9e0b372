//! Migration: Create routine_exercises link table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_exercises_table::Exercises;
use super::m20240101_000002_create_workout_routines_table::WorkoutRoutines;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoutineExercises::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoutineExercises::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RoutineExercises::WorkoutRoutineId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RoutineExercises::ExerciseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RoutineExercises::Sets).integer().not_null())
                    .col(ColumnDef::new(RoutineExercises::Reps).integer().not_null())
                    .col(ColumnDef::new(RoutineExercises::RestTime).integer().null())
                    .col(
                        ColumnDef::new(RoutineExercises::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(RoutineExercises::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routine_exercises_workout_routine")
                            .from(RoutineExercises::Table, RoutineExercises::WorkoutRoutineId)
                            .to(WorkoutRoutines::Table, WorkoutRoutines::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_routine_exercises_exercise")
                            .from(RoutineExercises::Table, RoutineExercises::ExerciseId)
                            .to(Exercises::Table, Exercises::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one link per (routine, exercise)
        manager
            .create_index(
                Index::create()
                    .name("idx_routine_exercises_routine_exercise")
                    .table(RoutineExercises::Table)
                    .col(RoutineExercises::WorkoutRoutineId)
                    .col(RoutineExercises::ExerciseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_routine_exercises_exercise_id")
                    .table(RoutineExercises::Table)
                    .col(RoutineExercises::ExerciseId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoutineExercises::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum RoutineExercises {
    Table,
    Id,
    WorkoutRoutineId,
    ExerciseId,
    Sets,
    Reps,
    RestTime,
    CreatedAt,
    UpdatedAt,
}
