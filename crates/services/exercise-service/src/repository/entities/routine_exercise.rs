//! Routine-exercise link entity for SeaORM.
//!
//! Deleting a routine cascades to its links; an exercise that is still
//! linked cannot be deleted.

use sea_orm::entity::prelude::*;

use domain::{Exercise, RoutineExercise};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "routine_exercises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub workout_routine_id: i64,
    pub exercise_id: i64,
    pub sets: i32,
    pub reps: i32,
    pub rest_time: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workout_routine::Entity",
        from = "Column::WorkoutRoutineId",
        to = "super::workout_routine::Column::Id",
        on_delete = "Cascade"
    )]
    WorkoutRoutine,
    #[sea_orm(
        belongs_to = "super::exercise::Entity",
        from = "Column::ExerciseId",
        to = "super::exercise::Column::Id",
        on_delete = "Restrict"
    )]
    Exercise,
}

impl Related<super::workout_routine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkoutRoutine.def()
    }
}

impl Related<super::exercise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exercise.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_link(self, exercise: Exercise) -> RoutineExercise {
        RoutineExercise {
            id: self.id,
            routine_id: self.workout_routine_id,
            exercise,
            sets: self.sets,
            reps: self.reps,
            rest_time: self.rest_time,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
