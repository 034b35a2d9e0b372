//! Workout routine entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{RoutineExercise, RoutineSummary, WorkoutRoutine};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workout_routines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub duration: Option<String>,
    pub username: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::routine_exercise::Entity")]
    RoutineExercises,
}

impl Related<super::routine_exercise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoutineExercises.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Attach already-loaded links to build the aggregate.
    pub fn into_routine(self, exercises: Vec<RoutineExercise>) -> WorkoutRoutine {
        WorkoutRoutine {
            id: self.id,
            name: self.name,
            description: self.description,
            duration: self.duration,
            username: self.username,
            exercises,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<Model> for RoutineSummary {
    fn from(model: Model) -> Self {
        RoutineSummary {
            id: model.id,
            name: model.name,
            description: model.description,
            duration: model.duration,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
