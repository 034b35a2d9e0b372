//! Exercise catalog entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Exercise;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "exercises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    #[sea_orm(column_name = "type")]
    pub exercise_type: String,
    pub muscle: String,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub instructions: Option<String>,
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

impl From<Model> for Exercise {
    fn from(model: Model) -> Self {
        Exercise {
            id: model.id,
            name: model.name,
            exercise_type: model.exercise_type,
            muscle: model.muscle,
            equipment: model.equipment,
            difficulty: model.difficulty,
            instructions: model.instructions,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
