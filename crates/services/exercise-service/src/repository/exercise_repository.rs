//! Exercise catalog repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use super::entities::exercise::{self, ActiveModel, Entity as ExerciseEntity};
use super::entities::routine_exercise;
use super::links::lower_contains;
use common::{AppError, AppResult};
use domain::{Exercise, NewExercise};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Catalog attribute an exact-match filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseFilter {
    Muscle,
    Type,
    Difficulty,
    Equipment,
}

impl ExerciseFilter {
    fn column(self) -> exercise::Column {
        match self {
            ExerciseFilter::Muscle => exercise::Column::Muscle,
            ExerciseFilter::Type => exercise::Column::ExerciseType,
            ExerciseFilter::Difficulty => exercise::Column::Difficulty,
            ExerciseFilter::Equipment => exercise::Column::Equipment,
        }
    }

    /// Field label used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            ExerciseFilter::Muscle => "Muscle",
            ExerciseFilter::Type => "Type",
            ExerciseFilter::Difficulty => "Difficulty",
            ExerciseFilter::Equipment => "Equipment",
        }
    }
}

pub(crate) fn duplicate_name(name: &str) -> AppError {
    AppError::DuplicateName(format!("Exercise with name '{}' already exists", name))
}

pub(crate) fn in_use(id: i64) -> AppError {
    AppError::InUse(format!(
        "Exercise with ID {} is used in one or more workout routines",
        id
    ))
}

/// Exercise repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ExerciseRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Exercise>>;

    /// Exact, case-sensitive name lookup
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Exercise>>;

    async fn list(&self) -> AppResult<Vec<Exercise>>;

    /// Exact match on one catalog attribute
    async fn filter(&self, filter: ExerciseFilter, value: &str) -> AppResult<Vec<Exercise>>;

    /// Case-insensitive substring match on the name
    async fn search_by_name(&self, fragment: &str) -> AppResult<Vec<Exercise>>;

    async fn exists(&self, id: i64) -> AppResult<bool>;

    async fn create(&self, exercise: NewExercise) -> AppResult<Exercise>;

    /// Persist every mutable field of `exercise`
    async fn update(&self, exercise: &Exercise) -> AppResult<Exercise>;

    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Number of routine links that reference the exercise
    async fn count_links(&self, id: i64) -> AppResult<u64>;
}

/// SeaORM-backed exercise repository
pub struct ExerciseStore {
    db: DatabaseConnection,
}

impl ExerciseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ExerciseRepository for ExerciseStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Exercise>> {
        let result = ExerciseEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Exercise::from))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Exercise>> {
        let result = ExerciseEntity::find()
            .filter(exercise::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(result.map(Exercise::from))
    }

    async fn list(&self) -> AppResult<Vec<Exercise>> {
        let models = ExerciseEntity::find()
            .order_by_asc(exercise::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Exercise::from).collect())
    }

    async fn filter(&self, filter: ExerciseFilter, value: &str) -> AppResult<Vec<Exercise>> {
        let models = ExerciseEntity::find()
            .filter(filter.column().eq(value))
            .order_by_asc(exercise::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Exercise::from).collect())
    }

    async fn search_by_name(&self, fragment: &str) -> AppResult<Vec<Exercise>> {
        let models = ExerciseEntity::find()
            .filter(lower_contains(exercise::Column::Name, fragment))
            .order_by_asc(exercise::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Exercise::from).collect())
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        let count = ExerciseEntity::find()
            .filter(exercise::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, exercise: NewExercise) -> AppResult<Exercise> {
        let now = Utc::now();
        let name = exercise.name.clone();
        let active_model = ActiveModel {
            name: Set(exercise.name),
            exercise_type: Set(exercise.exercise_type),
            muscle: Set(exercise.muscle),
            equipment: Set(exercise.equipment),
            difficulty: Set(exercise.difficulty),
            instructions: Set(exercise.instructions),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, || duplicate_name(&name)))?;
        Ok(Exercise::from(model))
    }

    async fn update(&self, exercise: &Exercise) -> AppResult<Exercise> {
        let model = ExerciseEntity::find_by_id(exercise.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("Exercise", exercise.id))?;

        let mut active: ActiveModel = model.into();
        active.name = Set(exercise.name.clone());
        active.exercise_type = Set(exercise.exercise_type.clone());
        active.muscle = Set(exercise.muscle.clone());
        active.equipment = Set(exercise.equipment.clone());
        active.difficulty = Set(exercise.difficulty.clone());
        active.instructions = Set(exercise.instructions.clone());
        active.updated_at = Set(exercise.updated_at);

        let model = active
            .update(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, || duplicate_name(&exercise.name)))?;
        Ok(Exercise::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = ExerciseEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                // A link was added after the service counted them
                Some(SqlErr::ForeignKeyConstraintViolation(_)) => in_use(id),
                _ => AppError::from(e),
            })?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Exercise", id));
        }

        Ok(())
    }

    async fn count_links(&self, id: i64) -> AppResult<u64> {
        let count = routine_exercise::Entity::find()
            .filter(routine_exercise::Column::ExerciseId.eq(id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
