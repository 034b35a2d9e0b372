//! Direct access to routine-exercise links.
//!
//! Every write also refreshes the owning routine's `updated_at`, in the same
//! transaction.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, TransactionTrait,
};

use super::entities::routine_exercise::{self, Entity as LinkEntity};
use super::links;
use common::{AppError, AppResult, OptionExt};
use domain::{LinkParams, RoutineExercise, RoutineExerciseDetail};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Routine-exercise repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoutineExerciseRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<RoutineExerciseDetail>>;

    async fn list(&self) -> AppResult<Vec<RoutineExerciseDetail>>;

    async fn list_by_routine(&self, routine_id: i64) -> AppResult<Vec<RoutineExerciseDetail>>;

    async fn list_by_exercise(&self, exercise_id: i64) -> AppResult<Vec<RoutineExerciseDetail>>;

    async fn exists(&self, id: i64) -> AppResult<bool>;

    /// Whether the routine already links the exercise
    async fn exists_by_routine_and_exercise(
        &self,
        routine_id: i64,
        exercise_id: i64,
    ) -> AppResult<bool>;

    async fn create(
        &self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<RoutineExerciseDetail>;

    /// Persist sets, reps, rest time and `updated_at`
    async fn update(&self, link: &RoutineExercise) -> AppResult<RoutineExerciseDetail>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// SeaORM-backed routine-exercise repository
pub struct RoutineExerciseStore {
    db: DatabaseConnection,
}

impl RoutineExerciseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn link_not_found(id: i64) -> String {
    format!("Routine exercise not found with ID: {}", id)
}

#[async_trait]
impl RoutineExerciseRepository for RoutineExerciseStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<RoutineExerciseDetail>> {
        let query = LinkEntity::find().filter(routine_exercise::Column::Id.eq(id));
        Ok(links::load_details(&self.db, query).await?.pop())
    }

    async fn list(&self) -> AppResult<Vec<RoutineExerciseDetail>> {
        links::load_details(&self.db, LinkEntity::find()).await
    }

    async fn list_by_routine(&self, routine_id: i64) -> AppResult<Vec<RoutineExerciseDetail>> {
        let query =
            LinkEntity::find().filter(routine_exercise::Column::WorkoutRoutineId.eq(routine_id));
        links::load_details(&self.db, query).await
    }

    async fn list_by_exercise(&self, exercise_id: i64) -> AppResult<Vec<RoutineExerciseDetail>> {
        let query = LinkEntity::find().filter(routine_exercise::Column::ExerciseId.eq(exercise_id));
        links::load_details(&self.db, query).await
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        let count = LinkEntity::find()
            .filter(routine_exercise::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_routine_and_exercise(
        &self,
        routine_id: i64,
        exercise_id: i64,
    ) -> AppResult<bool> {
        let count = LinkEntity::find()
            .filter(routine_exercise::Column::WorkoutRoutineId.eq(routine_id))
            .filter(routine_exercise::Column::ExerciseId.eq(exercise_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create(
        &self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<RoutineExerciseDetail> {
        let txn = self.db.begin().await?;

        let model = links::insert_link(&txn, routine_id, exercise_id, params).await?;
        links::touch_routine(&txn, routine_id).await?;
        let query = LinkEntity::find().filter(routine_exercise::Column::Id.eq(model.id));
        let detail = links::load_details(&txn, query)
            .await?
            .pop()
            .ok_or_not_found(link_not_found(model.id))?;

        txn.commit().await?;
        Ok(detail)
    }

    async fn update(&self, link: &RoutineExercise) -> AppResult<RoutineExerciseDetail> {
        let txn = self.db.begin().await?;

        links::write_link(&txn, link).await?;
        links::touch_routine(&txn, link.routine_id).await?;
        let query = LinkEntity::find().filter(routine_exercise::Column::Id.eq(link.id));
        let detail = links::load_details(&txn, query)
            .await?
            .pop()
            .ok_or_not_found(link_not_found(link.id))?;

        txn.commit().await?;
        Ok(detail)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let model = LinkEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("Routine exercise", id))?;
        LinkEntity::delete_by_id(id).exec(&txn).await?;
        links::touch_routine(&txn, model.workout_routine_id).await?;

        txn.commit().await?;
        Ok(())
    }
}
