//! Workout routine repository.
//!
//! Reads return the whole aggregate (routine, links and linked exercises).
//! Writes that touch more than one row run inside a single transaction.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::entities::routine_exercise;
use super::entities::workout_routine::{self, ActiveModel, Entity as RoutineEntity};
use super::links::{self, lower_contains};
use common::{AppError, AppResult, OptionExt};
use domain::{LinkParams, NewWorkoutRoutine, RoutineExercise, WorkoutRoutine};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

pub(crate) fn duplicate_name(name: &str, username: &str) -> AppError {
    AppError::DuplicateName(format!(
        "Workout routine '{}' already exists for user '{}'",
        name, username
    ))
}

fn routine_not_found(id: i64) -> String {
    format!("Workout routine not found with ID: {}", id)
}

/// Workout routine repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait WorkoutRoutineRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<WorkoutRoutine>>;

    /// Routine `id` only if `username` owns it
    async fn find_by_id_and_username(
        &self,
        id: i64,
        username: &str,
    ) -> AppResult<Option<WorkoutRoutine>>;

    /// Whether `username` already has a routine called `name`, ignoring
    /// routine `exclude_id`
    async fn name_taken(
        &self,
        name: &str,
        username: &str,
        exclude_id: Option<i64>,
    ) -> AppResult<bool>;

    async fn list(&self) -> AppResult<Vec<WorkoutRoutine>>;

    async fn list_by_username(&self, username: &str) -> AppResult<Vec<WorkoutRoutine>>;

    /// Case-insensitive substring match on the name, optionally scoped to one
    /// owner
    async fn search_by_name(
        &self,
        fragment: &str,
        username: Option<String>,
    ) -> AppResult<Vec<WorkoutRoutine>>;

    /// Routines that link `exercise_id`
    async fn list_by_exercise(&self, exercise_id: i64) -> AppResult<Vec<WorkoutRoutine>>;

    async fn exists(&self, id: i64) -> AppResult<bool>;

    async fn create(&self, routine: NewWorkoutRoutine) -> AppResult<WorkoutRoutine>;

    /// Persist name, description, duration and `updated_at`
    async fn update(&self, routine: &WorkoutRoutine) -> AppResult<WorkoutRoutine>;

    /// Delete the routine and every link it owns
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Insert a link and refresh the routine's `updated_at`
    async fn add_link(
        &self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<WorkoutRoutine>;

    /// Delete link `link_id` and refresh the routine's `updated_at`
    async fn remove_link(&self, routine_id: i64, link_id: i64) -> AppResult<WorkoutRoutine>;

    /// Persist a changed link and refresh the routine's `updated_at`
    async fn update_link(&self, link: &RoutineExercise) -> AppResult<WorkoutRoutine>;
}

/// SeaORM-backed workout routine repository
pub struct WorkoutRoutineStore {
    db: DatabaseConnection,
}

impl WorkoutRoutineStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load many aggregates in one read-only transaction.
    async fn read_many(
        &self,
        query: sea_orm::Select<RoutineEntity>,
    ) -> AppResult<Vec<WorkoutRoutine>> {
        let txn = self
            .db
            .begin_with_config(None, Some(AccessMode::ReadOnly))
            .await?;
        let models = query.all(&txn).await?;
        let routines = links::assemble(&txn, models).await?;
        txn.commit().await?;
        Ok(routines)
    }
}

#[async_trait]
impl WorkoutRoutineRepository for WorkoutRoutineStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<WorkoutRoutine>> {
        let txn = self
            .db
            .begin_with_config(None, Some(AccessMode::ReadOnly))
            .await?;
        let routine = links::load_routine(&txn, id).await?;
        txn.commit().await?;
        Ok(routine)
    }

    async fn find_by_id_and_username(
        &self,
        id: i64,
        username: &str,
    ) -> AppResult<Option<WorkoutRoutine>> {
        let query = RoutineEntity::find()
            .filter(workout_routine::Column::Id.eq(id))
            .filter(workout_routine::Column::Username.eq(username));
        Ok(self.read_many(query).await?.pop())
    }

    async fn name_taken(
        &self,
        name: &str,
        username: &str,
        exclude_id: Option<i64>,
    ) -> AppResult<bool> {
        let mut query = RoutineEntity::find()
            .filter(workout_routine::Column::Name.eq(name))
            .filter(workout_routine::Column::Username.eq(username));
        if let Some(id) = exclude_id {
            query = query.filter(workout_routine::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    async fn list(&self) -> AppResult<Vec<WorkoutRoutine>> {
        self.read_many(RoutineEntity::find().order_by_asc(workout_routine::Column::Id))
            .await
    }

    async fn list_by_username(&self, username: &str) -> AppResult<Vec<WorkoutRoutine>> {
        let query = RoutineEntity::find()
            .filter(workout_routine::Column::Username.eq(username))
            .order_by_asc(workout_routine::Column::Id);
        self.read_many(query).await
    }

    async fn search_by_name(
        &self,
        fragment: &str,
        username: Option<String>,
    ) -> AppResult<Vec<WorkoutRoutine>> {
        let mut query = RoutineEntity::find()
            .filter(lower_contains(workout_routine::Column::Name, fragment))
            .order_by_asc(workout_routine::Column::Name);
        if let Some(username) = username {
            query = query.filter(workout_routine::Column::Username.eq(username));
        }
        self.read_many(query).await
    }

    async fn list_by_exercise(&self, exercise_id: i64) -> AppResult<Vec<WorkoutRoutine>> {
        let routine_ids: Vec<i64> = routine_exercise::Entity::find()
            .select_only()
            .column(routine_exercise::Column::WorkoutRoutineId)
            .filter(routine_exercise::Column::ExerciseId.eq(exercise_id))
            .into_tuple()
            .all(&self.db)
            .await?;
        if routine_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = RoutineEntity::find()
            .filter(workout_routine::Column::Id.is_in(routine_ids))
            .order_by_asc(workout_routine::Column::Id);
        self.read_many(query).await
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        let count = RoutineEntity::find()
            .filter(workout_routine::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, routine: NewWorkoutRoutine) -> AppResult<WorkoutRoutine> {
        let now = Utc::now();
        let (name, username) = (routine.name.clone(), routine.username.clone());
        let active_model = ActiveModel {
            name: Set(routine.name),
            description: Set(routine.description),
            duration: Set(routine.duration),
            username: Set(routine.username),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| AppError::from_db_unique(e, || duplicate_name(&name, &username)))?;
        Ok(model.into_routine(Vec::new()))
    }

    async fn update(&self, routine: &WorkoutRoutine) -> AppResult<WorkoutRoutine> {
        let txn = self.db.begin().await?;

        let model = RoutineEntity::find_by_id(routine.id)
            .one(&txn)
            .await?
            .ok_or_not_found(routine_not_found(routine.id))?;

        let mut active: ActiveModel = model.into();
        active.name = Set(routine.name.clone());
        active.description = Set(routine.description.clone());
        active.duration = Set(routine.duration.clone());
        active.updated_at = Set(routine.updated_at);
        active.update(&txn).await.map_err(|e| {
            AppError::from_db_unique(e, || duplicate_name(&routine.name, &routine.username))
        })?;

        let updated = links::load_routine(&txn, routine.id)
            .await?
            .ok_or_not_found(routine_not_found(routine.id))?;
        txn.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let removed = routine_exercise::Entity::delete_many()
            .filter(routine_exercise::Column::WorkoutRoutineId.eq(id))
            .exec(&txn)
            .await?;
        let result = RoutineEntity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            // Dropping `txn` rolls back the link deletes
            return Err(AppError::not_found("Workout routine", id));
        }

        txn.commit().await?;
        tracing::debug!(routine_id = id, links = removed.rows_affected, "Routine deleted");
        Ok(())
    }

    async fn add_link(
        &self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<WorkoutRoutine> {
        let txn = self.db.begin().await?;

        links::insert_link(&txn, routine_id, exercise_id, params).await?;
        links::touch_routine(&txn, routine_id).await?;
        let routine = links::load_routine(&txn, routine_id)
            .await?
            .ok_or_not_found(routine_not_found(routine_id))?;

        txn.commit().await?;
        Ok(routine)
    }

    async fn remove_link(&self, routine_id: i64, link_id: i64) -> AppResult<WorkoutRoutine> {
        let txn = self.db.begin().await?;

        let result = routine_exercise::Entity::delete_many()
            .filter(routine_exercise::Column::Id.eq(link_id))
            .filter(routine_exercise::Column::WorkoutRoutineId.eq(routine_id))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found("Routine exercise", link_id));
        }
        links::touch_routine(&txn, routine_id).await?;
        let routine = links::load_routine(&txn, routine_id)
            .await?
            .ok_or_not_found(routine_not_found(routine_id))?;

        txn.commit().await?;
        Ok(routine)
    }

    async fn update_link(&self, link: &RoutineExercise) -> AppResult<WorkoutRoutine> {
        let txn = self.db.begin().await?;

        links::write_link(&txn, link).await?;
        links::touch_routine(&txn, link.routine_id).await?;
        let routine = links::load_routine(&txn, link.routine_id)
            .await?
            .ok_or_not_found(routine_not_found(link.routine_id))?;

        txn.commit().await?;
        Ok(routine)
    }
}
