//! Direct routine-exercise link operations.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use common::{AppError, AppResult};
use domain::error::check_id;
use domain::{LinkChanges, LinkParams, RoutineExerciseDetail};

use crate::repository::{
    duplicate_link, ExerciseRepository, RoutineExerciseRepository, WorkoutRoutineRepository,
};

/// Routine-exercise service trait for dependency injection.
#[async_trait]
pub trait RoutineExerciseService: Send + Sync {
    /// Link an exercise into a routine; both must exist and the pair must be new
    async fn create_link(
        &self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<RoutineExerciseDetail>;

    async fn get_link(&self, id: i64) -> AppResult<RoutineExerciseDetail>;

    async fn list_links(&self) -> AppResult<Vec<RoutineExerciseDetail>>;

    async fn list_links_by_routine(&self, routine_id: i64)
        -> AppResult<Vec<RoutineExerciseDetail>>;

    async fn list_links_by_exercise(
        &self,
        exercise_id: i64,
    ) -> AppResult<Vec<RoutineExerciseDetail>>;

    async fn update_link(&self, id: i64, changes: LinkChanges) -> AppResult<RoutineExerciseDetail>;

    async fn delete_link(&self, id: i64) -> AppResult<()>;

    async fn link_exists(&self, id: i64) -> AppResult<bool>;
}

pub struct RoutineExerciseManager {
    repo: Arc<dyn RoutineExerciseRepository>,
    routines: Arc<dyn WorkoutRoutineRepository>,
    exercises: Arc<dyn ExerciseRepository>,
}

impl RoutineExerciseManager {
    pub fn new(
        repo: Arc<dyn RoutineExerciseRepository>,
        routines: Arc<dyn WorkoutRoutineRepository>,
        exercises: Arc<dyn ExerciseRepository>,
    ) -> Self {
        Self {
            repo,
            routines,
            exercises,
        }
    }
}

#[async_trait]
impl RoutineExerciseService for RoutineExerciseManager {
    async fn create_link(
        &self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<RoutineExerciseDetail> {
        check_id(routine_id, "Workout routine")?;
        check_id(exercise_id, "Exercise")?;
        params.validate()?;

        if !self.routines.exists(routine_id).await? {
            return Err(AppError::not_found("Workout routine", routine_id));
        }
        if !self.exercises.exists(exercise_id).await? {
            return Err(AppError::not_found("Exercise", exercise_id));
        }
        if self
            .repo
            .exists_by_routine_and_exercise(routine_id, exercise_id)
            .await?
        {
            warn!(routine_id, exercise_id, "Exercise already linked to routine");
            return Err(duplicate_link(routine_id, exercise_id));
        }

        let detail = self.repo.create(routine_id, exercise_id, params).await?;
        info!(link_id = detail.link.id, routine_id, exercise_id, "Routine exercise created");
        Ok(detail)
    }

    async fn get_link(&self, id: i64) -> AppResult<RoutineExerciseDetail> {
        check_id(id, "Routine exercise")?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Routine exercise", id))
    }

    async fn list_links(&self) -> AppResult<Vec<RoutineExerciseDetail>> {
        self.repo.list().await
    }

    async fn list_links_by_routine(
        &self,
        routine_id: i64,
    ) -> AppResult<Vec<RoutineExerciseDetail>> {
        check_id(routine_id, "Workout routine")?;
        self.repo.list_by_routine(routine_id).await
    }

    async fn list_links_by_exercise(
        &self,
        exercise_id: i64,
    ) -> AppResult<Vec<RoutineExerciseDetail>> {
        check_id(exercise_id, "Exercise")?;
        self.repo.list_by_exercise(exercise_id).await
    }

    async fn update_link(&self, id: i64, changes: LinkChanges) -> AppResult<RoutineExerciseDetail> {
        check_id(id, "Routine exercise")?;
        changes.validate()?;

        let mut link = self.get_link(id).await?.link;
        link.apply(changes);

        let detail = self.repo.update(&link).await?;
        info!(link_id = id, "Routine exercise updated");
        Ok(detail)
    }

    async fn delete_link(&self, id: i64) -> AppResult<()> {
        check_id(id, "Routine exercise")?;
        self.repo.delete(id).await?;
        info!(link_id = id, "Routine exercise deleted");
        Ok(())
    }

    async fn link_exists(&self, id: i64) -> AppResult<bool> {
        if id <= 0 {
            return Ok(false);
        }
        self.repo.exists(id).await
    }
}
