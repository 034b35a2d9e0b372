//! Workout routine service.
//!
//! Owns the routine aggregate rules: a routine name is unique per owner, the
//! owner never changes, and a routine links any exercise at most once.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use common::{AppError, AppResult};
use domain::error::{check_id, require_text};
use domain::{
    LinkChanges, LinkParams, NewWorkoutRoutine, RoutineChanges, WorkoutRoutine,
};

use crate::repository::{
    duplicate_link, duplicate_routine_name, ExerciseRepository, WorkoutRoutineRepository,
};

/// Workout routine service trait for dependency injection.
#[async_trait]
pub trait WorkoutRoutineService: Send + Sync {
    async fn create_routine(&self, routine: NewWorkoutRoutine) -> AppResult<WorkoutRoutine>;

    async fn get_routine(&self, id: i64) -> AppResult<WorkoutRoutine>;

    async fn list_routines(&self) -> AppResult<Vec<WorkoutRoutine>>;

    async fn list_routines_by_username(&self, username: &str) -> AppResult<Vec<WorkoutRoutine>>;

    /// Name search, optionally scoped to one owner
    async fn search_routines(
        &self,
        fragment: &str,
        username: Option<String>,
    ) -> AppResult<Vec<WorkoutRoutine>>;

    /// Routine `id`, only when `username` owns it
    async fn get_routine_for_user(&self, id: i64, username: &str) -> AppResult<WorkoutRoutine>;

    async fn list_routines_by_exercise(&self, exercise_id: i64) -> AppResult<Vec<WorkoutRoutine>>;

    async fn update_routine(&self, id: i64, changes: RoutineChanges) -> AppResult<WorkoutRoutine>;

    async fn delete_routine(&self, id: i64) -> AppResult<()>;

    /// Delete routine `id` only when `username` owns it
    async fn delete_routine_for_user(&self, id: i64, username: &str) -> AppResult<()>;

    async fn routine_exists(&self, id: i64) -> AppResult<bool>;

    /// False for malformed input or a missing routine
    async fn is_owner(&self, id: i64, username: &str) -> AppResult<bool>;

    async fn add_exercise(
        &self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<WorkoutRoutine>;

    async fn remove_exercise(&self, routine_id: i64, exercise_id: i64)
        -> AppResult<WorkoutRoutine>;

    async fn update_exercise_in_routine(
        &self,
        routine_id: i64,
        exercise_id: i64,
        changes: LinkChanges,
    ) -> AppResult<WorkoutRoutine>;
}

/// Concrete implementation of WorkoutRoutineService
pub struct WorkoutRoutineManager {
    repo: Arc<dyn WorkoutRoutineRepository>,
    exercises: Arc<dyn ExerciseRepository>,
}

impl WorkoutRoutineManager {
    pub fn new(
        repo: Arc<dyn WorkoutRoutineRepository>,
        exercises: Arc<dyn ExerciseRepository>,
    ) -> Self {
        Self { repo, exercises }
    }

    async fn require_exercise(&self, exercise_id: i64) -> AppResult<()> {
        if !self.exercises.exists(exercise_id).await? {
            return Err(AppError::not_found("Exercise", exercise_id));
        }
        Ok(())
    }
}

fn link_missing(routine_id: i64, exercise_id: i64) -> AppError {
    AppError::NotFound(format!(
        "Exercise with ID {} not found in workout routine {}",
        exercise_id, routine_id
    ))
}

#[async_trait]
impl WorkoutRoutineService for WorkoutRoutineManager {
    async fn create_routine(&self, routine: NewWorkoutRoutine) -> AppResult<WorkoutRoutine> {
        routine.validate()?;

        if self
            .repo
            .name_taken(&routine.name, &routine.username, None)
            .await?
        {
            warn!(name = %routine.name, username = %routine.username, "Rejected duplicate routine name");
            return Err(duplicate_routine_name(&routine.name, &routine.username));
        }

        let created = self.repo.create(routine).await?;
        info!(routine_id = created.id, username = %created.username, "Workout routine created");
        Ok(created)
    }

    async fn get_routine(&self, id: i64) -> AppResult<WorkoutRoutine> {
        check_id(id, "Workout routine")?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Workout routine", id))
    }

    async fn list_routines(&self) -> AppResult<Vec<WorkoutRoutine>> {
        self.repo.list().await
    }

    async fn list_routines_by_username(&self, username: &str) -> AppResult<Vec<WorkoutRoutine>> {
        require_text(username, "Username")?;
        self.repo.list_by_username(username).await
    }

    async fn search_routines(
        &self,
        fragment: &str,
        username: Option<String>,
    ) -> AppResult<Vec<WorkoutRoutine>> {
        require_text(fragment, "Search term")?;
        if let Some(username) = username.as_deref() {
            require_text(username, "Username")?;
        }
        self.repo.search_by_name(fragment, username).await
    }

    async fn get_routine_for_user(&self, id: i64, username: &str) -> AppResult<WorkoutRoutine> {
        check_id(id, "Workout routine")?;
        require_text(username, "Username")?;
        self.repo
            .find_by_id_and_username(id, username)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Workout routine not found with ID: {} for user: {}",
                    id, username
                ))
            })
    }

    async fn list_routines_by_exercise(&self, exercise_id: i64) -> AppResult<Vec<WorkoutRoutine>> {
        check_id(exercise_id, "Exercise")?;
        self.repo.list_by_exercise(exercise_id).await
    }

    async fn update_routine(&self, id: i64, changes: RoutineChanges) -> AppResult<WorkoutRoutine> {
        check_id(id, "Workout routine")?;
        changes.validate()?;

        let mut routine = self.get_routine(id).await?;

        if let Some(name) = changes.name.as_deref().filter(|n| *n != routine.name) {
            if self.repo.name_taken(name, &routine.username, Some(id)).await? {
                warn!(routine_id = id, name, "Rejected rename to an existing routine name");
                return Err(duplicate_routine_name(name, &routine.username));
            }
        }

        routine.apply(changes);
        let updated = self.repo.update(&routine).await?;
        info!(routine_id = id, "Workout routine updated");
        Ok(updated)
    }

    async fn delete_routine(&self, id: i64) -> AppResult<()> {
        check_id(id, "Workout routine")?;
        self.repo.delete(id).await?;
        info!(routine_id = id, "Workout routine deleted");
        Ok(())
    }

    async fn delete_routine_for_user(&self, id: i64, username: &str) -> AppResult<()> {
        let routine = self.get_routine_for_user(id, username).await?;
        self.repo.delete(routine.id).await?;
        info!(routine_id = id, username, "Workout routine deleted by owner");
        Ok(())
    }

    async fn routine_exists(&self, id: i64) -> AppResult<bool> {
        if id <= 0 {
            return Ok(false);
        }
        self.repo.exists(id).await
    }

    async fn is_owner(&self, id: i64, username: &str) -> AppResult<bool> {
        if id <= 0 || username.trim().is_empty() {
            return Ok(false);
        }
        Ok(self
            .repo
            .find_by_id(id)
            .await?
            .is_some_and(|r| r.is_owned_by(username)))
    }

    async fn add_exercise(
        &self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<WorkoutRoutine> {
        check_id(routine_id, "Workout routine")?;
        check_id(exercise_id, "Exercise")?;
        params.validate()?;

        let routine = self.get_routine(routine_id).await?;
        self.require_exercise(exercise_id).await?;

        if routine.contains_exercise(exercise_id) {
            warn!(routine_id, exercise_id, "Exercise already linked to routine");
            return Err(duplicate_link(routine_id, exercise_id));
        }

        let updated = self.repo.add_link(routine_id, exercise_id, params).await?;
        info!(routine_id, exercise_id, "Exercise added to routine");
        Ok(updated)
    }

    async fn remove_exercise(
        &self,
        routine_id: i64,
        exercise_id: i64,
    ) -> AppResult<WorkoutRoutine> {
        check_id(routine_id, "Workout routine")?;
        check_id(exercise_id, "Exercise")?;

        let routine = self.get_routine(routine_id).await?;
        let link_id = routine
            .find_link(exercise_id)
            .map(|link| link.id)
            .ok_or_else(|| link_missing(routine_id, exercise_id))?;

        let updated = self.repo.remove_link(routine_id, link_id).await?;
        info!(routine_id, exercise_id, "Exercise removed from routine");
        Ok(updated)
    }

    async fn update_exercise_in_routine(
        &self,
        routine_id: i64,
        exercise_id: i64,
        changes: LinkChanges,
    ) -> AppResult<WorkoutRoutine> {
        check_id(routine_id, "Workout routine")?;
        check_id(exercise_id, "Exercise")?;
        changes.validate()?;

        let routine = self.get_routine(routine_id).await?;
        let mut link = routine
            .find_link(exercise_id)
            .cloned()
            .ok_or_else(|| link_missing(routine_id, exercise_id))?;

        link.apply(changes);
        let updated = self.repo.update_link(&link).await?;
        info!(routine_id, exercise_id, "Routine exercise parameters updated");
        Ok(updated)
    }
}
