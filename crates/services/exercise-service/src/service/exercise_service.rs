//! Exercise catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use common::{AppError, AppResult};
use domain::error::{check_id, require_text};
use domain::{Exercise, ExerciseChanges, NewExercise};

use crate::repository::{
    duplicate_exercise_name, exercise_in_use, ExerciseFilter, ExerciseRepository,
};

/// Exercise service trait for dependency injection.
#[async_trait]
pub trait ExerciseService: Send + Sync {
    /// Create a catalog entry; the name must be unused
    async fn create_exercise(&self, exercise: NewExercise) -> AppResult<Exercise>;

    async fn get_exercise(&self, id: i64) -> AppResult<Exercise>;

    async fn list_exercises(&self) -> AppResult<Vec<Exercise>>;

    /// Exact match on muscle, type, difficulty or equipment
    async fn filter_exercises(
        &self,
        filter: ExerciseFilter,
        value: &str,
    ) -> AppResult<Vec<Exercise>>;

    /// Case-insensitive name search
    async fn search_exercises(&self, fragment: &str) -> AppResult<Vec<Exercise>>;

    /// Overwrite only the provided fields
    async fn update_exercise(&self, id: i64, changes: ExerciseChanges) -> AppResult<Exercise>;

    /// Fails with `InUse` while any routine links the exercise
    async fn delete_exercise(&self, id: i64) -> AppResult<()>;

    /// Never fails on malformed ids
    async fn exercise_exists(&self, id: i64) -> AppResult<bool>;
}

/// Concrete implementation of ExerciseService using repository.
pub struct ExerciseManager {
    repo: Arc<dyn ExerciseRepository>,
}

impl ExerciseManager {
    pub fn new(repo: Arc<dyn ExerciseRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ExerciseService for ExerciseManager {
    async fn create_exercise(&self, exercise: NewExercise) -> AppResult<Exercise> {
        exercise.validate()?;

        if self.repo.find_by_name(&exercise.name).await?.is_some() {
            warn!(name = %exercise.name, "Rejected duplicate exercise name");
            return Err(duplicate_exercise_name(&exercise.name));
        }

        let created = self.repo.create(exercise).await?;
        info!(exercise_id = created.id, name = %created.name, "Exercise created");
        Ok(created)
    }

    async fn get_exercise(&self, id: i64) -> AppResult<Exercise> {
        check_id(id, "Exercise")?;
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Exercise", id))
    }

    async fn list_exercises(&self) -> AppResult<Vec<Exercise>> {
        self.repo.list().await
    }

    async fn filter_exercises(
        &self,
        filter: ExerciseFilter,
        value: &str,
    ) -> AppResult<Vec<Exercise>> {
        require_text(value, filter.label())?;
        self.repo.filter(filter, value).await
    }

    async fn search_exercises(&self, fragment: &str) -> AppResult<Vec<Exercise>> {
        require_text(fragment, "Search term")?;
        self.repo.search_by_name(fragment).await
    }

    async fn update_exercise(&self, id: i64, changes: ExerciseChanges) -> AppResult<Exercise> {
        check_id(id, "Exercise")?;
        changes.validate()?;

        let mut exercise = self.get_exercise(id).await?;

        if let Some(name) = changes.name.as_deref().filter(|n| *n != exercise.name) {
            if let Some(other) = self.repo.find_by_name(name).await? {
                if other.id != id {
                    warn!(exercise_id = id, name, "Rejected rename to an existing name");
                    return Err(duplicate_exercise_name(name));
                }
            }
        }

        exercise.apply(changes);
        let updated = self.repo.update(&exercise).await?;
        info!(exercise_id = id, "Exercise updated");
        Ok(updated)
    }

    async fn delete_exercise(&self, id: i64) -> AppResult<()> {
        check_id(id, "Exercise")?;

        if !self.repo.exists(id).await? {
            return Err(AppError::not_found("Exercise", id));
        }

        let links = self.repo.count_links(id).await?;
        if links > 0 {
            warn!(exercise_id = id, links, "Refused to delete linked exercise");
            return Err(exercise_in_use(id));
        }

        self.repo.delete(id).await?;
        info!(exercise_id = id, "Exercise deleted");
        Ok(())
    }

    async fn exercise_exists(&self, id: i64) -> AppResult<bool> {
        if id <= 0 {
            return Ok(false);
        }
        self.repo.exists(id).await
    }
}
