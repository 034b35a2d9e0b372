//! Workout routine aggregate.
//!
//! A `WorkoutRoutine` exclusively owns its `RoutineExercise` links. Each link
//! references one catalog `Exercise` and carries the per-routine parameters.
//! Two invariants hold for the aggregate:
//!
//! - `(name, username)` is unique across routines
//! - a routine links a given exercise at most once

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_DESCRIPTION_LENGTH, MAX_DURATION_LENGTH, MAX_ROUTINE_NAME_LENGTH};
use crate::error::{check_max_len, require_text, DomainError, DomainResult};
use crate::exercise::{Exercise, ExerciseResponse};

/// Aggregate root, always scoped to one owning user.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRoutine {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub username: String,
    pub exercises: Vec<RoutineExercise>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkoutRoutine {
    pub fn contains_exercise(&self, exercise_id: i64) -> bool {
        self.find_link(exercise_id).is_some()
    }

    /// Link that references `exercise_id`, if any.
    pub fn find_link(&self, exercise_id: i64) -> Option<&RoutineExercise> {
        self.exercises.iter().find(|l| l.exercise.id == exercise_id)
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.username == username
    }

    /// Overwrite name/description/duration. The owner never changes.
    pub fn apply(&mut self, changes: RoutineChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if changes.duration.is_some() {
            self.duration = changes.duration;
        }
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> RoutineSummary {
        RoutineSummary {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            duration: self.duration.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Routine fields without the links collection.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Join record owned by one routine.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineExercise {
    pub id: i64,
    pub routine_id: i64,
    pub exercise: Exercise,
    pub sets: i32,
    pub reps: i32,
    pub rest_time: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RoutineExercise {
    pub fn apply(&mut self, changes: LinkChanges) {
        if let Some(sets) = changes.sets {
            self.sets = sets;
        }
        if let Some(reps) = changes.reps {
            self.reps = reps;
        }
        if changes.rest_time.is_some() {
            self.rest_time = changes.rest_time;
        }
        self.updated_at = Utc::now();
    }
}

/// A link read through the direct surface, with its owner's summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineExerciseDetail {
    pub link: RoutineExercise,
    pub routine: RoutineSummary,
}

fn check_routine_name(name: &str) -> DomainResult<()> {
    require_text(name, "Name")?;
    check_max_len(name, MAX_ROUTINE_NAME_LENGTH, "Name")
}

fn check_details(description: Option<&str>, duration: Option<&str>) -> DomainResult<()> {
    if let Some(description) = description {
        check_max_len(description, MAX_DESCRIPTION_LENGTH, "Description")?;
    }
    if let Some(duration) = duration {
        check_max_len(duration, MAX_DURATION_LENGTH, "Duration")?;
    }
    Ok(())
}

/// Input for routine creation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewWorkoutRoutine {
    pub name: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub username: String,
}

impl NewWorkoutRoutine {
    pub fn validate(&self) -> DomainResult<()> {
        check_routine_name(&self.name)?;
        require_text(&self.username, "Username")?;
        check_details(self.description.as_deref(), self.duration.as_deref())
    }
}

/// Partial routine update. The owning username is immutable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutineChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<String>,
}

impl RoutineChanges {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            check_routine_name(name)?;
        }
        check_details(self.description.as_deref(), self.duration.as_deref())
    }
}

fn check_positive(value: i32, msg: &str) -> DomainResult<()> {
    if value <= 0 {
        return Err(DomainError::validation(msg));
    }
    Ok(())
}

/// Sets, reps and rest time for a new link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkParams {
    pub sets: i32,
    pub reps: i32,
    pub rest_time: Option<i32>,
}

impl LinkParams {
    pub fn validate(&self) -> DomainResult<()> {
        check_positive(self.sets, "Sets must be greater than 0")?;
        check_positive(self.reps, "Reps must be greater than 0")?;
        if let Some(rest) = self.rest_time {
            check_positive(rest, "Rest time must be positive")?;
        }
        Ok(())
    }
}

/// Partial link update; each provided value must be positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkChanges {
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub rest_time: Option<i32>,
}

impl LinkChanges {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(sets) = self.sets {
            check_positive(sets, "Sets must be greater than 0")?;
        }
        if let Some(reps) = self.reps {
            check_positive(reps, "Reps must be greater than 0")?;
        }
        if let Some(rest) = self.rest_time {
            check_positive(rest, "Rest time must be positive")?;
        }
        Ok(())
    }
}

// =============================================================================
// Responses
// =============================================================================

/// Routine without its exercises, embedded in link responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RoutineSummaryResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoutineSummary> for RoutineSummaryResponse {
    fn from(summary: RoutineSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
            description: summary.description,
            duration: summary.duration,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

/// Link response. `workout_routine` is only filled on the direct surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct RoutineExerciseResponse {
    pub id: i64,
    pub exercise: ExerciseResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_routine: Option<RoutineSummaryResponse>,
    pub sets: i32,
    pub reps: i32,
    pub rest_time: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoutineExercise> for RoutineExerciseResponse {
    fn from(link: RoutineExercise) -> Self {
        Self {
            id: link.id,
            exercise: ExerciseResponse::from(link.exercise),
            workout_routine: None,
            sets: link.sets,
            reps: link.reps,
            rest_time: link.rest_time,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

impl From<RoutineExerciseDetail> for RoutineExerciseResponse {
    fn from(detail: RoutineExerciseDetail) -> Self {
        Self {
            workout_routine: Some(RoutineSummaryResponse::from(detail.routine)),
            ..Self::from(detail.link)
        }
    }
}

/// Routine response including its exercise entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRoutineResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub duration: Option<String>,
    pub username: String,
    pub exercises: Vec<RoutineExerciseResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WorkoutRoutine> for WorkoutRoutineResponse {
    fn from(routine: WorkoutRoutine) -> Self {
        Self {
            id: routine.id,
            name: routine.name,
            description: routine.description,
            duration: routine.duration,
            username: routine.username,
            exercises: routine
                .exercises
                .into_iter()
                .map(RoutineExerciseResponse::from)
                .collect(),
            created_at: routine.created_at,
            updated_at: routine.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: i64, name: &str) -> Exercise {
        let now = Utc::now();
        Exercise {
            id,
            name: name.to_string(),
            exercise_type: "strength".to_string(),
            muscle: "chest".to_string(),
            equipment: None,
            difficulty: None,
            instructions: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn push_day() -> WorkoutRoutine {
        let now = Utc::now();
        WorkoutRoutine {
            id: 1,
            name: "Push Day".to_string(),
            description: None,
            duration: Some("45 minutes".to_string()),
            username: "u1".to_string(),
            exercises: vec![RoutineExercise {
                id: 10,
                routine_id: 1,
                exercise: exercise(5, "Bench Press"),
                sets: 3,
                reps: 10,
                rest_time: Some(60),
                created_at: now,
                updated_at: now,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_find_link_by_exercise() {
        let routine = push_day();
        assert!(routine.contains_exercise(5));
        assert!(!routine.contains_exercise(6));
        assert_eq!(routine.find_link(5).map(|l| l.id), Some(10));
    }

    #[test]
    fn test_apply_keeps_owner_and_links() {
        let mut routine = push_day();
        routine.apply(RoutineChanges {
            name: Some("Chest Day".to_string()),
            ..Default::default()
        });

        assert_eq!(routine.name, "Chest Day");
        assert_eq!(routine.username, "u1");
        assert_eq!(routine.duration.as_deref(), Some("45 minutes"));
        assert_eq!(routine.exercises.len(), 1);
    }

    #[test]
    fn test_new_routine_requires_name_and_username() {
        let valid = NewWorkoutRoutine {
            name: "Push Day".to_string(),
            username: "u1".to_string(),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let no_user = NewWorkoutRoutine {
            username: " ".to_string(),
            ..valid.clone()
        };
        assert_eq!(
            no_user.validate(),
            Err(DomainError::validation("Username is required"))
        );

        let long_description = NewWorkoutRoutine {
            description: Some("d".repeat(MAX_DESCRIPTION_LENGTH + 1)),
            ..valid
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_link_params_positivity() {
        let ok = LinkParams {
            sets: 3,
            reps: 10,
            rest_time: None,
        };
        assert!(ok.validate().is_ok());

        assert!(LinkParams { sets: 0, ..ok }.validate().is_err());
        assert!(LinkParams { reps: -1, ..ok }.validate().is_err());
        assert_eq!(
            LinkParams {
                rest_time: Some(0),
                ..ok
            }
            .validate(),
            Err(DomainError::validation("Rest time must be positive"))
        );
    }

    #[test]
    fn test_link_changes_leave_absent_fields() {
        let mut link = push_day().exercises.remove(0);
        let changes = LinkChanges {
            reps: Some(12),
            ..Default::default()
        };
        assert!(changes.validate().is_ok());

        link.apply(changes);
        assert_eq!((link.sets, link.reps, link.rest_time), (3, 12, Some(60)));
    }

    #[test]
    fn test_routine_response_entries_have_no_routine_summary() {
        let response = WorkoutRoutineResponse::from(push_day());
        assert_eq!(response.exercises.len(), 1);
        assert!(response.exercises[0].workout_routine.is_none());
    }
}
