//! Exercise catalog entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_DIFFICULTY_LENGTH, MAX_EQUIPMENT_LENGTH, MAX_EXERCISE_NAME_LENGTH,
    MAX_EXERCISE_TYPE_LENGTH, MAX_INSTRUCTIONS_LENGTH, MAX_MUSCLE_LENGTH,
    MIN_EXERCISE_NAME_LENGTH,
};
use crate::error::{check_max_len, require_text, DomainError, DomainResult};

/// Reusable exercise definition. Routines reference it by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub exercise_type: String,
    pub muscle: String,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Exercise {
    /// Overwrite the fields present in `changes` and refresh `updated_at`.
    pub fn apply(&mut self, changes: ExerciseChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(exercise_type) = changes.exercise_type {
            self.exercise_type = exercise_type;
        }
        if let Some(muscle) = changes.muscle {
            self.muscle = muscle;
        }
        if changes.equipment.is_some() {
            self.equipment = changes.equipment;
        }
        if changes.difficulty.is_some() {
            self.difficulty = changes.difficulty;
        }
        if changes.instructions.is_some() {
            self.instructions = changes.instructions;
        }
        self.updated_at = Utc::now();
    }
}

fn check_name(name: &str) -> DomainResult<()> {
    require_text(name, "Name")?;
    let len = name.chars().count();
    if !(MIN_EXERCISE_NAME_LENGTH..=MAX_EXERCISE_NAME_LENGTH).contains(&len) {
        return Err(DomainError::validation(format!(
            "Name must be between {} and {} characters",
            MIN_EXERCISE_NAME_LENGTH, MAX_EXERCISE_NAME_LENGTH
        )));
    }
    Ok(())
}

fn check_optional(value: Option<&str>, max: usize, field: &str) -> DomainResult<()> {
    match value {
        Some(v) => check_max_len(v, max, field),
        None => Ok(()),
    }
}

/// Input for catalog-create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewExercise {
    pub name: String,
    pub exercise_type: String,
    pub muscle: String,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
    pub instructions: Option<String>,
}

impl NewExercise {
    pub fn validate(&self) -> DomainResult<()> {
        check_name(&self.name)?;
        require_text(&self.exercise_type, "Type")?;
        check_max_len(&self.exercise_type, MAX_EXERCISE_TYPE_LENGTH, "Type")?;
        require_text(&self.muscle, "Muscle")?;
        check_max_len(&self.muscle, MAX_MUSCLE_LENGTH, "Muscle")?;
        check_optional(self.equipment.as_deref(), MAX_EQUIPMENT_LENGTH, "Equipment")?;
        check_optional(self.difficulty.as_deref(), MAX_DIFFICULTY_LENGTH, "Difficulty")?;
        check_optional(
            self.instructions.as_deref(),
            MAX_INSTRUCTIONS_LENGTH,
            "Instructions",
        )
    }
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseChanges {
    pub name: Option<String>,
    pub exercise_type: Option<String>,
    pub muscle: Option<String>,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
    pub instructions: Option<String>,
}

impl ExerciseChanges {
    /// Provided required fields may not be blanked out.
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            check_name(name)?;
        }
        if let Some(exercise_type) = &self.exercise_type {
            require_text(exercise_type, "Type")?;
            check_max_len(exercise_type, MAX_EXERCISE_TYPE_LENGTH, "Type")?;
        }
        if let Some(muscle) = &self.muscle {
            require_text(muscle, "Muscle")?;
            check_max_len(muscle, MAX_MUSCLE_LENGTH, "Muscle")?;
        }
        check_optional(self.equipment.as_deref(), MAX_EQUIPMENT_LENGTH, "Equipment")?;
        check_optional(self.difficulty.as_deref(), MAX_DIFFICULTY_LENGTH, "Difficulty")?;
        check_optional(
            self.instructions.as_deref(),
            MAX_INSTRUCTIONS_LENGTH,
            "Instructions",
        )
    }
}

/// Exercise response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResponse {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub exercise_type: String,
    pub muscle: String,
    pub equipment: Option<String>,
    pub difficulty: Option<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Exercise> for ExerciseResponse {
    fn from(exercise: Exercise) -> Self {
        Self {
            id: exercise.id,
            name: exercise.name,
            exercise_type: exercise.exercise_type,
            muscle: exercise.muscle,
            equipment: exercise.equipment,
            difficulty: exercise.difficulty,
            instructions: exercise.instructions,
            created_at: exercise.created_at,
            updated_at: exercise.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench_press() -> NewExercise {
        NewExercise {
            name: "Bench Press".to_string(),
            exercise_type: "strength".to_string(),
            muscle: "chest".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_exercise_requires_name_type_muscle() {
        assert!(bench_press().validate().is_ok());

        let blank_name = NewExercise {
            name: "  ".to_string(),
            ..bench_press()
        };
        assert_eq!(
            blank_name.validate(),
            Err(DomainError::validation("Name is required"))
        );

        let blank_muscle = NewExercise {
            muscle: String::new(),
            ..bench_press()
        };
        assert!(blank_muscle.validate().is_err());
    }

    #[test]
    fn test_new_exercise_name_length_bounds() {
        let short = NewExercise {
            name: "B".to_string(),
            ..bench_press()
        };
        assert!(short.validate().is_err());

        let long = NewExercise {
            name: "x".repeat(MAX_EXERCISE_NAME_LENGTH + 1),
            ..bench_press()
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_name_length_counts_surrounding_whitespace() {
        // Stored as given, so padding counts toward the limit
        let padded = NewExercise {
            name: format!(" {} ", "x".repeat(MAX_EXERCISE_NAME_LENGTH - 1)),
            ..bench_press()
        };
        assert!(padded.validate().is_err());

        let exact = NewExercise {
            name: format!(" {}", "x".repeat(MAX_EXERCISE_NAME_LENGTH - 1)),
            ..bench_press()
        };
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn test_changes_reject_blanking_required_fields() {
        let changes = ExerciseChanges {
            exercise_type: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
        assert!(ExerciseChanges::default().validate().is_ok());
    }

    #[test]
    fn test_apply_only_overwrites_present_fields() {
        let now = Utc::now();
        let mut exercise = Exercise {
            id: 1,
            name: "Bench Press".to_string(),
            exercise_type: "strength".to_string(),
            muscle: "chest".to_string(),
            equipment: Some("barbell".to_string()),
            difficulty: None,
            instructions: None,
            created_at: now,
            updated_at: now,
        };

        exercise.apply(ExerciseChanges {
            difficulty: Some("intermediate".to_string()),
            ..Default::default()
        });

        assert_eq!(exercise.name, "Bench Press");
        assert_eq!(exercise.equipment.as_deref(), Some("barbell"));
        assert_eq!(exercise.difficulty.as_deref(), Some("intermediate"));
        assert!(exercise.updated_at >= now);
    }

    #[test]
    fn test_response_uses_type_key() {
        let now = Utc::now();
        let response = ExerciseResponse::from(Exercise {
            id: 7,
            name: "Squat".to_string(),
            exercise_type: "strength".to_string(),
            muscle: "legs".to_string(),
            equipment: None,
            difficulty: None,
            instructions: None,
            created_at: now,
            updated_at: now,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "strength");
        assert!(json.get("createdAt").is_some());
    }
}
