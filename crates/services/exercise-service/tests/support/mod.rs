//! In-memory repositories shared by the integration tests.
//!
//! One `InMemoryStore` implements all three repository traits over a single
//! state, so cross-entity rules (links referencing exercises, cascading
//! routine deletes) behave like the database does.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use common::{AppError, AppResult};
use domain::{
    Exercise, LinkParams, NewExercise, NewWorkoutRoutine, RoutineExercise, RoutineExerciseDetail,
    WorkoutRoutine,
};
use exercise_service_lib::infra::Database;
use exercise_service_lib::repository::{
    ExerciseFilter, ExerciseRepository, RoutineExerciseRepository, WorkoutRoutineRepository,
};
use exercise_service_lib::service::{
    ExerciseManager, ExerciseService, RoutineExerciseManager, RoutineExerciseService,
    WorkoutRoutineManager, WorkoutRoutineService,
};
use exercise_service_lib::state::AppState;

#[derive(Debug, Clone)]
struct LinkRow {
    id: i64,
    routine_id: i64,
    exercise_id: i64,
    sets: i32,
    reps: i32,
    rest_time: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    last_id: i64,
    exercises: BTreeMap<i64, Exercise>,
    /// Routines are stored without their links
    routines: BTreeMap<i64, WorkoutRoutine>,
    links: BTreeMap<i64, LinkRow>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn to_link(&self, row: &LinkRow) -> AppResult<RoutineExercise> {
        let exercise = self
            .exercises
            .get(&row.exercise_id)
            .cloned()
            .ok_or_else(|| AppError::internal("dangling link"))?;
        Ok(RoutineExercise {
            id: row.id,
            routine_id: row.routine_id,
            exercise,
            sets: row.sets,
            reps: row.reps,
            rest_time: row.rest_time,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_detail(&self, row: &LinkRow) -> AppResult<RoutineExerciseDetail> {
        let routine = self
            .routines
            .get(&row.routine_id)
            .ok_or_else(|| AppError::internal("dangling link"))?;
        Ok(RoutineExerciseDetail {
            link: self.to_link(row)?,
            routine: routine.summary(),
        })
    }

    fn assemble(&self, id: i64) -> AppResult<Option<WorkoutRoutine>> {
        let Some(routine) = self.routines.get(&id) else {
            return Ok(None);
        };
        let mut routine = routine.clone();
        routine.exercises = self
            .links
            .values()
            .filter(|l| l.routine_id == id)
            .map(|l| self.to_link(l))
            .collect::<AppResult<_>>()?;
        Ok(Some(routine))
    }

    fn assemble_where(
        &self,
        keep: impl Fn(&WorkoutRoutine) -> bool,
    ) -> AppResult<Vec<WorkoutRoutine>> {
        let ids: Vec<i64> = self
            .routines
            .values()
            .filter(|r| keep(r))
            .map(|r| r.id)
            .collect();
        let mut routines = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(routine) = self.assemble(id)? {
                routines.push(routine);
            }
        }
        Ok(routines)
    }

    fn touch(&mut self, routine_id: i64) {
        if let Some(routine) = self.routines.get_mut(&routine_id) {
            routine.updated_at = Utc::now();
        }
    }

    fn insert_link(
        &mut self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<i64> {
        if self
            .links
            .values()
            .any(|l| l.routine_id == routine_id && l.exercise_id == exercise_id)
        {
            return Err(AppError::DuplicateExercise(format!(
                "Exercise {} is already in workout routine {}",
                exercise_id, routine_id
            )));
        }
        if !self.routines.contains_key(&routine_id) {
            return Err(AppError::not_found("Workout routine", routine_id));
        }
        if !self.exercises.contains_key(&exercise_id) {
            return Err(AppError::not_found("Exercise", exercise_id));
        }

        let id = self.next_id();
        let now = Utc::now();
        self.links.insert(
            id,
            LinkRow {
                id,
                routine_id,
                exercise_id,
                sets: params.sets,
                reps: params.reps,
                rest_time: params.rest_time,
                created_at: now,
                updated_at: now,
            },
        );
        self.touch(routine_id);
        Ok(id)
    }

    fn write_link(&mut self, link: &RoutineExercise) -> AppResult<()> {
        let row = self
            .links
            .get_mut(&link.id)
            .ok_or_else(|| AppError::not_found("Routine exercise", link.id))?;
        row.sets = link.sets;
        row.reps = link.reps;
        row.rest_time = link.rest_time;
        row.updated_at = link.updated_at;
        self.touch(link.routine_id);
        Ok(())
    }
}

/// Fake persistence backing every repository trait.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// Move a routine's `updated_at` into the past so later writes are
    /// observable.
    pub fn backdate_routine(&self, routine_id: i64) {
        let past = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        if let Some(routine) = self.tables().routines.get_mut(&routine_id) {
            routine.updated_at = past;
        }
    }

    pub fn link_count(&self) -> usize {
        self.tables().links.len()
    }
}

#[async_trait]
impl ExerciseRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Exercise>> {
        Ok(self.tables().exercises.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Exercise>> {
        Ok(self
            .tables()
            .exercises
            .values()
            .find(|e| e.name == name)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Exercise>> {
        Ok(self.tables().exercises.values().cloned().collect())
    }

    async fn filter(&self, filter: ExerciseFilter, value: &str) -> AppResult<Vec<Exercise>> {
        let matches = |e: &Exercise| match filter {
            ExerciseFilter::Muscle => e.muscle == value,
            ExerciseFilter::Type => e.exercise_type == value,
            ExerciseFilter::Difficulty => e.difficulty.as_deref() == Some(value),
            ExerciseFilter::Equipment => e.equipment.as_deref() == Some(value),
        };
        Ok(self
            .tables()
            .exercises
            .values()
            .filter(|e| matches(e))
            .cloned()
            .collect())
    }

    async fn search_by_name(&self, fragment: &str) -> AppResult<Vec<Exercise>> {
        let needle = fragment.to_lowercase();
        let mut found: Vec<Exercise> = self
            .tables()
            .exercises
            .values()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables().exercises.contains_key(&id))
    }

    async fn create(&self, exercise: NewExercise) -> AppResult<Exercise> {
        let mut tables = self.tables();
        if tables.exercises.values().any(|e| e.name == exercise.name) {
            return Err(AppError::DuplicateName(format!(
                "Exercise with name '{}' already exists",
                exercise.name
            )));
        }
        let id = tables.next_id();
        let now = Utc::now();
        let created = Exercise {
            id,
            name: exercise.name,
            exercise_type: exercise.exercise_type,
            muscle: exercise.muscle,
            equipment: exercise.equipment,
            difficulty: exercise.difficulty,
            instructions: exercise.instructions,
            created_at: now,
            updated_at: now,
        };
        tables.exercises.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, exercise: &Exercise) -> AppResult<Exercise> {
        let mut tables = self.tables();
        let stored = tables
            .exercises
            .get_mut(&exercise.id)
            .ok_or_else(|| AppError::not_found("Exercise", exercise.id))?;
        *stored = exercise.clone();
        Ok(exercise.clone())
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables();
        if tables.links.values().any(|l| l.exercise_id == id) {
            return Err(AppError::InUse(format!(
                "Exercise with ID {} is used in one or more workout routines",
                id
            )));
        }
        tables
            .exercises
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Exercise", id))
    }

    async fn count_links(&self, id: i64) -> AppResult<u64> {
        Ok(self
            .tables()
            .links
            .values()
            .filter(|l| l.exercise_id == id)
            .count() as u64)
    }
}

#[async_trait]
impl WorkoutRoutineRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<WorkoutRoutine>> {
        self.tables().assemble(id)
    }

    async fn find_by_id_and_username(
        &self,
        id: i64,
        username: &str,
    ) -> AppResult<Option<WorkoutRoutine>> {
        Ok(self
            .tables()
            .assemble(id)?
            .filter(|r| r.is_owned_by(username)))
    }

    async fn name_taken(
        &self,
        name: &str,
        username: &str,
        exclude_id: Option<i64>,
    ) -> AppResult<bool> {
        Ok(self.tables().routines.values().any(|r| {
            r.name == name && r.username == username && Some(r.id) != exclude_id
        }))
    }

    async fn list(&self) -> AppResult<Vec<WorkoutRoutine>> {
        self.tables().assemble_where(|_| true)
    }

    async fn list_by_username(&self, username: &str) -> AppResult<Vec<WorkoutRoutine>> {
        self.tables().assemble_where(|r| r.username == username)
    }

    async fn search_by_name(
        &self,
        fragment: &str,
        username: Option<String>,
    ) -> AppResult<Vec<WorkoutRoutine>> {
        let needle = fragment.to_lowercase();
        let mut found = self.tables().assemble_where(|r| {
            r.name.to_lowercase().contains(&needle)
                && username.as_deref().map_or(true, |u| r.username == u)
        })?;
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn list_by_exercise(&self, exercise_id: i64) -> AppResult<Vec<WorkoutRoutine>> {
        let tables = self.tables();
        let linked: Vec<i64> = tables
            .links
            .values()
            .filter(|l| l.exercise_id == exercise_id)
            .map(|l| l.routine_id)
            .collect();
        tables.assemble_where(|r| linked.contains(&r.id))
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables().routines.contains_key(&id))
    }

    async fn create(&self, routine: NewWorkoutRoutine) -> AppResult<WorkoutRoutine> {
        let mut tables = self.tables();
        let id = tables.next_id();
        let now = Utc::now();
        let created = WorkoutRoutine {
            id,
            name: routine.name,
            description: routine.description,
            duration: routine.duration,
            username: routine.username,
            exercises: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        tables.routines.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, routine: &WorkoutRoutine) -> AppResult<WorkoutRoutine> {
        let mut tables = self.tables();
        let stored = tables
            .routines
            .get_mut(&routine.id)
            .ok_or_else(|| AppError::not_found("Workout routine", routine.id))?;
        stored.name = routine.name.clone();
        stored.description = routine.description.clone();
        stored.duration = routine.duration.clone();
        stored.updated_at = routine.updated_at;
        tables
            .assemble(routine.id)?
            .ok_or_else(|| AppError::not_found("Workout routine", routine.id))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables();
        if tables.routines.remove(&id).is_none() {
            return Err(AppError::not_found("Workout routine", id));
        }
        tables.links.retain(|_, l| l.routine_id != id);
        Ok(())
    }

    async fn add_link(
        &self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<WorkoutRoutine> {
        let mut tables = self.tables();
        tables.insert_link(routine_id, exercise_id, params)?;
        tables
            .assemble(routine_id)?
            .ok_or_else(|| AppError::not_found("Workout routine", routine_id))
    }

    async fn remove_link(&self, routine_id: i64, link_id: i64) -> AppResult<WorkoutRoutine> {
        let mut tables = self.tables();
        let owned = tables
            .links
            .get(&link_id)
            .is_some_and(|l| l.routine_id == routine_id);
        if !owned {
            return Err(AppError::not_found("Routine exercise", link_id));
        }
        tables.links.remove(&link_id);
        tables.touch(routine_id);
        tables
            .assemble(routine_id)?
            .ok_or_else(|| AppError::not_found("Workout routine", routine_id))
    }

    async fn update_link(&self, link: &RoutineExercise) -> AppResult<WorkoutRoutine> {
        let mut tables = self.tables();
        tables.write_link(link)?;
        tables
            .assemble(link.routine_id)?
            .ok_or_else(|| AppError::not_found("Workout routine", link.routine_id))
    }
}

#[async_trait]
impl RoutineExerciseRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<RoutineExerciseDetail>> {
        let tables = self.tables();
        tables
            .links
            .get(&id)
            .map(|row| tables.to_detail(row))
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<RoutineExerciseDetail>> {
        let tables = self.tables();
        tables.links.values().map(|row| tables.to_detail(row)).collect()
    }

    async fn list_by_routine(&self, routine_id: i64) -> AppResult<Vec<RoutineExerciseDetail>> {
        let tables = self.tables();
        tables
            .links
            .values()
            .filter(|row| row.routine_id == routine_id)
            .map(|row| tables.to_detail(row))
            .collect()
    }

    async fn list_by_exercise(&self, exercise_id: i64) -> AppResult<Vec<RoutineExerciseDetail>> {
        let tables = self.tables();
        tables
            .links
            .values()
            .filter(|row| row.exercise_id == exercise_id)
            .map(|row| tables.to_detail(row))
            .collect()
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables().links.contains_key(&id))
    }

    async fn exists_by_routine_and_exercise(
        &self,
        routine_id: i64,
        exercise_id: i64,
    ) -> AppResult<bool> {
        Ok(self
            .tables()
            .links
            .values()
            .any(|l| l.routine_id == routine_id && l.exercise_id == exercise_id))
    }

    async fn create(
        &self,
        routine_id: i64,
        exercise_id: i64,
        params: LinkParams,
    ) -> AppResult<RoutineExerciseDetail> {
        let mut tables = self.tables();
        let id = tables.insert_link(routine_id, exercise_id, params)?;
        let row = tables.links[&id].clone();
        tables.to_detail(&row)
    }

    async fn update(&self, link: &RoutineExercise) -> AppResult<RoutineExerciseDetail> {
        let mut tables = self.tables();
        tables.write_link(link)?;
        let row = tables.links[&link.id].clone();
        tables.to_detail(&row)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tables = self.tables();
        let row = tables
            .links
            .remove(&id)
            .ok_or_else(|| AppError::not_found("Routine exercise", id))?;
        tables.touch(row.routine_id);
        Ok(())
    }
}

/// Managers wired over one shared in-memory store.
pub struct Services {
    pub store: InMemoryStore,
    pub exercises: Arc<dyn ExerciseService>,
    pub routines: Arc<dyn WorkoutRoutineService>,
    pub links: Arc<dyn RoutineExerciseService>,
}

impl Services {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let shared = Arc::new(store.clone());

        Self {
            exercises: Arc::new(ExerciseManager::new(shared.clone())),
            routines: Arc::new(WorkoutRoutineManager::new(shared.clone(), shared.clone())),
            links: Arc::new(RoutineExerciseManager::new(
                shared.clone(),
                shared.clone(),
                shared,
            )),
            store,
        }
    }

    /// Router state with a database that is never connected.
    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.exercises.clone(),
            self.routines.clone(),
            self.links.clone(),
            Database::from(sea_orm::DatabaseConnection::Disconnected),
        )
    }
}

pub fn bench_press() -> NewExercise {
    NewExercise {
        name: "Bench Press".to_string(),
        exercise_type: "strength".to_string(),
        muscle: "chest".to_string(),
        equipment: Some("barbell".to_string()),
        difficulty: Some("intermediate".to_string()),
        instructions: Some("Lower the bar to the chest, press up.".to_string()),
    }
}

pub fn squat() -> NewExercise {
    NewExercise {
        name: "Squat".to_string(),
        exercise_type: "strength".to_string(),
        muscle: "legs".to_string(),
        equipment: Some("barbell".to_string()),
        difficulty: Some("intermediate".to_string()),
        instructions: None,
    }
}

pub fn push_day(username: &str) -> NewWorkoutRoutine {
    NewWorkoutRoutine {
        name: "Push Day".to_string(),
        description: Some("Chest, shoulders and triceps".to_string()),
        duration: Some("45 min".to_string()),
        username: username.to_string(),
    }
}

pub fn params(sets: i32, reps: i32, rest_time: Option<i32>) -> LinkParams {
    LinkParams {
        sets,
        reps,
        rest_time,
    }
}
