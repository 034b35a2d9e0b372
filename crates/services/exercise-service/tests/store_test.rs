//! SeaORM store behaviour against an in-memory SQLite database.
//!
//! Each test runs the real migrations, so unique indexes and foreign keys
//! are the ones the service relies on in production.

mod support;

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection};

use common::AppError;
use exercise_service_lib::infra::Database;
use exercise_service_lib::repository::{
    ExerciseRepository, ExerciseStore, RoutineExerciseRepository, RoutineExerciseStore,
    WorkoutRoutineRepository, WorkoutRoutineStore,
};
use exercise_service_lib::service::{ExerciseManager, ExerciseService};

use support::{bench_press, params, push_day, squat};

// =============================================================================
// Test Helpers
// =============================================================================

async fn migrated_db() -> DatabaseConnection {
    // One connection, so every query sees the same in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::from(SeaDatabase::connect(options).await.unwrap());
    db.run_migrations().await.unwrap();
    db.get_connection()
}

struct Stores {
    exercises: ExerciseStore,
    routines: WorkoutRoutineStore,
    links: RoutineExerciseStore,
}

async fn stores() -> (DatabaseConnection, Stores) {
    let db = migrated_db().await;
    let stores = Stores {
        exercises: ExerciseStore::new(db.clone()),
        routines: WorkoutRoutineStore::new(db.clone()),
        links: RoutineExerciseStore::new(db.clone()),
    };
    (db, stores)
}

// =============================================================================
// Unique indexes
// =============================================================================

#[tokio::test]
async fn test_exercise_name_index_maps_to_duplicate_name() {
    let (_, stores) = stores().await;
    stores.exercises.create(bench_press()).await.unwrap();

    let err = stores.exercises.create(bench_press()).await.unwrap_err();

    assert!(matches!(err, AppError::DuplicateName(ref m) if m.contains("Bench Press")));
    assert_eq!(stores.exercises.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_routine_name_is_unique_per_owner() {
    let (_, stores) = stores().await;
    stores.routines.create(push_day("alice")).await.unwrap();

    let err = stores.routines.create(push_day("alice")).await.unwrap_err();
    assert!(matches!(err, AppError::DuplicateName(_)));

    // Another owner may reuse the name
    stores.routines.create(push_day("bob")).await.unwrap();
    assert_eq!(stores.routines.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_second_link_for_same_exercise_hits_index() {
    let (_, stores) = stores().await;
    let bench = stores.exercises.create(bench_press()).await.unwrap();
    let routine = stores.routines.create(push_day("alice")).await.unwrap();

    stores
        .routines
        .add_link(routine.id, bench.id, params(3, 10, Some(90)))
        .await
        .unwrap();
    let err = stores
        .routines
        .add_link(routine.id, bench.id, params(5, 5, None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::DuplicateExercise(_)));

    // The failed insert rolled back with its transaction
    let loaded = stores.routines.find_by_id(routine.id).await.unwrap().unwrap();
    assert_eq!(loaded.exercises.len(), 1);
    assert_eq!(loaded.exercises[0].sets, 3);
}

// =============================================================================
// Aggregate writes
// =============================================================================

#[tokio::test]
async fn test_add_link_loads_exercise_and_touches_routine() {
    let (_, stores) = stores().await;
    let bench = stores.exercises.create(bench_press()).await.unwrap();
    let routine = stores.routines.create(push_day("alice")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    let updated = stores
        .routines
        .add_link(routine.id, bench.id, params(4, 8, None))
        .await
        .unwrap();

    assert_eq!(updated.exercises.len(), 1);
    assert_eq!(updated.exercises[0].exercise.name, "Bench Press");
    assert!(updated.updated_at > routine.updated_at);
}

#[tokio::test]
async fn test_remove_link_keeps_exercise_in_catalog() {
    let (_, stores) = stores().await;
    let bench = stores.exercises.create(bench_press()).await.unwrap();
    let routine = stores.routines.create(push_day("alice")).await.unwrap();
    let linked = stores
        .routines
        .add_link(routine.id, bench.id, params(3, 10, None))
        .await
        .unwrap();

    let updated = stores
        .routines
        .remove_link(routine.id, linked.exercises[0].id)
        .await
        .unwrap();

    assert!(updated.exercises.is_empty());
    assert!(stores.exercises.exists(bench.id).await.unwrap());
}

#[tokio::test]
async fn test_routine_delete_cascades_to_links() {
    let (_, stores) = stores().await;
    let bench = stores.exercises.create(bench_press()).await.unwrap();
    let back_squat = stores.exercises.create(squat()).await.unwrap();
    let routine = stores.routines.create(push_day("alice")).await.unwrap();
    for exercise_id in [bench.id, back_squat.id] {
        stores
            .routines
            .add_link(routine.id, exercise_id, params(3, 10, None))
            .await
            .unwrap();
    }

    stores.routines.delete(routine.id).await.unwrap();

    assert!(!stores.routines.exists(routine.id).await.unwrap());
    assert!(stores.links.list().await.unwrap().is_empty());
    assert_eq!(stores.exercises.list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_missing_routine_is_not_found() {
    let (_, stores) = stores().await;

    let err = stores.routines.delete(404).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));
}

// =============================================================================
// Direct links and catalog protection
// =============================================================================

#[tokio::test]
async fn test_direct_link_reads_back_with_routine_summary() {
    let (_, stores) = stores().await;
    let bench = stores.exercises.create(bench_press()).await.unwrap();
    let routine = stores.routines.create(push_day("alice")).await.unwrap();

    let detail = stores
        .links
        .create(routine.id, bench.id, params(3, 12, Some(60)))
        .await
        .unwrap();

    let by_exercise = stores.links.list_by_exercise(bench.id).await.unwrap();
    assert_eq!(by_exercise.len(), 1);
    assert_eq!(by_exercise[0].link.id, detail.link.id);
    assert_eq!(by_exercise[0].routine.name, "Push Day");
    assert!(stores
        .links
        .exists_by_routine_and_exercise(routine.id, bench.id)
        .await
        .unwrap());

    let used_by = stores.routines.list_by_exercise(bench.id).await.unwrap();
    assert_eq!(used_by.len(), 1);
    assert_eq!(used_by[0].id, routine.id);
}

#[tokio::test]
async fn test_linked_exercise_is_in_use_until_unlinked() {
    let (db, stores) = stores().await;
    let exercises = ExerciseManager::new(Arc::new(ExerciseStore::new(db)));
    let bench = stores.exercises.create(bench_press()).await.unwrap();
    let routine = stores.routines.create(push_day("alice")).await.unwrap();
    let detail = stores
        .links
        .create(routine.id, bench.id, params(3, 10, None))
        .await
        .unwrap();

    let err = exercises.delete_exercise(bench.id).await.unwrap_err();
    assert!(matches!(err, AppError::InUse(_)));
    assert_eq!(stores.exercises.count_links(bench.id).await.unwrap(), 1);

    stores.links.delete(detail.link.id).await.unwrap();
    exercises.delete_exercise(bench.id).await.unwrap();
    assert!(!stores.exercises.exists(bench.id).await.unwrap());
}
