//! Queries shared by the routine and routine-exercise stores.
//!
//! Everything here is generic over `ConnectionTrait` so the same code runs on
//! the pool or inside a transaction.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use sea_orm::{
    sea_query::{Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Select,
    Set,
};

use common::{AppError, AppResult, OptionExt};
use domain::{LinkParams, RoutineExercise, RoutineExerciseDetail, RoutineSummary, WorkoutRoutine};

use super::entities::{exercise, routine_exercise, workout_routine};

/// `%fragment%` with LIKE wildcards escaped, lowercased.
pub(crate) fn contains_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for c in fragment.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring match on `column`.
pub(crate) fn lower_contains<C: ColumnTrait>(column: C, fragment: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(contains_pattern(fragment))
}

pub(crate) fn duplicate_link(routine_id: i64, exercise_id: i64) -> AppError {
    AppError::DuplicateExercise(format!(
        "Exercise {} is already in workout routine {}",
        exercise_id, routine_id
    ))
}

fn dangling(link_id: i64, what: &str) -> AppError {
    AppError::internal(format!("Routine exercise {} references a missing {}", link_id, what))
}

/// Links (with their exercises) for each routine id, in insertion order.
async fn load_links<C: ConnectionTrait>(
    conn: &C,
    routine_ids: Vec<i64>,
) -> AppResult<HashMap<i64, Vec<RoutineExercise>>> {
    if routine_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = routine_exercise::Entity::find()
        .filter(routine_exercise::Column::WorkoutRoutineId.is_in(routine_ids))
        .find_also_related(exercise::Entity)
        .order_by_asc(routine_exercise::Column::Id)
        .all(conn)
        .await?;

    let mut grouped: HashMap<i64, Vec<RoutineExercise>> = HashMap::new();
    for (link, exercise) in rows {
        let exercise = exercise.ok_or_else(|| dangling(link.id, "exercise"))?;
        grouped
            .entry(link.workout_routine_id)
            .or_default()
            .push(link.into_link(exercise.into()));
    }
    Ok(grouped)
}

/// Build aggregates for `routines` with one query for all their links.
pub(crate) async fn assemble<C: ConnectionTrait>(
    conn: &C,
    routines: Vec<workout_routine::Model>,
) -> AppResult<Vec<WorkoutRoutine>> {
    let ids = routines.iter().map(|r| r.id).collect();
    let mut links = load_links(conn, ids).await?;

    Ok(routines
        .into_iter()
        .map(|routine| {
            let exercises = links.remove(&routine.id).unwrap_or_default();
            routine.into_routine(exercises)
        })
        .collect())
}

pub(crate) async fn load_routine<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> AppResult<Option<WorkoutRoutine>> {
    let Some(model) = workout_routine::Entity::find_by_id(id).one(conn).await? else {
        return Ok(None);
    };
    Ok(assemble(conn, vec![model]).await?.pop())
}

/// Refresh `updated_at` on the owning routine after a link change.
pub(crate) async fn touch_routine<C: ConnectionTrait>(conn: &C, routine_id: i64) -> AppResult<()> {
    workout_routine::Entity::update_many()
        .col_expr(workout_routine::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(workout_routine::Column::Id.eq(routine_id))
        .exec(conn)
        .await?;
    Ok(())
}

/// Insert a link. The `(routine, exercise)` unique index turns a lost race
/// into `DuplicateExercise`.
pub(crate) async fn insert_link<C: ConnectionTrait>(
    conn: &C,
    routine_id: i64,
    exercise_id: i64,
    params: LinkParams,
) -> AppResult<routine_exercise::Model> {
    let now = Utc::now();
    routine_exercise::ActiveModel {
        workout_routine_id: Set(routine_id),
        exercise_id: Set(exercise_id),
        sets: Set(params.sets),
        reps: Set(params.reps),
        rest_time: Set(params.rest_time),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| AppError::from_db_unique(e, || duplicate_link(routine_id, exercise_id)))
}

/// Persist sets/reps/rest time of an existing link.
pub(crate) async fn write_link<C: ConnectionTrait>(
    conn: &C,
    link: &RoutineExercise,
) -> AppResult<routine_exercise::Model> {
    let model = routine_exercise::Entity::find_by_id(link.id)
        .one(conn)
        .await?
        .ok_or_not_found(format!("Routine exercise not found with ID: {}", link.id))?;

    let mut active: routine_exercise::ActiveModel = model.into();
    active.sets = Set(link.sets);
    active.reps = Set(link.reps);
    active.rest_time = Set(link.rest_time);
    active.updated_at = Set(link.updated_at);

    Ok(active.update(conn).await?)
}

/// Load links matching `select` together with their exercise and routine.
pub(crate) async fn load_details<C: ConnectionTrait>(
    conn: &C,
    select: Select<routine_exercise::Entity>,
) -> AppResult<Vec<RoutineExerciseDetail>> {
    let rows = select
        .find_also_related(exercise::Entity)
        .order_by_asc(routine_exercise::Column::Id)
        .all(conn)
        .await?;

    let routine_ids: BTreeSet<i64> = rows.iter().map(|(l, _)| l.workout_routine_id).collect();
    let routines: HashMap<i64, RoutineSummary> = if routine_ids.is_empty() {
        HashMap::new()
    } else {
        workout_routine::Entity::find()
            .filter(workout_routine::Column::Id.is_in(routine_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|m| (m.id, RoutineSummary::from(m)))
            .collect()
    };

    rows.into_iter()
        .map(|(link, exercise)| {
            let exercise = exercise.ok_or_else(|| dangling(link.id, "exercise"))?;
            let routine = routines
                .get(&link.workout_routine_id)
                .cloned()
                .ok_or_else(|| dangling(link.id, "workout routine"))?;
            Ok(RoutineExerciseDetail {
                link: link.into_link(exercise.into()),
                routine,
            })
        })
        .collect()
}
