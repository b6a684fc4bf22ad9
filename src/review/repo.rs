use sqlx::{FromRow, PgConnection, PgExecutor};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::diary::snapshot::{ExerciseSnapshot, FoodSnapshot};
use crate::error::AppResult;

use super::dto::SourceKind;

#[derive(Debug, FromRow)]
pub struct StaleSourceRow {
    pub source_id: Uuid,
    pub name: String,
    pub source_updated_at: OffsetDateTime,
    pub entry_created_at: OffsetDateTime,
}

/// Foods whose definition changed after a referencing entry was snapshotted,
/// minus those the user acknowledged at exactly the current version. One row
/// per food, carrying the most recent stale entry's creation time. Deleted
/// foods drop out via the join.
pub async fn foods_needing_review<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
) -> AppResult<Vec<StaleSourceRow>> {
    let rows = sqlx::query_as::<_, StaleSourceRow>(
        r#"
        SELECT DISTINCT ON (fe.food_id)
            fe.food_id AS source_id,
            f.name,
            f.updated_at AS source_updated_at,
            fe.created_at AS entry_created_at
        FROM food_entries fe
        JOIN foods f ON f.id = fe.food_id
        WHERE fe.user_id = $1
          AND f.updated_at > fe.created_at
          AND NOT EXISTS (
              SELECT 1 FROM ignored_updates iu
              WHERE iu.user_id = $1
                AND iu.source_kind = 'food'
                AND iu.source_id = fe.food_id
                AND iu.ignored_at = f.updated_at
          )
        ORDER BY fe.food_id, fe.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn meals_needing_review<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
) -> AppResult<Vec<StaleSourceRow>> {
    let rows = sqlx::query_as::<_, StaleSourceRow>(
        r#"
        SELECT DISTINCT ON (g.meal_id)
            g.meal_id AS source_id,
            m.name,
            m.updated_at AS source_updated_at,
            g.created_at AS entry_created_at
        FROM food_entry_groups g
        JOIN meals m ON m.id = g.meal_id
        WHERE g.user_id = $1
          AND m.updated_at > g.created_at
          AND NOT EXISTS (
              SELECT 1 FROM ignored_updates iu
              WHERE iu.user_id = $1
                AND iu.source_kind = 'meal'
                AND iu.source_id = g.meal_id
                AND iu.ignored_at = m.updated_at
          )
        ORDER BY g.meal_id, g.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn exercises_needing_review<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
) -> AppResult<Vec<StaleSourceRow>> {
    let rows = sqlx::query_as::<_, StaleSourceRow>(
        r#"
        SELECT DISTINCT ON (ee.exercise_id)
            ee.exercise_id AS source_id,
            e.name,
            e.updated_at AS source_updated_at,
            ee.created_at AS entry_created_at
        FROM exercise_entries ee
        JOIN exercises e ON e.id = ee.exercise_id
        WHERE ee.user_id = $1
          AND e.updated_at > ee.created_at
          AND NOT EXISTS (
              SELECT 1 FROM ignored_updates iu
              WHERE iu.user_id = $1
                AND iu.source_kind = 'exercise'
                AND iu.source_id = ee.exercise_id
                AND iu.ignored_at = e.updated_at
          )
        ORDER BY ee.exercise_id, ee.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Point-in-time acknowledgment. Replaces any older marker; a later source
/// edit leaves the stored timestamp behind and the item resurfaces.
pub async fn upsert_ignored_update<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    kind: SourceKind,
    source_id: Uuid,
    ignored_at: OffsetDateTime,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO ignored_updates (user_id, source_kind, source_id, ignored_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (user_id, source_kind, source_id)
        DO UPDATE SET ignored_at = EXCLUDED.ignored_at
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(source_id)
    .bind(ignored_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn clear_ignored_update<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    kind: SourceKind,
    source_id: Uuid,
) -> AppResult<()> {
    sqlx::query(
        "DELETE FROM ignored_updates WHERE user_id = $1 AND source_kind = $2 AND source_id = $3",
    )
    .bind(user_id)
    .bind(kind)
    .bind(source_id)
    .execute(db)
    .await?;
    Ok(())
}

/// The logged fields a food re-snapshot needs, per entry.
#[derive(Debug, FromRow)]
pub struct FoodEntryRef {
    pub id: Uuid,
    pub variant_id: Option<Uuid>,
    pub quantity: f64,
    pub unit: String,
}

pub async fn food_entry_refs<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    food_id: Uuid,
) -> AppResult<Vec<FoodEntryRef>> {
    let rows = sqlx::query_as::<_, FoodEntryRef>(
        r#"
        SELECT id, variant_id, quantity, unit
        FROM food_entries
        WHERE user_id = $1 AND food_id = $2
        "#,
    )
    .bind(user_id)
    .bind(food_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

#[derive(Debug, FromRow)]
pub struct ExerciseEntryRef {
    pub id: Uuid,
    pub duration_minutes: f64,
}

pub async fn exercise_entry_refs<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    exercise_id: Uuid,
) -> AppResult<Vec<ExerciseEntryRef>> {
    let rows = sqlx::query_as::<_, ExerciseEntryRef>(
        r#"
        SELECT id, duration_minutes
        FROM exercise_entries
        WHERE user_id = $1 AND exercise_id = $2
        "#,
    )
    .bind(user_id)
    .bind(exercise_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Overwrite only the snapshot block; dates and logged quantities stay.
pub async fn update_food_entry_snapshot(
    conn: &mut PgConnection,
    entry_id: Uuid,
    snapshot: &FoodSnapshot,
) -> AppResult<()> {
    let n = &snapshot.nutrients;
    sqlx::query(
        r#"
        UPDATE food_entries SET
            food_name = $1, brand_name = $2, serving_size = $3, serving_unit = $4,
            calories = $5, protein = $6, carbs = $7, fat = $8,
            saturated_fat = $9, polyunsaturated_fat = $10, monounsaturated_fat = $11,
            trans_fat = $12, cholesterol = $13, sodium = $14, potassium = $15,
            dietary_fiber = $16, sugars = $17, vitamin_a = $18, vitamin_c = $19,
            calcium = $20, iron = $21,
            updated_at = now()
        WHERE id = $22
        "#,
    )
    .bind(&snapshot.food_name)
    .bind(&snapshot.brand_name)
    .bind(snapshot.serving_size)
    .bind(&snapshot.serving_unit)
    .bind(n.calories)
    .bind(n.protein)
    .bind(n.carbs)
    .bind(n.fat)
    .bind(n.saturated_fat)
    .bind(n.polyunsaturated_fat)
    .bind(n.monounsaturated_fat)
    .bind(n.trans_fat)
    .bind(n.cholesterol)
    .bind(n.sodium)
    .bind(n.potassium)
    .bind(n.dietary_fiber)
    .bind(n.sugars)
    .bind(n.vitamin_a)
    .bind(n.vitamin_c)
    .bind(n.calcium)
    .bind(n.iron)
    .bind(entry_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update_exercise_entry_snapshot(
    conn: &mut PgConnection,
    entry_id: Uuid,
    snapshot: &ExerciseSnapshot,
    calories_burned: f64,
) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE exercise_entries SET
            exercise_name = $1, category = $2, calories_per_hour = $3, force = $4, level = $5,
            mechanic = $6, equipment = $7, primary_muscles = $8, secondary_muscles = $9,
            instructions = $10, images = $11, calories_burned = $12,
            updated_at = now()
        WHERE id = $13
        "#,
    )
    .bind(&snapshot.exercise_name)
    .bind(&snapshot.category)
    .bind(snapshot.calories_per_hour)
    .bind(&snapshot.force)
    .bind(&snapshot.level)
    .bind(&snapshot.mechanic)
    .bind(&snapshot.equipment)
    .bind(&snapshot.primary_muscles)
    .bind(&snapshot.secondary_muscles)
    .bind(&snapshot.instructions)
    .bind(&snapshot.images)
    .bind(calories_burned)
    .bind(entry_id)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn update_group_meal_names<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    meal_id: Uuid,
    meal_name: &str,
) -> AppResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE food_entry_groups SET meal_name = $1, updated_at = now()
        WHERE user_id = $2 AND meal_id = $3
        "#,
    )
    .bind(meal_name)
    .bind(user_id)
    .bind(meal_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}
