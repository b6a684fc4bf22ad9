use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgExecutor, QueryBuilder};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::catalog::{Nutrients, SetSpec};
use crate::error::AppResult;

use super::snapshot::{ExerciseSnapshot, FoodSnapshot};

const FOOD_ENTRY_COLUMNS: &str = "id, user_id, food_id, variant_id, group_id, template_id, \
     assignment_id, meal_type, entry_date, quantity, unit, food_name, brand_name, serving_size, \
     serving_unit, calories, protein, carbs, fat, saturated_fat, polyunsaturated_fat, \
     monounsaturated_fat, trans_fat, cholesterol, sodium, potassium, dietary_fiber, sugars, \
     vitamin_a, vitamin_c, calcium, iron, created_at, updated_at";

const EXERCISE_ENTRY_COLUMNS: &str = "id, user_id, exercise_id, template_id, assignment_id, \
     entry_date, duration_minutes, calories_burned, notes, exercise_name, category, \
     calories_per_hour, force, level, mechanic, equipment, primary_muscles, secondary_muscles, \
     instructions, images, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewFoodEntry {
    pub food_id: Uuid,
    pub variant_id: Uuid,
    pub group_id: Option<Uuid>,
    pub template_id: Option<Uuid>,
    pub assignment_id: Option<Uuid>,
    pub meal_type: String,
    pub entry_date: Date,
    pub quantity: f64,
    pub unit: String,
    pub snapshot: FoodSnapshot,
}

#[derive(Debug, Clone)]
pub struct NewEntryGroup {
    pub meal_id: Uuid,
    pub meal_name: String,
    pub meal_type: String,
    pub entry_date: Date,
    pub quantity: f64,
    pub unit: String,
    pub template_id: Option<Uuid>,
    pub assignment_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewExerciseEntry {
    pub exercise_id: Uuid,
    pub template_id: Option<Uuid>,
    pub assignment_id: Option<Uuid>,
    pub entry_date: Date,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub notes: Option<String>,
    pub snapshot: ExerciseSnapshot,
    pub sets: Vec<SetSpec>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Option<Uuid>,
    pub variant_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub template_id: Option<Uuid>,
    pub assignment_id: Option<Uuid>,
    pub meal_type: String,
    pub entry_date: Date,
    pub quantity: f64,
    pub unit: String,
    pub food_name: String,
    pub brand_name: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub nutrients: Nutrients,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FoodEntryGroup {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_id: Option<Uuid>,
    pub meal_name: String,
    pub meal_type: String,
    pub entry_date: Date,
    pub quantity: f64,
    pub unit: String,
    pub template_id: Option<Uuid>,
    pub assignment_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExerciseEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub exercise_id: Option<Uuid>,
    pub template_id: Option<Uuid>,
    pub assignment_id: Option<Uuid>,
    pub entry_date: Date,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    pub notes: Option<String>,
    pub exercise_name: String,
    pub category: Option<String>,
    pub calories_per_hour: f64,
    pub force: Option<String>,
    pub level: Option<String>,
    pub mechanic: Option<String>,
    pub equipment: Option<serde_json::Value>,
    pub primary_muscles: Option<serde_json::Value>,
    pub secondary_muscles: Option<serde_json::Value>,
    pub instructions: Option<serde_json::Value>,
    pub images: Option<serde_json::Value>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Bulk insert. The partial dedup indexes make a losing concurrent insert of
/// a template-generated row a no-op, so the returned count is what actually
/// landed.
pub async fn insert_food_entries(
    conn: &mut PgConnection,
    user_id: Uuid,
    rows: &[NewFoodEntry],
) -> AppResult<u64> {
    if rows.is_empty() {
        return Ok(0);
    }
    let mut qb = QueryBuilder::new(
        "INSERT INTO food_entries (user_id, food_id, variant_id, group_id, template_id, \
         assignment_id, meal_type, entry_date, quantity, unit, food_name, brand_name, \
         serving_size, serving_unit, calories, protein, carbs, fat, saturated_fat, \
         polyunsaturated_fat, monounsaturated_fat, trans_fat, cholesterol, sodium, potassium, \
         dietary_fiber, sugars, vitamin_a, vitamin_c, calcium, iron) ",
    );
    qb.push_values(rows, |mut b, row| {
        let n = &row.snapshot.nutrients;
        b.push_bind(user_id)
            .push_bind(row.food_id)
            .push_bind(row.variant_id)
            .push_bind(row.group_id)
            .push_bind(row.template_id)
            .push_bind(row.assignment_id)
            .push_bind(&row.meal_type)
            .push_bind(row.entry_date)
            .push_bind(row.quantity)
            .push_bind(&row.unit)
            .push_bind(&row.snapshot.food_name)
            .push_bind(&row.snapshot.brand_name)
            .push_bind(row.snapshot.serving_size)
            .push_bind(&row.snapshot.serving_unit)
            .push_bind(n.calories)
            .push_bind(n.protein)
            .push_bind(n.carbs)
            .push_bind(n.fat)
            .push_bind(n.saturated_fat)
            .push_bind(n.polyunsaturated_fat)
            .push_bind(n.monounsaturated_fat)
            .push_bind(n.trans_fat)
            .push_bind(n.cholesterol)
            .push_bind(n.sodium)
            .push_bind(n.potassium)
            .push_bind(n.dietary_fiber)
            .push_bind(n.sugars)
            .push_bind(n.vitamin_a)
            .push_bind(n.vitamin_c)
            .push_bind(n.calcium)
            .push_bind(n.iron);
    });
    qb.push(" ON CONFLICT DO NOTHING");
    let result = qb.build().execute(conn).await?;
    Ok(result.rows_affected())
}

/// Single manual insert, returning the stored row.
pub async fn insert_food_entry(
    conn: &mut PgConnection,
    user_id: Uuid,
    row: &NewFoodEntry,
) -> AppResult<FoodEntry> {
    let n = &row.snapshot.nutrients;
    let entry = sqlx::query_as::<_, FoodEntry>(&format!(
        "INSERT INTO food_entries (user_id, food_id, variant_id, group_id, template_id, \
         assignment_id, meal_type, entry_date, quantity, unit, food_name, brand_name, \
         serving_size, serving_unit, calories, protein, carbs, fat, saturated_fat, \
         polyunsaturated_fat, monounsaturated_fat, trans_fat, cholesterol, sodium, potassium, \
         dietary_fiber, sugars, vitamin_a, vitamin_c, calcium, iron) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
                 $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31) \
         RETURNING {FOOD_ENTRY_COLUMNS}"
    ))
    .bind(user_id)
    .bind(row.food_id)
    .bind(row.variant_id)
    .bind(row.group_id)
    .bind(row.template_id)
    .bind(row.assignment_id)
    .bind(&row.meal_type)
    .bind(row.entry_date)
    .bind(row.quantity)
    .bind(&row.unit)
    .bind(&row.snapshot.food_name)
    .bind(&row.snapshot.brand_name)
    .bind(row.snapshot.serving_size)
    .bind(&row.snapshot.serving_unit)
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
    .fetch_one(conn)
    .await?;
    Ok(entry)
}

/// Returns None when a concurrent run already inserted the same generated
/// group (dedup index conflict).
pub async fn insert_food_entry_group(
    conn: &mut PgConnection,
    user_id: Uuid,
    group: &NewEntryGroup,
) -> AppResult<Option<Uuid>> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO food_entry_groups
            (user_id, meal_id, meal_name, meal_type, entry_date, quantity, unit,
             template_id, assignment_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT DO NOTHING
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(group.meal_id)
    .bind(&group.meal_name)
    .bind(&group.meal_type)
    .bind(group.entry_date)
    .bind(group.quantity)
    .bind(&group.unit)
    .bind(group.template_id)
    .bind(group.assignment_id)
    .fetch_optional(conn)
    .await?;
    Ok(id)
}

/// Insert an exercise entry with its sets. Returns None when a concurrent
/// run won the dedup race; the sets are skipped along with the entry.
pub async fn insert_exercise_entry(
    conn: &mut PgConnection,
    user_id: Uuid,
    entry: &NewExerciseEntry,
) -> AppResult<Option<Uuid>> {
    let snap = &entry.snapshot;
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO exercise_entries
            (user_id, exercise_id, template_id, assignment_id, entry_date, duration_minutes,
             calories_burned, notes, exercise_name, category, calories_per_hour, force, level,
             mechanic, equipment, primary_muscles, secondary_muscles, instructions, images)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
        ON CONFLICT DO NOTHING
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(entry.exercise_id)
    .bind(entry.template_id)
    .bind(entry.assignment_id)
    .bind(entry.entry_date)
    .bind(entry.duration_minutes)
    .bind(entry.calories_burned)
    .bind(&entry.notes)
    .bind(&snap.exercise_name)
    .bind(&snap.category)
    .bind(snap.calories_per_hour)
    .bind(&snap.force)
    .bind(&snap.level)
    .bind(&snap.mechanic)
    .bind(&snap.equipment)
    .bind(&snap.primary_muscles)
    .bind(&snap.secondary_muscles)
    .bind(&snap.instructions)
    .bind(&snap.images)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(entry_id) = id {
        replace_exercise_entry_sets(conn, entry_id, &entry.sets).await?;
    }
    Ok(id)
}

pub async fn replace_exercise_entry_sets(
    conn: &mut PgConnection,
    entry_id: Uuid,
    sets: &[SetSpec],
) -> AppResult<()> {
    sqlx::query("DELETE FROM exercise_entry_sets WHERE entry_id = $1")
        .bind(entry_id)
        .execute(&mut *conn)
        .await?;
    if sets.is_empty() {
        return Ok(());
    }
    let mut qb = QueryBuilder::new(
        "INSERT INTO exercise_entry_sets \
         (entry_id, set_number, set_type, reps, weight, duration, rest_time, notes) ",
    );
    qb.push_values(sets, |mut b, set| {
        b.push_bind(entry_id)
            .push_bind(set.set_number)
            .push_bind(&set.set_type)
            .push_bind(set.reps)
            .push_bind(set.weight)
            .push_bind(set.duration)
            .push_bind(set.rest_time)
            .push_bind(&set.notes);
    });
    qb.build().execute(conn).await?;
    Ok(())
}

pub async fn get_food_entry<'e, E: PgExecutor<'e>>(
    db: E,
    id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<FoodEntry>> {
    let entry = sqlx::query_as::<_, FoodEntry>(&format!(
        "SELECT {FOOD_ENTRY_COLUMNS} FROM food_entries WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(entry)
}

pub async fn get_exercise_entry<'e, E: PgExecutor<'e>>(
    db: E,
    id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<ExerciseEntry>> {
    let entry = sqlx::query_as::<_, ExerciseEntry>(&format!(
        "SELECT {EXERCISE_ENTRY_COLUMNS} FROM exercise_entries WHERE id = $1 AND user_id = $2"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(entry)
}

pub async fn get_exercise_entry_sets<'e, E: PgExecutor<'e>>(
    db: E,
    entry_id: Uuid,
) -> AppResult<Vec<SetSpec>> {
    let sets = sqlx::query_as::<_, SetSpec>(
        r#"
        SELECT set_number, set_type, reps, weight, duration, rest_time, notes
        FROM exercise_entry_sets
        WHERE entry_id = $1
        ORDER BY set_number
        "#,
    )
    .bind(entry_id)
    .fetch_all(db)
    .await?;
    Ok(sets)
}

pub async fn list_food_entries_by_date<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    date: Date,
) -> AppResult<Vec<FoodEntry>> {
    let entries = sqlx::query_as::<_, FoodEntry>(&format!(
        "SELECT {FOOD_ENTRY_COLUMNS} FROM food_entries \
         WHERE user_id = $1 AND entry_date = $2 ORDER BY created_at"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(entries)
}

pub async fn list_food_entry_groups_by_date<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    date: Date,
) -> AppResult<Vec<FoodEntryGroup>> {
    let groups = sqlx::query_as::<_, FoodEntryGroup>(
        r#"
        SELECT id, user_id, meal_id, meal_name, meal_type, entry_date, quantity, unit,
               template_id, assignment_id, created_at, updated_at
        FROM food_entry_groups
        WHERE user_id = $1 AND entry_date = $2
        ORDER BY created_at
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(groups)
}

pub async fn list_food_entries_by_group<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    group_id: Uuid,
) -> AppResult<Vec<FoodEntry>> {
    let entries = sqlx::query_as::<_, FoodEntry>(&format!(
        "SELECT {FOOD_ENTRY_COLUMNS} FROM food_entries \
         WHERE user_id = $1 AND group_id = $2 ORDER BY created_at"
    ))
    .bind(user_id)
    .bind(group_id)
    .fetch_all(db)
    .await?;
    Ok(entries)
}

#[derive(FromRow)]
pub struct EntrySetRow {
    pub entry_id: Uuid,
    #[sqlx(flatten)]
    pub set: SetSpec,
}

pub async fn get_sets_for_entries<'e, E: PgExecutor<'e>>(
    db: E,
    entry_ids: &[Uuid],
) -> AppResult<Vec<EntrySetRow>> {
    let sets = sqlx::query_as::<_, EntrySetRow>(
        r#"
        SELECT entry_id, set_number, set_type, reps, weight, duration, rest_time, notes
        FROM exercise_entry_sets
        WHERE entry_id = ANY($1)
        ORDER BY entry_id, set_number
        "#,
    )
    .bind(entry_ids)
    .fetch_all(db)
    .await?;
    Ok(sets)
}

pub async fn list_exercise_entries_by_date<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    date: Date,
) -> AppResult<Vec<ExerciseEntry>> {
    let entries = sqlx::query_as::<_, ExerciseEntry>(&format!(
        "SELECT {EXERCISE_ENTRY_COLUMNS} FROM exercise_entries \
         WHERE user_id = $1 AND entry_date = $2 ORDER BY created_at"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_all(db)
    .await?;
    Ok(entries)
}

/// Rewrite a food entry in place: logged fields plus its snapshot block.
pub async fn update_food_entry(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
    meal_type: &str,
    entry_date: Date,
    quantity: f64,
    unit: &str,
    food_id: Uuid,
    variant_id: Uuid,
    snapshot: &FoodSnapshot,
) -> AppResult<bool> {
    let n = &snapshot.nutrients;
    let result = sqlx::query(
        r#"
        UPDATE food_entries SET
            food_id = $1, variant_id = $2, meal_type = $3, entry_date = $4,
            quantity = $5, unit = $6,
            food_name = $7, brand_name = $8, serving_size = $9, serving_unit = $10,
            calories = $11, protein = $12, carbs = $13, fat = $14,
            saturated_fat = $15, polyunsaturated_fat = $16, monounsaturated_fat = $17,
            trans_fat = $18, cholesterol = $19, sodium = $20, potassium = $21,
            dietary_fiber = $22, sugars = $23, vitamin_a = $24, vitamin_c = $25,
            calcium = $26, iron = $27,
            updated_at = now()
        WHERE id = $28 AND user_id = $29
        "#,
    )
    .bind(food_id)
    .bind(variant_id)
    .bind(meal_type)
    .bind(entry_date)
    .bind(quantity)
    .bind(unit)
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
    .bind(id)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_exercise_entry(
    conn: &mut PgConnection,
    id: Uuid,
    user_id: Uuid,
    entry_date: Date,
    duration_minutes: f64,
    calories_burned: f64,
    notes: Option<&str>,
    exercise_id: Uuid,
    snapshot: &ExerciseSnapshot,
) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE exercise_entries SET
            exercise_id = $1, entry_date = $2, duration_minutes = $3, calories_burned = $4,
            notes = $5, exercise_name = $6, category = $7, calories_per_hour = $8,
            force = $9, level = $10, mechanic = $11, equipment = $12, primary_muscles = $13,
            secondary_muscles = $14, instructions = $15, images = $16,
            updated_at = now()
        WHERE id = $17 AND user_id = $18
        "#,
    )
    .bind(exercise_id)
    .bind(entry_date)
    .bind(duration_minutes)
    .bind(calories_burned)
    .bind(notes)
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
    .bind(id)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_food_entry<'e, E: PgExecutor<'e>>(
    db: E,
    id: Uuid,
    user_id: Uuid,
) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM food_entries WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_food_entry_group<'e, E: PgExecutor<'e>>(
    db: E,
    id: Uuid,
    user_id: Uuid,
) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM food_entry_groups WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_exercise_entry<'e, E: PgExecutor<'e>>(
    db: E,
    id: Uuid,
    user_id: Uuid,
) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM exercise_entries WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Bulk deletion over a date range, optionally narrowed to entries generated
/// by one template. Groups go first so their children are counted once via
/// the cascade, then loose entries and exercise entries.
pub async fn delete_entries_in_range(
    conn: &mut PgConnection,
    user_id: Uuid,
    start: Date,
    end: Date,
    template_id: Option<Uuid>,
) -> AppResult<u64> {
    let mut deleted = 0u64;

    let groups = sqlx::query(
        r#"
        DELETE FROM food_entry_groups
        WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
          AND ($4::uuid IS NULL OR template_id = $4)
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .bind(template_id)
    .execute(&mut *conn)
    .await?;
    deleted += groups.rows_affected();

    let foods = sqlx::query(
        r#"
        DELETE FROM food_entries
        WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3 AND group_id IS NULL
          AND ($4::uuid IS NULL OR template_id = $4)
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .bind(template_id)
    .execute(&mut *conn)
    .await?;
    deleted += foods.rows_affected();

    let exercises = sqlx::query(
        r#"
        DELETE FROM exercise_entries
        WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
          AND ($4::uuid IS NULL OR template_id = $4)
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .bind(template_id)
    .execute(&mut *conn)
    .await?;
    deleted += exercises.rows_affected();

    Ok(deleted)
}

/// Retract generated entries dated `from_date` or later for a whole
/// template. History before `from_date` is left intact; the template
/// references on it are severed by ON DELETE SET NULL when the template row
/// goes away.
pub async fn retract_generated_entries(
    conn: &mut PgConnection,
    user_id: Uuid,
    template_id: Uuid,
    from_date: Date,
) -> AppResult<u64> {
    let mut deleted = 0u64;

    let groups = sqlx::query(
        r#"
        DELETE FROM food_entry_groups
        WHERE user_id = $1 AND template_id = $2 AND entry_date >= $3
        "#,
    )
    .bind(user_id)
    .bind(template_id)
    .bind(from_date)
    .execute(&mut *conn)
    .await?;
    deleted += groups.rows_affected();

    let foods = sqlx::query(
        r#"
        DELETE FROM food_entries
        WHERE user_id = $1 AND template_id = $2 AND entry_date >= $3 AND group_id IS NULL
        "#,
    )
    .bind(user_id)
    .bind(template_id)
    .bind(from_date)
    .execute(&mut *conn)
    .await?;
    deleted += foods.rows_affected();

    let exercises = sqlx::query(
        r#"
        DELETE FROM exercise_entries
        WHERE user_id = $1 AND template_id = $2 AND entry_date >= $3
        "#,
    )
    .bind(user_id)
    .bind(template_id)
    .bind(from_date)
    .execute(&mut *conn)
    .await?;
    deleted += exercises.rows_affected();

    Ok(deleted)
}

/// Same retraction scoped to a single assignment.
pub async fn retract_generated_entries_for_assignment(
    conn: &mut PgConnection,
    user_id: Uuid,
    assignment_id: Uuid,
    from_date: Date,
) -> AppResult<u64> {
    let mut deleted = 0u64;

    let groups = sqlx::query(
        r#"
        DELETE FROM food_entry_groups
        WHERE user_id = $1 AND assignment_id = $2 AND entry_date >= $3
        "#,
    )
    .bind(user_id)
    .bind(assignment_id)
    .bind(from_date)
    .execute(&mut *conn)
    .await?;
    deleted += groups.rows_affected();

    let foods = sqlx::query(
        r#"
        DELETE FROM food_entries
        WHERE user_id = $1 AND assignment_id = $2 AND entry_date >= $3 AND group_id IS NULL
        "#,
    )
    .bind(user_id)
    .bind(assignment_id)
    .bind(from_date)
    .execute(&mut *conn)
    .await?;
    deleted += foods.rows_affected();

    let exercises = sqlx::query(
        r#"
        DELETE FROM exercise_entries
        WHERE user_id = $1 AND assignment_id = $2 AND entry_date >= $3
        "#,
    )
    .bind(user_id)
    .bind(assignment_id)
    .bind(from_date)
    .execute(&mut *conn)
    .await?;
    deleted += exercises.rows_affected();

    Ok(deleted)
}
