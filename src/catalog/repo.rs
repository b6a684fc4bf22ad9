use sqlx::PgExecutor;
use uuid::Uuid;

use crate::error::AppResult;

use super::types::{
    Exercise, Food, FoodVariant, Meal, MealComponentDetail, PresetExerciseDetail, SetSpec,
    WorkoutPreset,
};

const VARIANT_COLUMNS: &str = "id, food_id, serving_size, serving_unit, is_default, \
     calories, protein, carbs, fat, saturated_fat, polyunsaturated_fat, monounsaturated_fat, \
     trans_fat, cholesterol, sodium, potassium, dietary_fiber, sugars, vitamin_a, vitamin_c, \
     calcium, iron, created_at, updated_at";

pub async fn get_food_by_id<'e, E: PgExecutor<'e>>(
    db: E,
    food_id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<Food>> {
    let food = sqlx::query_as::<_, Food>(
        r#"
        SELECT id, user_id, name, brand, created_at, updated_at
        FROM foods
        WHERE id = $1 AND (user_id IS NULL OR user_id = $2)
        "#,
    )
    .bind(food_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(food)
}

pub async fn get_foods_by_ids<'e, E: PgExecutor<'e>>(
    db: E,
    food_ids: &[Uuid],
    user_id: Uuid,
) -> AppResult<Vec<Food>> {
    let foods = sqlx::query_as::<_, Food>(
        r#"
        SELECT id, user_id, name, brand, created_at, updated_at
        FROM foods
        WHERE id = ANY($1) AND (user_id IS NULL OR user_id = $2)
        "#,
    )
    .bind(food_ids)
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(foods)
}

pub async fn get_food_variant_by_id<'e, E: PgExecutor<'e>>(
    db: E,
    variant_id: Uuid,
) -> AppResult<Option<FoodVariant>> {
    let variant = sqlx::query_as::<_, FoodVariant>(&format!(
        "SELECT {VARIANT_COLUMNS} FROM food_variants WHERE id = $1"
    ))
    .bind(variant_id)
    .fetch_optional(db)
    .await?;
    Ok(variant)
}

pub async fn get_food_variants_by_ids<'e, E: PgExecutor<'e>>(
    db: E,
    variant_ids: &[Uuid],
) -> AppResult<Vec<FoodVariant>> {
    let variants = sqlx::query_as::<_, FoodVariant>(&format!(
        "SELECT {VARIANT_COLUMNS} FROM food_variants WHERE id = ANY($1)"
    ))
    .bind(variant_ids)
    .fetch_all(db)
    .await?;
    Ok(variants)
}

pub async fn get_exercise_by_id<'e, E: PgExecutor<'e>>(
    db: E,
    exercise_id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<Exercise>> {
    let exercise = sqlx::query_as::<_, Exercise>(
        r#"
        SELECT id, user_id, name, category, calories_per_hour, force, level, mechanic,
               equipment, primary_muscles, secondary_muscles, instructions, images,
               created_at, updated_at
        FROM exercises
        WHERE id = $1 AND (user_id IS NULL OR user_id = $2)
        "#,
    )
    .bind(exercise_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(exercise)
}

pub async fn get_exercises_by_ids<'e, E: PgExecutor<'e>>(
    db: E,
    exercise_ids: &[Uuid],
    user_id: Uuid,
) -> AppResult<Vec<Exercise>> {
    let exercises = sqlx::query_as::<_, Exercise>(
        r#"
        SELECT id, user_id, name, category, calories_per_hour, force, level, mechanic,
               equipment, primary_muscles, secondary_muscles, instructions, images,
               created_at, updated_at
        FROM exercises
        WHERE id = ANY($1) AND (user_id IS NULL OR user_id = $2)
        "#,
    )
    .bind(exercise_ids)
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(exercises)
}

pub async fn get_meal_by_id<'e, E: PgExecutor<'e>>(
    db: E,
    meal_id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<Meal>> {
    let meal = sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, user_id, name, description, serving_size, serving_unit,
               created_at, updated_at
        FROM meals
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(meal_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(meal)
}

pub async fn get_meals_by_ids<'e, E: PgExecutor<'e>>(
    db: E,
    meal_ids: &[Uuid],
    user_id: Uuid,
) -> AppResult<Vec<Meal>> {
    let meals = sqlx::query_as::<_, Meal>(
        r#"
        SELECT id, user_id, name, description, serving_size, serving_unit,
               created_at, updated_at
        FROM meals
        WHERE id = ANY($1) AND user_id = $2
        "#,
    )
    .bind(meal_ids)
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(meals)
}

/// Components of the given meals, joined with food names and variant serving
/// facts in one round trip.
pub async fn get_meal_components<'e, E: PgExecutor<'e>>(
    db: E,
    meal_ids: &[Uuid],
) -> AppResult<Vec<MealComponentDetail>> {
    let components = sqlx::query_as::<_, MealComponentDetail>(
        r#"
        SELECT mc.meal_id, mc.food_id, mc.variant_id, mc.quantity, mc.unit,
               f.name AS food_name, f.brand AS brand_name,
               fv.serving_size, fv.serving_unit,
               fv.calories, fv.protein, fv.carbs, fv.fat,
               fv.saturated_fat, fv.polyunsaturated_fat, fv.monounsaturated_fat, fv.trans_fat,
               fv.cholesterol, fv.sodium, fv.potassium, fv.dietary_fiber, fv.sugars,
               fv.vitamin_a, fv.vitamin_c, fv.calcium, fv.iron
        FROM meal_components mc
        JOIN foods f ON f.id = mc.food_id
        JOIN food_variants fv ON fv.id = mc.variant_id
        WHERE mc.meal_id = ANY($1)
        ORDER BY mc.meal_id, mc.position
        "#,
    )
    .bind(meal_ids)
    .fetch_all(db)
    .await?;
    Ok(components)
}

pub async fn get_workout_presets_by_ids<'e, E: PgExecutor<'e>>(
    db: E,
    preset_ids: &[Uuid],
    user_id: Uuid,
) -> AppResult<Vec<WorkoutPreset>> {
    let presets = sqlx::query_as::<_, WorkoutPreset>(
        r#"
        SELECT id, user_id, name, description, created_at, updated_at
        FROM workout_presets
        WHERE id = ANY($1) AND user_id = $2
        "#,
    )
    .bind(preset_ids)
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(presets)
}

#[derive(sqlx::FromRow)]
struct PresetExerciseRow {
    id: Uuid,
    preset_id: Uuid,
    exercise_id: Uuid,
    position: i32,
    notes: Option<String>,
}

#[derive(sqlx::FromRow)]
struct PresetSetRow {
    preset_exercise_id: Uuid,
    #[sqlx(flatten)]
    set: SetSpec,
}

/// Exercise slots of the given presets with their exercise rows and ordered
/// sets attached. Three round trips, no N+1.
pub async fn get_preset_exercises(
    conn: &mut sqlx::PgConnection,
    preset_ids: &[Uuid],
    user_id: Uuid,
) -> AppResult<Vec<PresetExerciseDetail>> {
    let slots = sqlx::query_as::<_, PresetExerciseRow>(
        r#"
        SELECT id, preset_id, exercise_id, position, notes
        FROM workout_preset_exercises
        WHERE preset_id = ANY($1)
        ORDER BY preset_id, position
        "#,
    )
    .bind(preset_ids)
    .fetch_all(&mut *conn)
    .await?;

    let exercise_ids: Vec<Uuid> = slots.iter().map(|s| s.exercise_id).collect();
    let exercises = get_exercises_by_ids(&mut *conn, &exercise_ids, user_id).await?;

    let slot_ids: Vec<Uuid> = slots.iter().map(|s| s.id).collect();
    let set_rows = sqlx::query_as::<_, PresetSetRow>(
        r#"
        SELECT preset_exercise_id, set_number, set_type, reps, weight, duration, rest_time, notes
        FROM workout_preset_sets
        WHERE preset_exercise_id = ANY($1)
        ORDER BY preset_exercise_id, set_number
        "#,
    )
    .bind(&slot_ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut details = Vec::with_capacity(slots.len());
    for slot in slots {
        let Some(exercise) = exercises.iter().find(|e| e.id == slot.exercise_id) else {
            return Err(crate::error::AppError::not_found(format!(
                "source definition not found: exercise {}",
                slot.exercise_id
            )));
        };
        let sets = set_rows
            .iter()
            .filter(|r| r.preset_exercise_id == slot.id)
            .map(|r| r.set.clone())
            .collect();
        details.push(PresetExerciseDetail {
            preset_id: slot.preset_id,
            exercise_id: slot.exercise_id,
            position: slot.position,
            notes: slot.notes,
            exercise: exercise.clone(),
            sets,
        });
    }
    Ok(details)
}
