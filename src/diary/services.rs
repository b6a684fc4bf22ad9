use sqlx::PgPool;
use time::Date;
use tracing::info;
use uuid::Uuid;

use crate::catalog::repo as catalog_repo;
use crate::error::{AppError, AppResult};
use crate::plans::scaling;

use super::dto::{
    DiaryDay, ExerciseEntryDetail, LogExerciseRequest, LogFoodRequest, LogMealRequest, MealLogged,
    UpdateExerciseEntryRequest, UpdateFoodEntryRequest,
};
use super::repo;
use super::repo::{ExerciseEntry, FoodEntry, NewEntryGroup, NewExerciseEntry, NewFoodEntry};
use super::snapshot;
use super::snapshot::{ExerciseSnapshot, FoodSnapshot};

/// Manual logging: always snapshots the source at call time. No template
/// linkage, so materialization runs never touch these rows.
pub async fn log_food_entry(
    db: &PgPool,
    user_id: Uuid,
    req: LogFoodRequest,
) -> AppResult<FoodEntry> {
    let mut conn = db.acquire().await?;
    let food = catalog_repo::get_food_by_id(&mut *conn, req.food_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("food not found"))?;
    let variant = catalog_repo::get_food_variant_by_id(&mut *conn, req.variant_id)
        .await?
        .ok_or_else(|| AppError::not_found("food variant not found"))?;
    if variant.food_id != food.id {
        return Err(AppError::validation("variant does not belong to this food"));
    }
    let snap = snapshot::food_snapshot(
        &food.name,
        food.brand.as_deref(),
        &variant,
        req.quantity,
        &req.unit,
    )?;
    let entry = repo::insert_food_entry(
        &mut conn,
        user_id,
        &NewFoodEntry {
            food_id: req.food_id,
            variant_id: req.variant_id,
            group_id: None,
            template_id: None,
            assignment_id: None,
            meal_type: req.meal_type.to_lowercase(),
            entry_date: req.entry_date,
            quantity: req.quantity,
            unit: req.unit,
            snapshot: snap,
        },
    )
    .await?;
    Ok(entry)
}

/// Logs a whole meal: one group row plus one snapshotted entry per
/// component, scaled by the logged quantity.
pub async fn log_meal(db: &PgPool, user_id: Uuid, req: LogMealRequest) -> AppResult<MealLogged> {
    let mut tx = db.begin().await?;
    let meal = catalog_repo::get_meal_by_id(&mut *tx, req.meal_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("meal not found"))?;
    let components = catalog_repo::get_meal_components(&mut *tx, &[req.meal_id]).await?;
    if components.is_empty() {
        return Err(AppError::validation("meal has no components"));
    }

    let quantity = req.quantity.unwrap_or(1.0);
    let unit = req
        .unit
        .unwrap_or_else(|| scaling::SERVING_UNIT.to_string());
    let multiplier = scaling::portions(quantity, &unit, meal.serving_size, &meal.serving_unit)?;
    let meal_type = req.meal_type.to_lowercase();

    let group_id = repo::insert_food_entry_group(
        &mut tx,
        user_id,
        &NewEntryGroup {
            meal_id: meal.id,
            meal_name: meal.name.clone(),
            meal_type: meal_type.clone(),
            entry_date: req.entry_date,
            quantity,
            unit,
            template_id: None,
            assignment_id: None,
        },
    )
    .await?
    .ok_or_else(|| AppError::Conflict("an identical meal entry already exists".into()))?;

    let mut children = Vec::with_capacity(components.len());
    for component in &components {
        let scaled_quantity = component.quantity * multiplier;
        let snap = snapshot::component_snapshot(component, scaled_quantity)?;
        children.push(NewFoodEntry {
            food_id: component.food_id,
            variant_id: component.variant_id,
            group_id: Some(group_id),
            template_id: None,
            assignment_id: None,
            meal_type: meal_type.clone(),
            entry_date: req.entry_date,
            quantity: scaled_quantity,
            unit: component.unit.clone(),
            snapshot: snap,
        });
    }
    repo::insert_food_entries(&mut tx, user_id, &children).await?;
    tx.commit().await?;
    info!(meal_id = %meal.id, %user_id, entries = children.len(), "meal logged");

    let mut conn = db.acquire().await?;
    let groups = repo::list_food_entry_groups_by_date(&mut *conn, user_id, req.entry_date).await?;
    let group = groups
        .into_iter()
        .find(|g| g.id == group_id)
        .ok_or_else(|| AppError::not_found("logged meal not found"))?;
    let entries = repo::list_food_entries_by_group(&mut *conn, user_id, group_id).await?;
    Ok(MealLogged { group, entries })
}

pub async fn log_exercise_entry(
    db: &PgPool,
    user_id: Uuid,
    req: LogExerciseRequest,
) -> AppResult<ExerciseEntryDetail> {
    let mut conn = db.acquire().await?;
    let exercise = catalog_repo::get_exercise_by_id(&mut *conn, req.exercise_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("exercise not found"))?;

    let duration = req
        .duration_minutes
        .unwrap_or_else(|| snapshot::planned_duration_minutes(&req.sets));
    if !duration.is_finite() || duration <= 0.0 {
        return Err(AppError::validation("duration must be positive"));
    }
    let calories = req
        .calories_burned
        .unwrap_or_else(|| snapshot::calories_burned(exercise.calories_per_hour, duration));

    let entry_id = repo::insert_exercise_entry(
        &mut conn,
        user_id,
        &NewExerciseEntry {
            exercise_id: req.exercise_id,
            template_id: None,
            assignment_id: None,
            entry_date: req.entry_date,
            duration_minutes: duration,
            calories_burned: calories,
            notes: req.notes,
            snapshot: snapshot::exercise_snapshot(&exercise),
            sets: req.sets,
        },
    )
    .await?
    .ok_or_else(|| AppError::Conflict("an identical exercise entry already exists".into()))?;

    exercise_entry_detail(db, user_id, entry_id).await
}

/// Edit a food entry. Changing quantity rescales the stored snapshot (an
/// upstream catalog edit is never silently picked up); changing the food or
/// variant is an explicit re-point and snapshots the new source at call time.
pub async fn update_food_entry(
    db: &PgPool,
    user_id: Uuid,
    entry_id: Uuid,
    req: UpdateFoodEntryRequest,
) -> AppResult<FoodEntry> {
    let mut tx = db.begin().await?;
    let existing = repo::get_food_entry(&mut *tx, entry_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("food entry not found"))?;

    let meal_type = req
        .meal_type
        .map(|m| m.to_lowercase())
        .unwrap_or(existing.meal_type);
    let entry_date = req.entry_date.unwrap_or(existing.entry_date);
    let quantity = req.quantity.unwrap_or(existing.quantity);
    let unit = req.unit.unwrap_or_else(|| existing.unit.clone());

    let food_id = req.food_id.or(existing.food_id).ok_or_else(|| {
        AppError::validation("entry has no food reference; set food_id explicitly")
    })?;
    let variant_id = req.variant_id.or(existing.variant_id).ok_or_else(|| {
        AppError::validation("entry has no variant reference; set variant_id explicitly")
    })?;
    let source_changed =
        Some(food_id) != existing.food_id || Some(variant_id) != existing.variant_id;

    let snap = if source_changed {
        let food = catalog_repo::get_food_by_id(&mut *tx, food_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("food not found"))?;
        let variant = catalog_repo::get_food_variant_by_id(&mut *tx, variant_id)
            .await?
            .ok_or_else(|| AppError::not_found("food variant not found"))?;
        if variant.food_id != food.id {
            return Err(AppError::validation("variant does not belong to this food"));
        }
        snapshot::food_snapshot(&food.name, food.brand.as_deref(), &variant, quantity, &unit)?
    } else {
        let old_portions = scaling::portions(
            existing.quantity,
            &existing.unit,
            existing.serving_size,
            &existing.serving_unit,
        )?;
        let new_portions =
            scaling::portions(quantity, &unit, existing.serving_size, &existing.serving_unit)?;
        FoodSnapshot {
            food_name: existing.food_name.clone(),
            brand_name: existing.brand_name.clone(),
            serving_size: existing.serving_size,
            serving_unit: existing.serving_unit.clone(),
            nutrients: existing.nutrients.scaled(new_portions / old_portions),
        }
    };

    repo::update_food_entry(
        &mut tx, entry_id, user_id, &meal_type, entry_date, quantity, &unit, food_id, variant_id,
        &snap,
    )
    .await?;
    tx.commit().await?;

    let mut conn = db.acquire().await?;
    repo::get_food_entry(&mut *conn, entry_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("food entry not found"))
}

pub async fn update_exercise_entry(
    db: &PgPool,
    user_id: Uuid,
    entry_id: Uuid,
    req: UpdateExerciseEntryRequest,
) -> AppResult<ExerciseEntryDetail> {
    let mut tx = db.begin().await?;
    let existing = repo::get_exercise_entry(&mut *tx, entry_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("exercise entry not found"))?;

    let entry_date = req.entry_date.unwrap_or(existing.entry_date);
    let duration = req.duration_minutes.unwrap_or(existing.duration_minutes);
    if !duration.is_finite() || duration <= 0.0 {
        return Err(AppError::validation("duration must be positive"));
    }
    let notes = req.notes.or_else(|| existing.notes.clone());

    let exercise_id = req.exercise_id.or(existing.exercise_id).ok_or_else(|| {
        AppError::validation("entry has no exercise reference; set exercise_id explicitly")
    })?;
    let source_changed = Some(exercise_id) != existing.exercise_id;

    let snap = if source_changed {
        let exercise = catalog_repo::get_exercise_by_id(&mut *tx, exercise_id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("exercise not found"))?;
        snapshot::exercise_snapshot(&exercise)
    } else {
        ExerciseSnapshot {
            exercise_name: existing.exercise_name.clone(),
            category: existing.category.clone(),
            calories_per_hour: existing.calories_per_hour,
            force: existing.force.clone(),
            level: existing.level.clone(),
            mechanic: existing.mechanic.clone(),
            equipment: existing.equipment.clone(),
            primary_muscles: existing.primary_muscles.clone(),
            secondary_muscles: existing.secondary_muscles.clone(),
            instructions: existing.instructions.clone(),
            images: existing.images.clone(),
        }
    };

    let calories = req
        .calories_burned
        .unwrap_or_else(|| snapshot::calories_burned(snap.calories_per_hour, duration));

    repo::update_exercise_entry(
        &mut tx,
        entry_id,
        user_id,
        entry_date,
        duration,
        calories,
        notes.as_deref(),
        exercise_id,
        &snap,
    )
    .await?;
    if let Some(sets) = &req.sets {
        repo::replace_exercise_entry_sets(&mut tx, entry_id, sets).await?;
    }
    tx.commit().await?;

    exercise_entry_detail(db, user_id, entry_id).await
}

pub async fn delete_food_entry(db: &PgPool, user_id: Uuid, entry_id: Uuid) -> AppResult<()> {
    if !repo::delete_food_entry(db, entry_id, user_id).await? {
        return Err(AppError::not_found("food entry not found"));
    }
    Ok(())
}

pub async fn delete_food_entry_group(db: &PgPool, user_id: Uuid, group_id: Uuid) -> AppResult<()> {
    if !repo::delete_food_entry_group(db, group_id, user_id).await? {
        return Err(AppError::not_found("food entry group not found"));
    }
    Ok(())
}

pub async fn delete_exercise_entry(db: &PgPool, user_id: Uuid, entry_id: Uuid) -> AppResult<()> {
    if !repo::delete_exercise_entry(db, entry_id, user_id).await? {
        return Err(AppError::not_found("exercise entry not found"));
    }
    Ok(())
}

pub async fn delete_entries_in_range(
    db: &PgPool,
    user_id: Uuid,
    start: Date,
    end: Date,
    template_id: Option<Uuid>,
) -> AppResult<u64> {
    if end < start {
        return Err(AppError::validation("end date is before start date"));
    }
    let mut tx = db.begin().await?;
    let deleted = repo::delete_entries_in_range(&mut tx, user_id, start, end, template_id).await?;
    tx.commit().await?;
    info!(%user_id, deleted, "entries deleted in range");
    Ok(deleted)
}

/// One day of the diary: meal groups with their component entries, loose
/// food entries, and exercise entries with sets. Rendered purely from
/// snapshots; the catalog is not consulted.
pub async fn day_view(db: &PgPool, user_id: Uuid, date: Date) -> AppResult<DiaryDay> {
    let mut conn = db.acquire().await?;
    let groups = repo::list_food_entry_groups_by_date(&mut *conn, user_id, date).await?;
    let food_entries = repo::list_food_entries_by_date(&mut *conn, user_id, date).await?;
    let exercise_entries = repo::list_exercise_entries_by_date(&mut *conn, user_id, date).await?;

    let entry_ids: Vec<Uuid> = exercise_entries.iter().map(|e| e.id).collect();
    let set_rows = repo::get_sets_for_entries(&mut *conn, &entry_ids).await?;

    let (grouped, loose): (Vec<FoodEntry>, Vec<FoodEntry>) = food_entries
        .into_iter()
        .partition(|e| e.group_id.is_some());

    let meals = groups
        .into_iter()
        .map(|group| {
            let entries = grouped
                .iter()
                .filter(|e| e.group_id == Some(group.id))
                .cloned()
                .collect();
            MealLogged { group, entries }
        })
        .collect();

    let exercises = exercise_entries
        .into_iter()
        .map(|entry| {
            let sets = set_rows
                .iter()
                .filter(|s| s.entry_id == entry.id)
                .map(|s| s.set.clone())
                .collect();
            ExerciseEntryDetail { entry, sets }
        })
        .collect();

    Ok(DiaryDay {
        date,
        meals,
        foods: loose,
        exercises,
    })
}

async fn exercise_entry_detail(
    db: &PgPool,
    user_id: Uuid,
    entry_id: Uuid,
) -> AppResult<ExerciseEntryDetail> {
    let mut conn = db.acquire().await?;
    let entry: ExerciseEntry = repo::get_exercise_entry(&mut *conn, entry_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("exercise entry not found"))?;
    let sets = repo::get_exercise_entry_sets(&mut *conn, entry_id).await?;
    Ok(ExerciseEntryDetail { entry, sets })
}
