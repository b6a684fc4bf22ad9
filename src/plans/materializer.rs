use std::collections::{HashMap, HashSet};

use sqlx::{PgConnection, PgPool};
use time::Date;
use tracing::info;
use uuid::Uuid;

use crate::catalog::{
    repo as catalog_repo, Exercise, Food, FoodVariant, Meal, MealComponentDetail,
    PresetExerciseDetail, WorkoutPreset,
};
use crate::diary::repo::{NewEntryGroup, NewExerciseEntry, NewFoodEntry};
use crate::diary::snapshot;
use crate::error::{AppError, AppResult};

use super::repo as plans_repo;
use super::resolver;
use super::scaling;
use super::types::{Assignment, AssignmentTarget, PlanKind, Template};

/// Identity of one generated entry within a template run. Entries created by
/// other means (manual logging) never carry these keys, so they are never
/// disturbed even when they coincide on date and meal type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DedupKey {
    Food {
        food_id: Uuid,
        variant_id: Uuid,
        meal_type: String,
        entry_date: Date,
    },
    Meal {
        meal_id: Uuid,
        meal_type: String,
        entry_date: Date,
    },
    Exercise {
        assignment_id: Uuid,
        exercise_id: Uuid,
        entry_date: Date,
    },
}

/// Everything a staging pass reads, pre-loaded in batches.
#[derive(Debug, Default)]
pub struct MaterializeSources {
    pub foods: HashMap<Uuid, Food>,
    pub variants: HashMap<Uuid, FoodVariant>,
    pub meals: HashMap<Uuid, Meal>,
    pub meal_components: HashMap<Uuid, Vec<MealComponentDetail>>,
    pub exercises: HashMap<Uuid, Exercise>,
    pub presets: HashMap<Uuid, WorkoutPreset>,
    pub preset_exercises: HashMap<Uuid, Vec<PresetExerciseDetail>>,
}

#[derive(Debug)]
pub enum StagedEntry {
    Food(NewFoodEntry),
    MealGroup {
        group: NewEntryGroup,
        children: Vec<NewFoodEntry>,
    },
    Exercise(NewExerciseEntry),
}

/// Expand a template into the entries that do not exist yet. Pure: reads the
/// pre-loaded sources and the pre-loaded dedup keys, writes nothing.
///
/// A referenced source definition missing from `sources` aborts the whole
/// run rather than silently skipping the assignment.
pub fn stage_entries(
    template: &Template,
    assignments: &[Assignment],
    sources: &MaterializeSources,
    request_date: Date,
    existing: &HashSet<DedupKey>,
) -> AppResult<Vec<StagedEntry>> {
    let mut seen = existing.clone();
    let mut staged = Vec::new();

    for (entry_date, assignment) in resolver::walk(template, assignments, request_date) {
        match &assignment.target {
            AssignmentTarget::Food { food_id, variant_id } => {
                let meal_type = required_meal_type(assignment)?;
                let key = DedupKey::Food {
                    food_id: *food_id,
                    variant_id: *variant_id,
                    meal_type: meal_type.clone(),
                    entry_date,
                };
                if seen.contains(&key) {
                    continue;
                }
                let food = sources.foods.get(food_id).ok_or_else(|| {
                    AppError::not_found(format!("source definition not found: food {food_id}"))
                })?;
                let variant = sources.variants.get(variant_id).ok_or_else(|| {
                    AppError::not_found(format!(
                        "source definition not found: food variant {variant_id}"
                    ))
                })?;
                let quantity = assignment.quantity.unwrap_or(variant.serving_size);
                let unit = assignment
                    .unit
                    .clone()
                    .unwrap_or_else(|| variant.serving_unit.clone());
                let snap =
                    snapshot::food_snapshot(&food.name, food.brand.as_deref(), variant, quantity, &unit)?;
                staged.push(StagedEntry::Food(NewFoodEntry {
                    food_id: *food_id,
                    variant_id: *variant_id,
                    group_id: None,
                    template_id: Some(template.id),
                    assignment_id: Some(assignment.id),
                    meal_type,
                    entry_date,
                    quantity,
                    unit,
                    snapshot: snap,
                }));
                seen.insert(key);
            }
            AssignmentTarget::Meal { meal_id } => {
                let meal_type = required_meal_type(assignment)?;
                let key = DedupKey::Meal {
                    meal_id: *meal_id,
                    meal_type: meal_type.clone(),
                    entry_date,
                };
                if seen.contains(&key) {
                    continue;
                }
                let meal = sources.meals.get(meal_id).ok_or_else(|| {
                    AppError::not_found(format!("source definition not found: meal {meal_id}"))
                })?;
                let components = sources
                    .meal_components
                    .get(meal_id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                if components.is_empty() {
                    continue;
                }
                let quantity = assignment.quantity.unwrap_or(1.0);
                let unit = assignment
                    .unit
                    .clone()
                    .unwrap_or_else(|| scaling::SERVING_UNIT.to_string());
                let multiplier =
                    scaling::portions(quantity, &unit, meal.serving_size, &meal.serving_unit)?;

                let mut children = Vec::with_capacity(components.len());
                for component in components {
                    let scaled_quantity = component.quantity * multiplier;
                    let snap = snapshot::component_snapshot(component, scaled_quantity)?;
                    children.push(NewFoodEntry {
                        food_id: component.food_id,
                        variant_id: component.variant_id,
                        group_id: None,
                        template_id: Some(template.id),
                        assignment_id: Some(assignment.id),
                        meal_type: meal_type.clone(),
                        entry_date,
                        quantity: scaled_quantity,
                        unit: component.unit.clone(),
                        snapshot: snap,
                    });
                }
                staged.push(StagedEntry::MealGroup {
                    group: NewEntryGroup {
                        meal_id: *meal_id,
                        meal_name: meal.name.clone(),
                        meal_type,
                        entry_date,
                        quantity,
                        unit,
                        template_id: Some(template.id),
                        assignment_id: Some(assignment.id),
                    },
                    children,
                });
                seen.insert(key);
            }
            AssignmentTarget::Exercise { exercise_id } => {
                let key = DedupKey::Exercise {
                    assignment_id: assignment.id,
                    exercise_id: *exercise_id,
                    entry_date,
                };
                if seen.contains(&key) {
                    continue;
                }
                let exercise = sources.exercises.get(exercise_id).ok_or_else(|| {
                    AppError::not_found(format!(
                        "source definition not found: exercise {exercise_id}"
                    ))
                })?;
                let duration = snapshot::planned_duration_minutes(&assignment.sets);
                staged.push(StagedEntry::Exercise(NewExerciseEntry {
                    exercise_id: *exercise_id,
                    template_id: Some(template.id),
                    assignment_id: Some(assignment.id),
                    entry_date,
                    duration_minutes: duration,
                    calories_burned: snapshot::calories_burned(exercise.calories_per_hour, duration),
                    notes: None,
                    snapshot: snapshot::exercise_snapshot(exercise),
                    sets: assignment.sets.clone(),
                }));
                seen.insert(key);
            }
            AssignmentTarget::Preset { preset_id } => {
                if !sources.presets.contains_key(preset_id) {
                    return Err(AppError::not_found(format!(
                        "source definition not found: workout preset {preset_id}"
                    )));
                }
                let slots = sources
                    .preset_exercises
                    .get(preset_id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let multiplier = match assignment.quantity {
                    Some(quantity) => {
                        let unit = assignment.unit.as_deref().unwrap_or(scaling::SERVING_UNIT);
                        scaling::portions(quantity, unit, 1.0, scaling::SERVING_UNIT)?
                    }
                    None => 1.0,
                };
                for slot in slots {
                    let key = DedupKey::Exercise {
                        assignment_id: assignment.id,
                        exercise_id: slot.exercise_id,
                        entry_date,
                    };
                    if seen.contains(&key) {
                        continue;
                    }
                    let duration = snapshot::planned_duration_minutes(&slot.sets) * multiplier;
                    staged.push(StagedEntry::Exercise(NewExerciseEntry {
                        exercise_id: slot.exercise_id,
                        template_id: Some(template.id),
                        assignment_id: Some(assignment.id),
                        entry_date,
                        duration_minutes: duration,
                        calories_burned: snapshot::calories_burned(
                            slot.exercise.calories_per_hour,
                            duration,
                        ),
                        notes: slot.notes.clone(),
                        snapshot: snapshot::exercise_snapshot(&slot.exercise),
                        sets: slot.sets.clone(),
                    }));
                    seen.insert(key);
                }
            }
        }
    }
    Ok(staged)
}

fn required_meal_type(assignment: &Assignment) -> AppResult<String> {
    assignment
        .meal_type
        .clone()
        .ok_or_else(|| AppError::validation("meal plan assignment is missing a meal type"))
}

/// Expand a template over its effective window, creating only the entries
/// that do not already exist. Safe to call repeatedly; everything happens in
/// one transaction that either commits whole or not at all.
pub async fn materialize(
    db: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
    request_date: Date,
) -> AppResult<u64> {
    let mut tx = db.begin().await?;

    let template = plans_repo::get_template(&mut *tx, template_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("plan template not found"))?;
    let assignments = plans_repo::get_assignments(&mut *tx, template_id).await?;

    let Some((window_start, window_end)) = resolver::effective_window(&template, request_date)
    else {
        tx.commit().await?;
        return Ok(0);
    };
    if assignments.is_empty() {
        tx.commit().await?;
        return Ok(0);
    }

    let sources = load_sources(&mut tx, user_id, &assignments).await?;
    let existing = load_existing_keys(
        &mut tx,
        user_id,
        template_id,
        template.plan_kind,
        window_start,
        window_end,
    )
    .await?;

    let staged = stage_entries(&template, &assignments, &sources, request_date, &existing)?;
    let created = insert_staged(&mut tx, user_id, staged).await?;

    tx.commit().await?;
    info!(%template_id, %user_id, created, "materialized plan template");
    Ok(created)
}

async fn load_sources(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: Uuid,
    assignments: &[Assignment],
) -> AppResult<MaterializeSources> {
    let mut food_ids = Vec::new();
    let mut variant_ids = Vec::new();
    let mut meal_ids = Vec::new();
    let mut exercise_ids = Vec::new();
    let mut preset_ids = Vec::new();

    for assignment in assignments {
        match &assignment.target {
            AssignmentTarget::Food { food_id, variant_id } => {
                food_ids.push(*food_id);
                variant_ids.push(*variant_id);
            }
            AssignmentTarget::Meal { meal_id } => meal_ids.push(*meal_id),
            AssignmentTarget::Exercise { exercise_id } => exercise_ids.push(*exercise_id),
            AssignmentTarget::Preset { preset_id } => preset_ids.push(*preset_id),
        }
    }

    let mut sources = MaterializeSources::default();

    if !food_ids.is_empty() {
        let foods = catalog_repo::get_foods_by_ids(&mut **tx, &food_ids, user_id).await?;
        sources.foods = foods.into_iter().map(|f| (f.id, f)).collect();
        let variants = catalog_repo::get_food_variants_by_ids(&mut **tx, &variant_ids).await?;
        sources.variants = variants.into_iter().map(|v| (v.id, v)).collect();
    }
    if !meal_ids.is_empty() {
        let meals = catalog_repo::get_meals_by_ids(&mut **tx, &meal_ids, user_id).await?;
        sources.meals = meals.into_iter().map(|m| (m.id, m)).collect();
        let components = catalog_repo::get_meal_components(&mut **tx, &meal_ids).await?;
        for component in components {
            sources
                .meal_components
                .entry(component.meal_id)
                .or_default()
                .push(component);
        }
    }
    if !exercise_ids.is_empty() {
        let exercises = catalog_repo::get_exercises_by_ids(&mut **tx, &exercise_ids, user_id).await?;
        sources.exercises = exercises.into_iter().map(|e| (e.id, e)).collect();
    }
    if !preset_ids.is_empty() {
        let presets = catalog_repo::get_workout_presets_by_ids(&mut **tx, &preset_ids, user_id).await?;
        sources.presets = presets.into_iter().map(|p| (p.id, p)).collect();
        let slots = catalog_repo::get_preset_exercises(&mut **tx, &preset_ids, user_id).await?;
        for slot in slots {
            sources
                .preset_exercises
                .entry(slot.preset_id)
                .or_default()
                .push(slot);
        }
    }

    Ok(sources)
}

async fn load_existing_keys(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: Uuid,
    template_id: Uuid,
    plan_kind: PlanKind,
    window_start: Date,
    window_end: Date,
) -> AppResult<HashSet<DedupKey>> {
    let mut keys = HashSet::new();
    match plan_kind {
        PlanKind::Meal => {
            let singles = sqlx::query_as::<_, (Uuid, Uuid, String, Date)>(
                r#"
                SELECT food_id, variant_id, meal_type, entry_date
                FROM food_entries
                WHERE user_id = $1 AND template_id = $2 AND group_id IS NULL
                  AND food_id IS NOT NULL AND variant_id IS NOT NULL
                  AND entry_date BETWEEN $3 AND $4
                "#,
            )
            .bind(user_id)
            .bind(template_id)
            .bind(window_start)
            .bind(window_end)
            .fetch_all(&mut **tx)
            .await?;
            for (food_id, variant_id, meal_type, entry_date) in singles {
                keys.insert(DedupKey::Food {
                    food_id,
                    variant_id,
                    meal_type,
                    entry_date,
                });
            }

            let groups = sqlx::query_as::<_, (Uuid, String, Date)>(
                r#"
                SELECT meal_id, meal_type, entry_date
                FROM food_entry_groups
                WHERE user_id = $1 AND template_id = $2 AND meal_id IS NOT NULL
                  AND entry_date BETWEEN $3 AND $4
                "#,
            )
            .bind(user_id)
            .bind(template_id)
            .bind(window_start)
            .bind(window_end)
            .fetch_all(&mut **tx)
            .await?;
            for (meal_id, meal_type, entry_date) in groups {
                keys.insert(DedupKey::Meal {
                    meal_id,
                    meal_type,
                    entry_date,
                });
            }
        }
        PlanKind::Workout => {
            let rows = sqlx::query_as::<_, (Uuid, Uuid, Date)>(
                r#"
                SELECT assignment_id, exercise_id, entry_date
                FROM exercise_entries
                WHERE user_id = $1 AND template_id = $2
                  AND assignment_id IS NOT NULL AND exercise_id IS NOT NULL
                  AND entry_date BETWEEN $3 AND $4
                "#,
            )
            .bind(user_id)
            .bind(template_id)
            .bind(window_start)
            .bind(window_end)
            .fetch_all(&mut **tx)
            .await?;
            for (assignment_id, exercise_id, entry_date) in rows {
                keys.insert(DedupKey::Exercise {
                    assignment_id,
                    exercise_id,
                    entry_date,
                });
            }
        }
    }
    Ok(keys)
}

/// Write the staged entries. Unique dedup indexes turn entries inserted by a
/// concurrent run into no-ops instead of errors, so the count reflects what
/// this run actually created.
async fn insert_staged(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: Uuid,
    staged: Vec<StagedEntry>,
) -> AppResult<u64> {
    let conn: &mut PgConnection = &mut *tx;
    let mut created = 0u64;
    let mut food_rows = Vec::new();

    for entry in staged {
        match entry {
            StagedEntry::Food(row) => food_rows.push(row),
            StagedEntry::MealGroup { group, children } => {
                let Some(group_id) =
                    crate::diary::repo::insert_food_entry_group(&mut *conn, user_id, &group).await?
                else {
                    // A concurrent run inserted this group first; its children
                    // exist too, so the whole unit is a no-op.
                    continue;
                };
                for mut child in children {
                    child.group_id = Some(group_id);
                    food_rows.push(child);
                }
            }
            StagedEntry::Exercise(row) => {
                if crate::diary::repo::insert_exercise_entry(&mut *conn, user_id, &row)
                    .await?
                    .is_some()
                {
                    created += 1;
                }
            }
        }
    }

    if !food_rows.is_empty() {
        created += crate::diary::repo::insert_food_entries(&mut *conn, user_id, &food_rows).await?;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use time::OffsetDateTime;

    use super::*;
    use crate::catalog::Nutrients;

    fn template(kind: PlanKind, start: Date, end: Date) -> Template {
        Template {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_kind: kind,
            name: "test plan".into(),
            description: String::new(),
            start_date: start,
            end_date: Some(end),
            is_active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn food_sources(food_id: Uuid, variant_id: Uuid, calories: f64) -> MaterializeSources {
        let mut sources = MaterializeSources::default();
        sources.foods.insert(
            food_id,
            Food {
                id: food_id,
                user_id: None,
                name: "Oats".into(),
                brand: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
                updated_at: OffsetDateTime::UNIX_EPOCH,
            },
        );
        sources.variants.insert(
            variant_id,
            FoodVariant {
                id: variant_id,
                food_id,
                serving_size: 100.0,
                serving_unit: "g".into(),
                is_default: true,
                nutrients: Nutrients {
                    calories,
                    ..Nutrients::default()
                },
                created_at: OffsetDateTime::UNIX_EPOCH,
                updated_at: OffsetDateTime::UNIX_EPOCH,
            },
        );
        sources
    }

    fn food_assignment(day_of_week: i32, food_id: Uuid, variant_id: Uuid) -> Assignment {
        Assignment {
            id: Uuid::new_v4(),
            day_of_week,
            meal_type: Some("breakfast".into()),
            quantity: Some(100.0),
            unit: Some("g".into()),
            target: AssignmentTarget::Food {
                food_id,
                variant_id,
            },
            sets: Vec::new(),
        }
    }

    fn staged_keys(staged: &[StagedEntry]) -> HashSet<DedupKey> {
        let mut keys = HashSet::new();
        for entry in staged {
            match entry {
                StagedEntry::Food(row) => {
                    keys.insert(DedupKey::Food {
                        food_id: row.food_id,
                        variant_id: row.variant_id,
                        meal_type: row.meal_type.clone(),
                        entry_date: row.entry_date,
                    });
                }
                StagedEntry::MealGroup { group, .. } => {
                    keys.insert(DedupKey::Meal {
                        meal_id: group.meal_id,
                        meal_type: group.meal_type.clone(),
                        entry_date: group.entry_date,
                    });
                }
                StagedEntry::Exercise(row) => {
                    keys.insert(DedupKey::Exercise {
                        assignment_id: row.assignment_id.unwrap(),
                        exercise_id: row.exercise_id,
                        entry_date: row.entry_date,
                    });
                }
            }
        }
        keys
    }

    #[test]
    fn monday_only_assignment_over_two_weeks_creates_two_entries() {
        let t = template(PlanKind::Meal, date!(2025 - 06 - 02), date!(2025 - 06 - 15));
        let food_id = Uuid::new_v4();
        let variant_id = Uuid::new_v4();
        let assignments = vec![food_assignment(1, food_id, variant_id)];
        let sources = food_sources(food_id, variant_id, 100.0);

        let staged = stage_entries(
            &t,
            &assignments,
            &sources,
            date!(2025 - 06 - 02),
            &HashSet::new(),
        )
        .unwrap();
        assert_eq!(staged.len(), 2);
    }

    #[test]
    fn staging_is_idempotent_against_existing_keys() {
        let t = template(PlanKind::Meal, date!(2025 - 06 - 02), date!(2025 - 06 - 15));
        let food_id = Uuid::new_v4();
        let variant_id = Uuid::new_v4();
        let assignments = vec![food_assignment(1, food_id, variant_id)];
        let sources = food_sources(food_id, variant_id, 100.0);

        let first = stage_entries(
            &t,
            &assignments,
            &sources,
            date!(2025 - 06 - 02),
            &HashSet::new(),
        )
        .unwrap();
        let existing = staged_keys(&first);
        let second = stage_entries(
            &t,
            &assignments,
            &sources,
            date!(2025 - 06 - 02),
            &existing,
        )
        .unwrap();
        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
    }

    #[test]
    fn meal_assignment_scales_component_snapshots() {
        // Meal defined as 2 servings with one 100-calorie component; logged
        // as 3 servings, the component entry carries 150 calories.
        let t = template(PlanKind::Meal, date!(2025 - 06 - 02), date!(2025 - 06 - 02));
        let meal_id = Uuid::new_v4();
        let assignment = Assignment {
            id: Uuid::new_v4(),
            day_of_week: 1,
            meal_type: Some("dinner".into()),
            quantity: Some(3.0),
            unit: Some("serving".into()),
            target: AssignmentTarget::Meal { meal_id },
            sets: Vec::new(),
        };

        let mut sources = MaterializeSources::default();
        sources.meals.insert(
            meal_id,
            Meal {
                id: meal_id,
                user_id: Uuid::new_v4(),
                name: "Bulk bowl".into(),
                description: None,
                serving_size: 2.0,
                serving_unit: "serving".into(),
                created_at: OffsetDateTime::UNIX_EPOCH,
                updated_at: OffsetDateTime::UNIX_EPOCH,
            },
        );
        sources.meal_components.insert(
            meal_id,
            vec![MealComponentDetail {
                meal_id,
                food_id: Uuid::new_v4(),
                variant_id: Uuid::new_v4(),
                quantity: 100.0,
                unit: "g".into(),
                food_name: "Rice".into(),
                brand_name: None,
                serving_size: 100.0,
                serving_unit: "g".into(),
                nutrients: Nutrients {
                    calories: 100.0,
                    ..Nutrients::default()
                },
            }],
        );

        let staged = stage_entries(
            &t,
            &[assignment],
            &sources,
            date!(2025 - 06 - 02),
            &HashSet::new(),
        )
        .unwrap();
        assert_eq!(staged.len(), 1);
        let StagedEntry::MealGroup { group, children } = &staged[0] else {
            panic!("expected a meal group");
        };
        assert_eq!(group.meal_name, "Bulk bowl");
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].quantity, 150.0);
        assert_eq!(children[0].snapshot.nutrients.calories, 150.0);
    }

    #[test]
    fn missing_meal_definition_aborts_the_run() {
        let t = template(PlanKind::Meal, date!(2025 - 06 - 02), date!(2025 - 06 - 08));
        let assignment = Assignment {
            id: Uuid::new_v4(),
            day_of_week: 1,
            meal_type: Some("lunch".into()),
            quantity: None,
            unit: None,
            target: AssignmentTarget::Meal {
                meal_id: Uuid::new_v4(),
            },
            sets: Vec::new(),
        };
        let err = stage_entries(
            &t,
            &[assignment],
            &MaterializeSources::default(),
            date!(2025 - 06 - 02),
            &HashSet::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn exercise_assignment_computes_duration_and_calories() {
        let t = template(
            PlanKind::Workout,
            date!(2025 - 06 - 02),
            date!(2025 - 06 - 02),
        );
        let exercise_id = Uuid::new_v4();
        let assignment = Assignment {
            id: Uuid::new_v4(),
            day_of_week: 1,
            meal_type: None,
            quantity: None,
            unit: None,
            target: AssignmentTarget::Exercise { exercise_id },
            sets: Vec::new(),
        };
        let mut sources = MaterializeSources::default();
        sources.exercises.insert(
            exercise_id,
            Exercise {
                id: exercise_id,
                user_id: None,
                name: "Row".into(),
                category: Some("cardio".into()),
                calories_per_hour: 600.0,
                force: None,
                level: None,
                mechanic: None,
                equipment: None,
                primary_muscles: None,
                secondary_muscles: None,
                instructions: None,
                images: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
                updated_at: OffsetDateTime::UNIX_EPOCH,
            },
        );

        let staged = stage_entries(
            &t,
            &[assignment],
            &sources,
            date!(2025 - 06 - 02),
            &HashSet::new(),
        )
        .unwrap();
        let StagedEntry::Exercise(row) = &staged[0] else {
            panic!("expected an exercise entry");
        };
        assert_eq!(row.duration_minutes, 30.0);
        assert_eq!(row.calories_burned, 300.0);
        assert_eq!(row.snapshot.exercise_name, "Row");
    }
}
