use crate::catalog::{Exercise, FoodVariant, MealComponentDetail, Nutrients, SetSpec};
use crate::error::AppResult;
use crate::plans::scaling;

/// Minutes assumed for an exercise whose sets carry no explicit durations.
pub const DEFAULT_DURATION_MINUTES: f64 = 30.0;

/// Point-in-time copy of a food's display and nutrition facts, embedded into
/// a diary entry at creation (or explicit re-snapshot) and never re-read from
/// the catalog afterwards. Nutrient values are scaled to the logged quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodSnapshot {
    pub food_name: String,
    pub brand_name: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    pub nutrients: Nutrients,
}

pub fn food_snapshot(
    food_name: &str,
    brand_name: Option<&str>,
    variant: &FoodVariant,
    quantity: f64,
    unit: &str,
) -> AppResult<FoodSnapshot> {
    let portions = scaling::portions(quantity, unit, variant.serving_size, &variant.serving_unit)?;
    Ok(FoodSnapshot {
        food_name: food_name.to_string(),
        brand_name: brand_name.map(str::to_string),
        serving_size: variant.serving_size,
        serving_unit: variant.serving_unit.clone(),
        nutrients: variant.nutrients.scaled(portions),
    })
}

/// Snapshot for one meal component at its already-scaled logged quantity.
pub fn component_snapshot(
    component: &MealComponentDetail,
    scaled_quantity: f64,
) -> AppResult<FoodSnapshot> {
    let portions = scaling::portions(
        scaled_quantity,
        &component.unit,
        component.serving_size,
        &component.serving_unit,
    )?;
    Ok(FoodSnapshot {
        food_name: component.food_name.clone(),
        brand_name: component.brand_name.clone(),
        serving_size: component.serving_size,
        serving_unit: component.serving_unit.clone(),
        nutrients: component.nutrients.scaled(portions),
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSnapshot {
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
}

pub fn exercise_snapshot(exercise: &Exercise) -> ExerciseSnapshot {
    ExerciseSnapshot {
        exercise_name: exercise.name.clone(),
        category: exercise.category.clone(),
        calories_per_hour: exercise.calories_per_hour,
        force: exercise.force.clone(),
        level: exercise.level.clone(),
        mechanic: exercise.mechanic.clone(),
        equipment: exercise.equipment.clone(),
        primary_muscles: exercise.primary_muscles.clone(),
        secondary_muscles: exercise.secondary_muscles.clone(),
        instructions: exercise.instructions.clone(),
        images: exercise.images.clone(),
    }
}

/// Planned duration of a set list: the sum of per-set durations, or the
/// default when no set specifies one.
pub fn planned_duration_minutes(sets: &[SetSpec]) -> f64 {
    let total: i32 = sets.iter().filter_map(|s| s.duration).sum();
    if total > 0 {
        f64::from(total)
    } else {
        DEFAULT_DURATION_MINUTES
    }
}

pub fn calories_burned(calories_per_hour: f64, duration_minutes: f64) -> f64 {
    calories_per_hour / 60.0 * duration_minutes
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    fn variant(serving_size: f64, serving_unit: &str, calories: f64) -> FoodVariant {
        FoodVariant {
            id: Uuid::new_v4(),
            food_id: Uuid::new_v4(),
            serving_size,
            serving_unit: serving_unit.into(),
            is_default: true,
            nutrients: Nutrients {
                calories,
                protein: calories / 10.0,
                ..Nutrients::default()
            },
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn snapshot_scales_nutrients_to_logged_quantity() {
        let v = variant(100.0, "g", 100.0);
        let snap = food_snapshot("Oats", Some("Acme"), &v, 150.0, "g").unwrap();
        assert_eq!(snap.nutrients.calories, 150.0);
        assert_eq!(snap.nutrients.protein, 15.0);
        assert_eq!(snap.serving_size, 100.0);
        assert_eq!(snap.food_name, "Oats");
    }

    #[test]
    fn snapshot_rejects_zero_serving_size() {
        let v = variant(0.0, "g", 100.0);
        assert!(food_snapshot("Oats", None, &v, 100.0, "g").is_err());
    }

    #[test]
    fn component_snapshot_scales_per_serving_values() {
        // 100-calorie component scaled by a 1.5 meal multiplier.
        let component = MealComponentDetail {
            meal_id: Uuid::new_v4(),
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
        };
        let snap = component_snapshot(&component, component.quantity * 1.5).unwrap();
        assert_eq!(snap.nutrients.calories, 150.0);
    }

    #[test]
    fn duration_defaults_when_sets_have_none() {
        let sets = vec![SetSpec {
            set_number: 1,
            set_type: None,
            reps: Some(10),
            weight: Some(50.0),
            duration: None,
            rest_time: None,
            notes: None,
        }];
        assert_eq!(planned_duration_minutes(&sets), DEFAULT_DURATION_MINUTES);
        assert_eq!(planned_duration_minutes(&[]), DEFAULT_DURATION_MINUTES);
    }

    #[test]
    fn duration_sums_explicit_set_durations() {
        let set = |duration| SetSpec {
            set_number: 1,
            set_type: None,
            reps: None,
            weight: None,
            duration: Some(duration),
            rest_time: None,
            notes: None,
        };
        assert_eq!(planned_duration_minutes(&[set(10), set(15)]), 25.0);
    }

    #[test]
    fn calories_follow_duration() {
        assert_eq!(calories_burned(600.0, 30.0), 300.0);
    }
}
