use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::catalog::SetSpec;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PlanKind {
    Meal,
    Workout,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Template {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_kind: PlanKind,
    pub name: String,
    pub description: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Raw assignment row; the polymorphic target is four nullable columns with
/// a storage CHECK that exactly one is set.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssignmentRow {
    pub id: Uuid,
    pub template_id: Uuid,
    pub day_of_week: i32,
    pub meal_type: Option<String>,
    pub food_id: Option<Uuid>,
    pub variant_id: Option<Uuid>,
    pub meal_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub preset_id: Option<Uuid>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentTarget {
    Food { food_id: Uuid, variant_id: Uuid },
    Meal { meal_id: Uuid },
    Exercise { exercise_id: Uuid },
    Preset { preset_id: Uuid },
}

#[derive(Debug, Clone)]
pub struct Assignment {
    pub id: Uuid,
    pub day_of_week: i32,
    pub meal_type: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub target: AssignmentTarget,
    pub sets: Vec<SetSpec>,
}

impl AssignmentRow {
    pub fn into_assignment(self, sets: Vec<SetSpec>) -> AppResult<Assignment> {
        let target = match (self.food_id, self.meal_id, self.exercise_id, self.preset_id) {
            (Some(food_id), None, None, None) => {
                let variant_id = self.variant_id.ok_or_else(|| {
                    AppError::validation("food assignment is missing a variant")
                })?;
                AssignmentTarget::Food {
                    food_id,
                    variant_id,
                }
            }
            (None, Some(meal_id), None, None) => AssignmentTarget::Meal { meal_id },
            (None, None, Some(exercise_id), None) => AssignmentTarget::Exercise { exercise_id },
            (None, None, None, Some(preset_id)) => AssignmentTarget::Preset { preset_id },
            _ => {
                return Err(AppError::validation(
                    "assignment must reference exactly one of food, meal, exercise, or preset",
                ))
            }
        };
        Ok(Assignment {
            id: self.id,
            day_of_week: self.day_of_week,
            meal_type: self.meal_type.map(|m| m.to_lowercase()),
            quantity: self.quantity,
            unit: self.unit,
            target,
            sets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(food: bool, meal: bool) -> AssignmentRow {
        AssignmentRow {
            id: Uuid::new_v4(),
            template_id: Uuid::new_v4(),
            day_of_week: 1,
            meal_type: Some("Lunch".into()),
            food_id: food.then(Uuid::new_v4),
            variant_id: food.then(Uuid::new_v4),
            meal_id: meal.then(Uuid::new_v4),
            exercise_id: None,
            preset_id: None,
            quantity: Some(1.0),
            unit: Some("serving".into()),
        }
    }

    #[test]
    fn food_row_becomes_food_target() {
        let a = row(true, false).into_assignment(Vec::new()).unwrap();
        assert!(matches!(a.target, AssignmentTarget::Food { .. }));
        assert_eq!(a.meal_type.as_deref(), Some("lunch"));
    }

    #[test]
    fn two_targets_are_rejected() {
        let err = row(true, true).into_assignment(Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn no_target_is_rejected() {
        let err = row(false, false).into_assignment(Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn food_without_variant_is_rejected() {
        let mut r = row(true, false);
        r.variant_id = None;
        assert!(r.into_assignment(Vec::new()).is_err());
    }
}
