use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Full per-serving nutrient block. Stored on food variants, copied (scaled)
/// into diary entries as the immutable snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, FromRow)]
pub struct Nutrients {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub saturated_fat: f64,
    pub polyunsaturated_fat: f64,
    pub monounsaturated_fat: f64,
    pub trans_fat: f64,
    pub cholesterol: f64,
    pub sodium: f64,
    pub potassium: f64,
    pub dietary_fiber: f64,
    pub sugars: f64,
    pub vitamin_a: f64,
    pub vitamin_c: f64,
    pub calcium: f64,
    pub iron: f64,
}

impl Nutrients {
    /// Every field is linear in quantity, so one multiplier scales the block.
    pub fn scaled(&self, multiplier: f64) -> Nutrients {
        Nutrients {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
            saturated_fat: self.saturated_fat * multiplier,
            polyunsaturated_fat: self.polyunsaturated_fat * multiplier,
            monounsaturated_fat: self.monounsaturated_fat * multiplier,
            trans_fat: self.trans_fat * multiplier,
            cholesterol: self.cholesterol * multiplier,
            sodium: self.sodium * multiplier,
            potassium: self.potassium * multiplier,
            dietary_fiber: self.dietary_fiber * multiplier,
            sugars: self.sugars * multiplier,
            vitamin_a: self.vitamin_a * multiplier,
            vitamin_c: self.vitamin_c * multiplier,
            calcium: self.calcium * multiplier,
            iron: self.iron * multiplier,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Food {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub brand: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodVariant {
    pub id: Uuid,
    pub food_id: Uuid,
    pub serving_size: f64,
    pub serving_unit: String,
    pub is_default: bool,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub nutrients: Nutrients,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A meal component joined with the food name/brand and the variant's
/// serving facts, the shape the materializer and manual logging consume.
#[derive(Debug, Clone, FromRow)]
pub struct MealComponentDetail {
    pub meal_id: Uuid,
    pub food_id: Uuid,
    pub variant_id: Uuid,
    pub quantity: f64,
    pub unit: String,
    pub food_name: String,
    pub brand_name: Option<String>,
    pub serving_size: f64,
    pub serving_unit: String,
    #[sqlx(flatten)]
    pub nutrients: Nutrients,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutPreset {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// One exercise slot of a workout preset, joined with the exercise row.
/// Sets are attached separately, ordered by set_number.
#[derive(Debug, Clone)]
pub struct PresetExerciseDetail {
    pub preset_id: Uuid,
    pub exercise_id: Uuid,
    pub position: i32,
    pub notes: Option<String>,
    pub exercise: Exercise,
    pub sets: Vec<SetSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SetSpec {
    pub set_number: i32,
    pub set_type: Option<String>,
    pub reps: Option<i32>,
    pub weight: Option<f64>,
    pub duration: Option<i32>,
    pub rest_time: Option<i32>,
    pub notes: Option<String>,
}
