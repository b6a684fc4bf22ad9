use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::catalog::SetSpec;

use super::repo::{ExerciseEntry, FoodEntry, FoodEntryGroup};

#[derive(Debug, Deserialize)]
pub struct LogFoodRequest {
    pub food_id: Uuid,
    pub variant_id: Uuid,
    pub meal_type: String,
    pub entry_date: Date,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Deserialize)]
pub struct LogMealRequest {
    pub meal_id: Uuid,
    pub meal_type: String,
    pub entry_date: Date,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogExerciseRequest {
    pub exercise_id: Uuid,
    pub entry_date: Date,
    pub duration_minutes: Option<f64>,
    pub calories_burned: Option<f64>,
    pub notes: Option<String>,
    #[serde(default)]
    pub sets: Vec<SetSpec>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFoodEntryRequest {
    pub meal_type: Option<String>,
    pub entry_date: Option<Date>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub food_id: Option<Uuid>,
    pub variant_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExerciseEntryRequest {
    pub entry_date: Option<Date>,
    pub duration_minutes: Option<f64>,
    pub calories_burned: Option<f64>,
    pub notes: Option<String>,
    pub exercise_id: Option<Uuid>,
    /// When present, replaces the stored set list wholesale.
    pub sets: Option<Vec<SetSpec>>,
}

#[derive(Debug, Deserialize)]
pub struct RangeDeleteQuery {
    pub start: Date,
    pub end: Date,
    pub template_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Date,
}

#[derive(Debug, Serialize)]
pub struct MealLogged {
    pub group: FoodEntryGroup,
    pub entries: Vec<FoodEntry>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseEntryDetail {
    #[serde(flatten)]
    pub entry: ExerciseEntry,
    pub sets: Vec<SetSpec>,
}

#[derive(Debug, Serialize)]
pub struct DiaryDay {
    pub date: Date,
    pub meals: Vec<MealLogged>,
    pub foods: Vec<FoodEntry>,
    pub exercises: Vec<ExerciseEntryDetail>,
}
