//! Read-only view of the food/exercise library. Rows are owned by the
//! upstream catalog/provider layer; this core only consumes them and watches
//! `updated_at` for drift.

pub mod repo;
pub mod types;

pub use types::{
    Exercise, Food, FoodVariant, Meal, MealComponentDetail, Nutrients, PresetExerciseDetail,
    SetSpec, WorkoutPreset,
};
