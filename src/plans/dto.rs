use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use crate::catalog::SetSpec;

use super::types::{AssignmentRow, PlanKind, Template};

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateSpec {
    pub plan_kind: PlanKind,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub assignments: Vec<AssignmentSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentSpec {
    /// Present when editing an existing assignment in place.
    pub id: Option<Uuid>,
    pub day_of_week: i32,
    pub meal_type: Option<String>,
    pub food_id: Option<Uuid>,
    pub variant_id: Option<Uuid>,
    pub meal_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
    pub preset_id: Option<Uuid>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    #[serde(default)]
    pub sets: Vec<SetSpec>,
}

impl AssignmentSpec {
    pub fn target_count(&self) -> usize {
        [
            self.food_id.is_some(),
            self.meal_id.is_some(),
            self.exercise_id.is_some(),
            self.preset_id.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

#[derive(Debug, Serialize)]
pub struct AssignmentDetail {
    #[serde(flatten)]
    pub row: AssignmentRow,
    pub sets: Vec<SetSpec>,
}

#[derive(Debug, Serialize)]
pub struct TemplateDetail {
    #[serde(flatten)]
    pub template: Template,
    pub assignments: Vec<AssignmentDetail>,
}

#[derive(Debug, Serialize)]
pub struct MaterializeResponse {
    pub created: u64,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    /// The caller's local calendar day; defaults to the UTC day.
    pub date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct ActivePlanQuery {
    pub kind: PlanKind,
    pub date: Option<Date>,
}
