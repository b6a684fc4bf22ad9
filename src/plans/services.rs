use sqlx::{PgConnection, PgPool};
use time::Date;
use tracing::info;
use uuid::Uuid;

use crate::catalog::repo as catalog_repo;
use crate::diary::repo as diary_repo;
use crate::error::{AppError, AppResult};

use super::dto::{AssignmentDetail, AssignmentSpec, TemplateDetail, TemplateSpec};
use super::materializer;
use super::repo;
use super::types::{PlanKind, Template};

/// Shape checks applied before any write.
pub fn validate_spec(spec: &TemplateSpec) -> AppResult<()> {
    if let Some(end) = spec.end_date {
        if end < spec.start_date {
            return Err(AppError::validation("end date is before start date"));
        }
    }
    for assignment in &spec.assignments {
        if !(0..=6).contains(&assignment.day_of_week) {
            return Err(AppError::validation("day of week must be between 0 and 6"));
        }
        if assignment.target_count() != 1 {
            return Err(AppError::validation(
                "assignment must reference exactly one of food, meal, exercise, or preset",
            ));
        }
        if let Some(quantity) = assignment.quantity {
            if !quantity.is_finite() || quantity <= 0.0 {
                return Err(AppError::validation("quantity must be positive"));
            }
        }
        match spec.plan_kind {
            PlanKind::Meal => {
                if assignment.exercise_id.is_some() || assignment.preset_id.is_some() {
                    return Err(AppError::validation(
                        "meal plan assignments cannot reference exercises",
                    ));
                }
                if assignment.food_id.is_some() && assignment.variant_id.is_none() {
                    return Err(AppError::validation("food assignment is missing a variant"));
                }
                if assignment
                    .meal_type
                    .as_deref()
                    .map(str::trim)
                    .unwrap_or_default()
                    .is_empty()
                {
                    return Err(AppError::validation(
                        "meal plan assignment is missing a meal type",
                    ));
                }
            }
            PlanKind::Workout => {
                if assignment.food_id.is_some() || assignment.meal_id.is_some() {
                    return Err(AppError::validation(
                        "workout plan assignments cannot reference foods or meals",
                    ));
                }
                if !assignment.sets.is_empty() && assignment.exercise_id.is_none() {
                    return Err(AppError::validation(
                        "sets can only be attached to a direct exercise assignment",
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Every referenced catalog item must exist (and be visible to the user)
/// before the template is written.
async fn validate_targets(
    conn: &mut PgConnection,
    user_id: Uuid,
    assignments: &[AssignmentSpec],
) -> AppResult<()> {
    let food_ids: Vec<Uuid> = assignments.iter().filter_map(|a| a.food_id).collect();
    let variant_ids: Vec<Uuid> = assignments.iter().filter_map(|a| a.variant_id).collect();
    let meal_ids: Vec<Uuid> = assignments.iter().filter_map(|a| a.meal_id).collect();
    let exercise_ids: Vec<Uuid> = assignments.iter().filter_map(|a| a.exercise_id).collect();
    let preset_ids: Vec<Uuid> = assignments.iter().filter_map(|a| a.preset_id).collect();

    if !food_ids.is_empty() {
        let found = catalog_repo::get_foods_by_ids(&mut *conn, &food_ids, user_id).await?;
        check_all_found(&food_ids, found.iter().map(|f| f.id), "food")?;
        let variants = catalog_repo::get_food_variants_by_ids(&mut *conn, &variant_ids).await?;
        check_all_found(&variant_ids, variants.iter().map(|v| v.id), "food variant")?;
    }
    if !meal_ids.is_empty() {
        let found = catalog_repo::get_meals_by_ids(&mut *conn, &meal_ids, user_id).await?;
        check_all_found(&meal_ids, found.iter().map(|m| m.id), "meal")?;
    }
    if !exercise_ids.is_empty() {
        let found = catalog_repo::get_exercises_by_ids(&mut *conn, &exercise_ids, user_id).await?;
        check_all_found(&exercise_ids, found.iter().map(|e| e.id), "exercise")?;
    }
    if !preset_ids.is_empty() {
        let found =
            catalog_repo::get_workout_presets_by_ids(&mut *conn, &preset_ids, user_id).await?;
        check_all_found(&preset_ids, found.iter().map(|p| p.id), "workout preset")?;
    }
    Ok(())
}

fn check_all_found(
    wanted: &[Uuid],
    found: impl Iterator<Item = Uuid>,
    kind: &str,
) -> AppResult<()> {
    let found: std::collections::HashSet<Uuid> = found.collect();
    match wanted.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(AppError::not_found(format!("{kind} {missing} not found"))),
        None => Ok(()),
    }
}

pub async fn create_template(
    db: &PgPool,
    user_id: Uuid,
    spec: TemplateSpec,
    request_date: Date,
) -> AppResult<TemplateDetail> {
    validate_spec(&spec)?;

    let mut tx = db.begin().await?;
    validate_targets(&mut tx, user_id, &spec.assignments).await?;
    let template = repo::insert_template(&mut tx, user_id, &spec).await?;
    repo::upsert_assignments(&mut tx, template.id, &spec.assignments).await?;
    tx.commit().await?;
    info!(template_id = %template.id, %user_id, "plan template created");

    if template.is_active {
        materializer::materialize(db, user_id, template.id, request_date).await?;
    }
    get_template_detail(db, user_id, template.id).await
}

pub async fn update_template(
    db: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
    spec: TemplateSpec,
    request_date: Date,
) -> AppResult<TemplateDetail> {
    validate_spec(&spec)?;

    let mut tx = db.begin().await?;
    let existing = repo::get_template(&mut *tx, template_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("plan template not found"))?;
    if existing.plan_kind != spec.plan_kind {
        return Err(AppError::validation("plan kind cannot be changed"));
    }
    validate_targets(&mut tx, user_id, &spec.assignments).await?;

    // Past entries stay; only not-yet-lived days are regenerated under the
    // edited definition.
    diary_repo::retract_generated_entries(&mut tx, user_id, template_id, request_date).await?;

    let template = repo::update_template_row(&mut tx, template_id, user_id, &spec)
        .await?
        .ok_or_else(|| AppError::not_found("plan template not found"))?;
    repo::upsert_assignments(&mut tx, template_id, &spec.assignments).await?;
    tx.commit().await?;
    info!(%template_id, %user_id, "plan template updated");

    if template.is_active {
        materializer::materialize(db, user_id, template_id, request_date).await?;
    }
    get_template_detail(db, user_id, template_id).await
}

/// Deletes the template, its assignments and sets, and the generated entries
/// dated `request_date` or later. Entries before that date are kept with
/// their template references severed.
pub async fn delete_template(
    db: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
    request_date: Date,
) -> AppResult<u64> {
    let mut tx = db.begin().await?;
    repo::get_template(&mut *tx, template_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("plan template not found"))?;
    let retracted =
        diary_repo::retract_generated_entries(&mut tx, user_id, template_id, request_date).await?;
    repo::delete_template(&mut *tx, template_id, user_id).await?;
    tx.commit().await?;
    info!(%template_id, %user_id, retracted, "plan template deleted");
    Ok(retracted)
}

pub async fn delete_assignment(
    db: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
    assignment_id: Uuid,
    request_date: Date,
) -> AppResult<u64> {
    let mut tx = db.begin().await?;
    repo::get_template(&mut *tx, template_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("plan template not found"))?;
    repo::get_assignment_row(&mut *tx, assignment_id, template_id)
        .await?
        .ok_or_else(|| AppError::not_found("assignment not found"))?;
    let retracted = diary_repo::retract_generated_entries_for_assignment(
        &mut tx,
        user_id,
        assignment_id,
        request_date,
    )
    .await?;
    repo::delete_assignment(&mut *tx, assignment_id, template_id).await?;
    tx.commit().await?;
    info!(%template_id, %assignment_id, %user_id, retracted, "plan assignment deleted");
    Ok(retracted)
}

pub async fn materialize_template(
    db: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
    request_date: Date,
) -> AppResult<u64> {
    materializer::materialize(db, user_id, template_id, request_date).await
}

pub async fn get_template_detail(
    db: &PgPool,
    user_id: Uuid,
    template_id: Uuid,
) -> AppResult<TemplateDetail> {
    let mut conn = db.acquire().await?;
    let template = repo::get_template(&mut *conn, template_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("plan template not found"))?;
    template_detail(&mut conn, template).await
}

async fn template_detail(
    conn: &mut PgConnection,
    template: Template,
) -> AppResult<TemplateDetail> {
    let assignments = repo::get_assignment_rows_with_sets(conn, template.id)
        .await?
        .into_iter()
        .map(|(row, sets)| AssignmentDetail { row, sets })
        .collect();
    Ok(TemplateDetail {
        template,
        assignments,
    })
}

pub async fn list_templates(db: &PgPool, user_id: Uuid) -> AppResult<Vec<Template>> {
    repo::list_templates(db, user_id).await
}

pub async fn get_active_plan_for_date(
    db: &PgPool,
    user_id: Uuid,
    kind: PlanKind,
    date: Date,
) -> AppResult<Option<TemplateDetail>> {
    let mut conn = db.acquire().await?;
    match repo::get_active_template_for_date(&mut *conn, user_id, kind, date).await? {
        Some(template) => Ok(Some(template_detail(&mut conn, template).await?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn base_spec(kind: PlanKind) -> TemplateSpec {
        TemplateSpec {
            plan_kind: kind,
            name: "cut week".into(),
            description: String::new(),
            start_date: date!(2025 - 06 - 02),
            end_date: Some(date!(2025 - 06 - 15)),
            is_active: false,
            assignments: Vec::new(),
        }
    }

    fn assignment() -> AssignmentSpec {
        AssignmentSpec {
            id: None,
            day_of_week: 1,
            meal_type: Some("lunch".into()),
            food_id: Some(Uuid::new_v4()),
            variant_id: Some(Uuid::new_v4()),
            meal_id: None,
            exercise_id: None,
            preset_id: None,
            quantity: Some(100.0),
            unit: Some("g".into()),
            sets: Vec::new(),
        }
    }

    #[test]
    fn valid_meal_spec_passes() {
        let mut spec = base_spec(PlanKind::Meal);
        spec.assignments.push(assignment());
        assert!(validate_spec(&spec).is_ok());
    }

    #[test]
    fn end_before_start_is_rejected() {
        let mut spec = base_spec(PlanKind::Meal);
        spec.end_date = Some(date!(2025 - 06 - 01));
        assert!(validate_spec(&spec).is_err());
    }

    #[test]
    fn day_of_week_out_of_range_is_rejected() {
        let mut spec = base_spec(PlanKind::Meal);
        let mut a = assignment();
        a.day_of_week = 7;
        spec.assignments.push(a);
        assert!(validate_spec(&spec).is_err());
    }

    #[test]
    fn meal_plan_rejects_exercise_target() {
        let mut spec = base_spec(PlanKind::Meal);
        let mut a = assignment();
        a.food_id = None;
        a.variant_id = None;
        a.exercise_id = Some(Uuid::new_v4());
        spec.assignments.push(a);
        assert!(validate_spec(&spec).is_err());
    }

    #[test]
    fn meal_plan_requires_meal_type() {
        let mut spec = base_spec(PlanKind::Meal);
        let mut a = assignment();
        a.meal_type = Some("  ".into());
        spec.assignments.push(a);
        assert!(validate_spec(&spec).is_err());
    }

    #[test]
    fn workout_plan_rejects_food_target() {
        let mut spec = base_spec(PlanKind::Workout);
        spec.assignments.push(assignment());
        assert!(validate_spec(&spec).is_err());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let mut spec = base_spec(PlanKind::Meal);
        let mut a = assignment();
        a.quantity = Some(0.0);
        spec.assignments.push(a);
        assert!(validate_spec(&spec).is_err());
    }

    #[test]
    fn two_targets_are_rejected() {
        let mut spec = base_spec(PlanKind::Meal);
        let mut a = assignment();
        a.meal_id = Some(Uuid::new_v4());
        spec.assignments.push(a);
        assert!(validate_spec(&spec).is_err());
    }
}
