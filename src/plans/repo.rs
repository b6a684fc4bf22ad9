use std::collections::HashMap;

use sqlx::{FromRow, PgConnection, PgExecutor, QueryBuilder};
use time::Date;
use uuid::Uuid;

use crate::catalog::SetSpec;
use crate::error::{AppError, AppResult};

use super::dto::{AssignmentSpec, TemplateSpec};
use super::types::{Assignment, AssignmentRow, PlanKind, Template};

const TEMPLATE_COLUMNS: &str = "id, user_id, plan_kind, name, description, start_date, end_date, \
     is_active, created_at, updated_at";

const ASSIGNMENT_COLUMNS: &str = "id, template_id, day_of_week, meal_type, food_id, variant_id, \
     meal_id, exercise_id, preset_id, quantity, unit";

pub async fn get_template<'e, E: PgExecutor<'e>>(
    db: E,
    template_id: Uuid,
    user_id: Uuid,
) -> AppResult<Option<Template>> {
    let template = sqlx::query_as::<_, Template>(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM plan_templates WHERE id = $1 AND user_id = $2"
    ))
    .bind(template_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(template)
}

pub async fn list_templates<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
) -> AppResult<Vec<Template>> {
    let templates = sqlx::query_as::<_, Template>(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM plan_templates WHERE user_id = $1 ORDER BY start_date DESC"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(templates)
}

/// The most recent active plan of the given kind whose window covers `date`.
pub async fn get_active_template_for_date<'e, E: PgExecutor<'e>>(
    db: E,
    user_id: Uuid,
    kind: PlanKind,
    date: Date,
) -> AppResult<Option<Template>> {
    let template = sqlx::query_as::<_, Template>(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM plan_templates \
         WHERE user_id = $1 AND plan_kind = $2 AND is_active \
           AND start_date <= $3 AND (end_date IS NULL OR end_date >= $3) \
         ORDER BY start_date DESC LIMIT 1"
    ))
    .bind(user_id)
    .bind(kind)
    .bind(date)
    .fetch_optional(db)
    .await?;
    Ok(template)
}

pub async fn insert_template(
    conn: &mut PgConnection,
    user_id: Uuid,
    spec: &TemplateSpec,
) -> AppResult<Template> {
    let template = sqlx::query_as::<_, Template>(&format!(
        "INSERT INTO plan_templates (user_id, plan_kind, name, description, start_date, end_date, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING {TEMPLATE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(spec.plan_kind)
    .bind(&spec.name)
    .bind(&spec.description)
    .bind(spec.start_date)
    .bind(spec.end_date)
    .bind(spec.is_active)
    .fetch_one(conn)
    .await?;
    Ok(template)
}

pub async fn update_template_row(
    conn: &mut PgConnection,
    template_id: Uuid,
    user_id: Uuid,
    spec: &TemplateSpec,
) -> AppResult<Option<Template>> {
    let template = sqlx::query_as::<_, Template>(&format!(
        "UPDATE plan_templates SET \
             name = $1, description = $2, start_date = $3, end_date = $4, is_active = $5, \
             updated_at = now() \
         WHERE id = $6 AND user_id = $7 \
         RETURNING {TEMPLATE_COLUMNS}"
    ))
    .bind(&spec.name)
    .bind(&spec.description)
    .bind(spec.start_date)
    .bind(spec.end_date)
    .bind(spec.is_active)
    .bind(template_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?;
    Ok(template)
}

pub async fn delete_template<'e, E: PgExecutor<'e>>(
    db: E,
    template_id: Uuid,
    user_id: Uuid,
) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM plan_templates WHERE id = $1 AND user_id = $2")
        .bind(template_id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_assignment_row<'e, E: PgExecutor<'e>>(
    db: E,
    assignment_id: Uuid,
    template_id: Uuid,
) -> AppResult<Option<AssignmentRow>> {
    let row = sqlx::query_as::<_, AssignmentRow>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM plan_assignments WHERE id = $1 AND template_id = $2"
    ))
    .bind(assignment_id)
    .bind(template_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete_assignment<'e, E: PgExecutor<'e>>(
    db: E,
    assignment_id: Uuid,
    template_id: Uuid,
) -> AppResult<bool> {
    let result = sqlx::query("DELETE FROM plan_assignments WHERE id = $1 AND template_id = $2")
        .bind(assignment_id)
        .bind(template_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[derive(FromRow)]
struct AssignmentSetRow {
    assignment_id: Uuid,
    #[sqlx(flatten)]
    set: SetSpec,
}

/// Assignment rows with their ordered sets attached. Two round trips.
pub async fn get_assignment_rows_with_sets(
    conn: &mut PgConnection,
    template_id: Uuid,
) -> AppResult<Vec<(AssignmentRow, Vec<SetSpec>)>> {
    let rows = sqlx::query_as::<_, AssignmentRow>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM plan_assignments WHERE template_id = $1 ORDER BY day_of_week, id"
    ))
    .bind(template_id)
    .fetch_all(&mut *conn)
    .await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let set_rows = sqlx::query_as::<_, AssignmentSetRow>(
        r#"
        SELECT assignment_id, set_number, set_type, reps, weight, duration, rest_time, notes
        FROM plan_assignment_sets
        WHERE assignment_id = ANY($1)
        ORDER BY assignment_id, set_number
        "#,
    )
    .bind(&ids)
    .fetch_all(&mut *conn)
    .await?;

    let mut sets_by_assignment: HashMap<Uuid, Vec<SetSpec>> = HashMap::new();
    for row in set_rows {
        sets_by_assignment
            .entry(row.assignment_id)
            .or_default()
            .push(row.set);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let sets = sets_by_assignment.remove(&row.id).unwrap_or_default();
            (row, sets)
        })
        .collect())
}

/// Domain-typed assignments for the materializer.
pub async fn get_assignments(
    conn: &mut PgConnection,
    template_id: Uuid,
) -> AppResult<Vec<Assignment>> {
    get_assignment_rows_with_sets(conn, template_id)
        .await?
        .into_iter()
        .map(|(row, sets)| row.into_assignment(sets))
        .collect()
}

/// Reconcile stored assignments with the submitted list: rows absent from
/// the submission are deleted, rows with ids are updated in place (sets
/// replaced), rows without ids are inserted.
pub async fn upsert_assignments(
    conn: &mut PgConnection,
    template_id: Uuid,
    specs: &[AssignmentSpec],
) -> AppResult<()> {
    let keep: Vec<Uuid> = specs.iter().filter_map(|s| s.id).collect();
    sqlx::query("DELETE FROM plan_assignments WHERE template_id = $1 AND id <> ALL($2)")
        .bind(template_id)
        .bind(&keep)
        .execute(&mut *conn)
        .await?;

    for spec in specs {
        let assignment_id = match spec.id {
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE plan_assignments SET
                        day_of_week = $1, meal_type = $2, food_id = $3, variant_id = $4,
                        meal_id = $5, exercise_id = $6, preset_id = $7, quantity = $8, unit = $9
                    WHERE id = $10 AND template_id = $11
                    "#,
                )
                .bind(spec.day_of_week)
                .bind(&spec.meal_type)
                .bind(spec.food_id)
                .bind(spec.variant_id)
                .bind(spec.meal_id)
                .bind(spec.exercise_id)
                .bind(spec.preset_id)
                .bind(spec.quantity)
                .bind(&spec.unit)
                .bind(id)
                .bind(template_id)
                .execute(&mut *conn)
                .await?;
                if result.rows_affected() == 0 {
                    return Err(AppError::Conflict(format!(
                        "assignment {id} does not belong to this template"
                    )));
                }
                sqlx::query("DELETE FROM plan_assignment_sets WHERE assignment_id = $1")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
                id
            }
            None => sqlx::query_scalar::<_, Uuid>(
                r#"
                INSERT INTO plan_assignments
                    (template_id, day_of_week, meal_type, food_id, variant_id, meal_id,
                     exercise_id, preset_id, quantity, unit)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id
                "#,
            )
            .bind(template_id)
            .bind(spec.day_of_week)
            .bind(&spec.meal_type)
            .bind(spec.food_id)
            .bind(spec.variant_id)
            .bind(spec.meal_id)
            .bind(spec.exercise_id)
            .bind(spec.preset_id)
            .bind(spec.quantity)
            .bind(&spec.unit)
            .fetch_one(&mut *conn)
            .await?,
        };

        if !spec.sets.is_empty() {
            let mut qb = QueryBuilder::new(
                "INSERT INTO plan_assignment_sets \
                 (assignment_id, set_number, set_type, reps, weight, duration, rest_time, notes) ",
            );
            qb.push_values(&spec.sets, |mut b, set| {
                b.push_bind(assignment_id)
                    .push_bind(set.set_number)
                    .push_bind(&set.set_type)
                    .push_bind(set.reps)
                    .push_bind(set.weight)
                    .push_bind(set.duration)
                    .push_bind(set.rest_time)
                    .push_bind(&set.notes);
            });
            qb.build().execute(&mut *conn).await?;
        }
    }
    Ok(())
}
