use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use time::{Date, OffsetDateTime};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;

use super::dto::{
    ActivePlanQuery, DateQuery, MaterializeResponse, TemplateDetail, TemplateSpec,
};
use super::services;
use super::types::Template;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route("/plans/active", get(active_plan))
        .route("/plans/:id", get(get_plan).put(update_plan).delete(delete_plan))
        .route(
            "/plans/:id/assignments/:assignment_id",
            delete(delete_assignment),
        )
        .route("/plans/:id/materialize", post(materialize_plan))
}

fn effective_date(query: &DateQuery) -> Date {
    query.date.unwrap_or_else(|| OffsetDateTime::now_utc().date())
}

#[instrument(skip(state, spec))]
async fn create_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<DateQuery>,
    Json(spec): Json<TemplateSpec>,
) -> AppResult<Json<TemplateDetail>> {
    let detail =
        services::create_template(&state.db, user_id, spec, effective_date(&query)).await?;
    Ok(Json(detail))
}

#[instrument(skip(state, spec))]
async fn update_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DateQuery>,
    Json(spec): Json<TemplateSpec>,
) -> AppResult<Json<TemplateDetail>> {
    let detail =
        services::update_template(&state.db, user_id, id, spec, effective_date(&query)).await?;
    Ok(Json(detail))
}

#[instrument(skip(state))]
async fn list_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Template>>> {
    Ok(Json(services::list_templates(&state.db, user_id).await?))
}

#[instrument(skip(state))]
async fn get_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TemplateDetail>> {
    Ok(Json(
        services::get_template_detail(&state.db, user_id, id).await?,
    ))
}

#[instrument(skip(state))]
async fn active_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<ActivePlanQuery>,
) -> AppResult<Json<Option<TemplateDetail>>> {
    let date = query.date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
    Ok(Json(
        services::get_active_plan_for_date(&state.db, user_id, query.kind, date).await?,
    ))
}

#[instrument(skip(state))]
async fn delete_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let retracted =
        services::delete_template(&state.db, user_id, id, effective_date(&query)).await?;
    Ok(Json(serde_json::json!({ "retracted": retracted })))
}

#[instrument(skip(state))]
async fn delete_assignment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, assignment_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let retracted = services::delete_assignment(
        &state.db,
        user_id,
        id,
        assignment_id,
        effective_date(&query),
    )
    .await?;
    Ok(Json(serde_json::json!({ "retracted": retracted })))
}

#[instrument(skip(state))]
async fn materialize_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<MaterializeResponse>> {
    let created =
        services::materialize_template(&state.db, user_id, id, effective_date(&query)).await?;
    Ok(Json(MaterializeResponse { created }))
}
