use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;

use super::dto::{
    DayQuery, DiaryDay, ExerciseEntryDetail, LogExerciseRequest, LogFoodRequest, LogMealRequest,
    MealLogged, RangeDeleteQuery, UpdateExerciseEntryRequest, UpdateFoodEntryRequest,
};
use super::repo::FoodEntry;
use super::services;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/diary", get(day))
        .route("/diary/foods", post(log_food))
        .route("/diary/foods/:id", put(update_food).delete(delete_food))
        .route("/diary/meals", post(log_meal))
        .route("/diary/meals/:id", delete(delete_meal_group))
        .route("/diary/exercises", post(log_exercise))
        .route(
            "/diary/exercises/:id",
            put(update_exercise).delete(delete_exercise),
        )
        .route("/diary/entries", delete(delete_range))
}

#[instrument(skip(state))]
async fn day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<DayQuery>,
) -> AppResult<Json<DiaryDay>> {
    Ok(Json(services::day_view(&state.db, user_id, query.date).await?))
}

#[instrument(skip(state, req))]
async fn log_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<LogFoodRequest>,
) -> AppResult<Json<FoodEntry>> {
    Ok(Json(services::log_food_entry(&state.db, user_id, req).await?))
}

#[instrument(skip(state, req))]
async fn log_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<LogMealRequest>,
) -> AppResult<Json<MealLogged>> {
    Ok(Json(services::log_meal(&state.db, user_id, req).await?))
}

#[instrument(skip(state, req))]
async fn log_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(req): Json<LogExerciseRequest>,
) -> AppResult<Json<ExerciseEntryDetail>> {
    Ok(Json(
        services::log_exercise_entry(&state.db, user_id, req).await?,
    ))
}

#[instrument(skip(state, req))]
async fn update_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateFoodEntryRequest>,
) -> AppResult<Json<FoodEntry>> {
    Ok(Json(
        services::update_food_entry(&state.db, user_id, id, req).await?,
    ))
}

#[instrument(skip(state, req))]
async fn update_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateExerciseEntryRequest>,
) -> AppResult<Json<ExerciseEntryDetail>> {
    Ok(Json(
        services::update_exercise_entry(&state.db, user_id, id, req).await?,
    ))
}

#[instrument(skip(state))]
async fn delete_food(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    services::delete_food_entry(&state.db, user_id, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state))]
async fn delete_meal_group(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    services::delete_food_entry_group(&state.db, user_id, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state))]
async fn delete_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    services::delete_exercise_entry(&state.db, user_id, id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

#[instrument(skip(state))]
async fn delete_range(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<RangeDeleteQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let deleted = services::delete_entries_in_range(
        &state.db,
        user_id,
        query.start,
        query.end,
        query.template_id,
    )
    .await?;
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
