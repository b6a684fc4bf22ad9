use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;

use super::dto::{AcceptResponse, ReviewCount, ReviewItem, SourceKind};
use super::services;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/review", get(list_review))
        .route("/review/count", get(review_count))
        .route("/review/:kind/:id/accept", post(accept))
        .route("/review/:kind/:id/ignore", post(ignore))
}

#[instrument(skip(state))]
async fn list_review(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<ReviewItem>>> {
    Ok(Json(services::list_needs_review(&state.db, user_id).await?))
}

#[instrument(skip(state))]
async fn review_count(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<ReviewCount>> {
    let count = services::needs_review_count(&state.db, user_id).await?;
    Ok(Json(ReviewCount { count }))
}

#[instrument(skip(state))]
async fn accept(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((kind, id)): Path<(SourceKind, Uuid)>,
) -> AppResult<Json<AcceptResponse>> {
    let updated = services::accept(&state.db, user_id, kind, id).await?;
    Ok(Json(AcceptResponse { updated }))
}

#[instrument(skip(state))]
async fn ignore(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((kind, id)): Path<(SourceKind, Uuid)>,
) -> AppResult<Json<serde_json::Value>> {
    services::ignore(&state.db, user_id, kind, id).await?;
    Ok(Json(serde_json::json!({ "ignored": true })))
}
