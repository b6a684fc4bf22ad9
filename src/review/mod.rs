//! Drift detection between diary snapshots and the source catalog, plus the
//! per-item accept / ignore review workflow.

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
