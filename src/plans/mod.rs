//! Recurring plan templates: day-of-week assignments expanded over a date
//! range into concrete diary entries, idempotently and inside one
//! transaction per run.

pub mod dto;
pub mod handlers;
pub mod materializer;
pub mod repo;
pub mod resolver;
pub mod scaling;
pub mod services;
pub mod types;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
