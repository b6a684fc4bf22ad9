//! Diary entries and the snapshot discipline: every entry embeds the source
//! facts it was created from and never re-reads the catalog afterwards.

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod services;
pub mod snapshot;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
