use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::HealthResponse;
use crate::database;
use super::AppState;

pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: "guild-wrapped",
    })
}

pub async fn get_wrapped(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> impl IntoResponse {
    let summary = match load_summary(&state, year) {
        Ok(summary) => summary,
        Err(response) => return response,
    };

    match summary {
        Some(summary) => Json(summary).into_response(),
        None => (StatusCode::NOT_FOUND, format!("No wrapped data for {year}")).into_response(),
    }
}

pub async fn get_wordle(
    State(state): State<Arc<AppState>>,
    Path(year): Path<i32>,
) -> impl IntoResponse {
    let summary = match load_summary(&state, year) {
        Ok(summary) => summary,
        Err(response) => return response,
    };

    match summary {
        Some(summary) => Json(summary.wordle).into_response(),
        None => (StatusCode::NOT_FOUND, format!("No wordle data for {year}")).into_response(),
    }
}

fn load_summary(
    state: &AppState,
    year: i32,
) -> Result<Option<crate::stats::WrappedSummary>, axum::response::Response> {
    let mut conn = state
        .pool
        .get()
        .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response())?;

    let min_games = state.config.wordle.min_ranked_games.max(0) as u32;

    database::snapshots::load_summary(&mut conn, year, min_games)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {e}")).into_response())
}
