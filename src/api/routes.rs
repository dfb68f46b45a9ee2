use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::admin_refresh,
    wrapped::{get_wordle, get_wrapped, health},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/wrapped/:year", get(get_wrapped))
        .route("/api/wordle/:year", get(get_wordle))
        .route("/api/admin/refresh", post(admin_refresh))
        .with_state(state)
}
