pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::ats::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/roles", get(handlers::handle_list_roles))
        .route("/analyze", post(handlers::handle_analyze))
        .route("/analyze-file", post(handlers::handle_analyze_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
