//! services/api/src/web/mod.rs

pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;

pub use rest::{add_exercise_handler, create_user_handler, get_log_handler, list_users_handler};

/// Builds the API router. The binary layers CORS and Swagger UI on top;
/// integration tests drive this router directly.
pub fn api_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/users", post(create_user_handler).get(list_users_handler))
        .route("/api/users/{id}/exercises", post(add_exercise_handler))
        .route("/api/users/{id}/logs", get(get_log_handler))
        .with_state(app_state)
}
