pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scoring::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Scoring API
        .route(
            "/api/v1/criteria/validate",
            post(handlers::handle_validate_criteria),
        )
        .route("/api/v1/scores", post(handlers::handle_score))
        .route("/api/v1/shortlist", post(handlers::handle_shortlist))
        .with_state(state)
}
