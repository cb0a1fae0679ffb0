use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::scoring::handlers;
use crate::state::AppState;

/// GET /health
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "scoring-api",
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Scoring API
        .route("/api/v1/scoring/aspects", get(handlers::handle_list_aspects))
        .route("/api/v1/scoring/preview", post(handlers::handle_preview))
        .route(
            "/api/v1/resumes/:id/score",
            post(handlers::handle_score_resume),
        )
        .route(
            "/api/v1/resumes/:id/feedback",
            get(handlers::handle_get_feedback),
        )
        .with_state(state)
}
