pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // AI operations — thin pass-throughs over the model provider
        .route("/api/v1/ai/parse-resume", post(handlers::handle_parse_resume))
        .route(
            "/api/v1/ai/generate-question",
            post(handlers::handle_generate_question),
        )
        .route(
            "/api/v1/ai/evaluate-answer",
            post(handlers::handle_evaluate_answer),
        )
        .route(
            "/api/v1/ai/generate-summary",
            post(handlers::handle_generate_summary),
        )
        // Candidate session
        .route("/api/v1/session", get(handlers::handle_session_snapshot))
        .route("/api/v1/session/resume", post(handlers::handle_upload_resume))
        .route("/api/v1/session/message", post(handlers::handle_message))
        .route("/api/v1/session/draft", put(handlers::handle_draft))
        .route("/api/v1/session/reset", post(handlers::handle_reset))
        // Interviewer dashboard
        .route("/api/v1/candidates", get(handlers::handle_list_candidates))
        .route("/api/v1/candidates/:id", get(handlers::handle_get_candidate))
        .with_state(state)
}
