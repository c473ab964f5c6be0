pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers as assessment;
use crate::interview::handlers as interview;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Interview flow
        .route("/api/v1/interviews/start", post(interview::handle_start))
        .route(
            "/api/v1/interviews/:id/explanation",
            post(interview::handle_explanation),
        )
        .route(
            "/api/v1/interviews/:id/first-question",
            post(interview::handle_first_question),
        )
        .route(
            "/api/v1/interviews/:id/analyze-and-respond",
            post(interview::handle_analyze_and_respond),
        )
        .route(
            "/api/v1/interviews/:id/transition-to-candidate-questions",
            post(interview::handle_transition_to_candidate_questions),
        )
        .route(
            "/api/v1/interviews/:id/answer-candidate-question",
            post(interview::handle_answer_candidate_question),
        )
        .route(
            "/api/v1/interviews/:id/farewell",
            post(interview::handle_farewell),
        )
        .route(
            "/api/v1/interviews/:id/complete",
            post(interview::handle_complete),
        )
        .route(
            "/api/v1/interviews/:id/conversation",
            get(interview::handle_conversation),
        )
        // Assessment
        .route(
            "/api/v1/ai/generate-question",
            post(assessment::handle_generate_question),
        )
        .route(
            "/api/v1/ai/simulate-interview",
            post(assessment::handle_simulate_interview),
        )
        .route(
            "/api/v1/ai/evaluate-response",
            post(assessment::handle_evaluate_response),
        )
        .route("/api/v1/ai/health", get(assessment::handle_ai_health))
        .with_state(state)
}
