use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::evaluator::{evaluate_response, Evaluation};
use crate::assessment::question_bank::{Category, Difficulty};
use crate::assessment::{
    generate_question, simulate_interview, Origin, SimulatedQuestion, DEFAULT_SIMULATED_QUESTIONS,
};
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::interview::handlers::required;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionRequest {
    #[serde(default)]
    pub job_role: String,
    #[serde(default, alias = "experienceLevel")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: Category,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionResponse {
    pub question: String,
    pub difficulty: Difficulty,
    pub category: Category,
    pub source: Origin,
    pub timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateInterviewRequest {
    #[serde(default)]
    pub job_role: String,
    pub experience_level: Option<Difficulty>,
    #[serde(default)]
    pub category: Category,
    pub question_count: Option<u32>,
    /// Minutes.
    pub duration: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulateInterviewResponse {
    pub interview_id: Uuid,
    pub job_role: String,
    pub experience_level: Difficulty,
    pub duration: u32,
    pub questions: Vec<SimulatedQuestion>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub job_role: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResponse {
    pub evaluation: Evaluation,
    pub source: Origin,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiHealthResponse {
    pub status: &'static str,
    pub llm_configured: bool,
    pub provider: &'static str,
    pub model: Option<String>,
    pub session_store: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// POST /api/v1/ai/generate-question
pub async fn handle_generate_question(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateQuestionRequest>,
) -> Result<Json<GenerateQuestionResponse>, AppError> {
    let role = required("jobRole", &req.job_role)?;
    let (question, source) =
        generate_question(&state.llm, role, req.difficulty, req.category).await;
    Ok(Json(GenerateQuestionResponse {
        question,
        difficulty: req.difficulty,
        category: req.category,
        source,
        timestamp: Utc::now(),
    }))
}

/// POST /api/v1/ai/simulate-interview
pub async fn handle_simulate_interview(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SimulateInterviewRequest>,
) -> Result<Json<SimulateInterviewResponse>, AppError> {
    let role = required("jobRole", &req.job_role)?;
    let level = req
        .experience_level
        .ok_or_else(|| AppError::Validation("experienceLevel: is required".to_string()))?;
    let count = req.question_count.unwrap_or(DEFAULT_SIMULATED_QUESTIONS);
    let questions = simulate_interview(&state.llm, role, level, req.category, count).await;
    Ok(Json(SimulateInterviewResponse {
        interview_id: Uuid::new_v4(),
        job_role: role.to_string(),
        experience_level: level,
        duration: req.duration.unwrap_or(30),
        questions,
        created_at: Utc::now(),
    }))
}

/// POST /api/v1/ai/evaluate-response
pub async fn handle_evaluate_response(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let question = required("question", &req.question)?;
    let answer = required("answer", &req.answer)?;
    let role = required("jobRole", &req.job_role)?;
    let (evaluation, source) = evaluate_response(&state.llm, question, answer, role).await;
    Ok(Json(EvaluateResponse {
        evaluation,
        source,
        timestamp: Utc::now(),
    }))
}

/// GET /api/v1/ai/health
pub async fn handle_ai_health(State(state): State<AppState>) -> Json<AiHealthResponse> {
    Json(AiHealthResponse {
        status: "operational",
        llm_configured: state.llm.is_configured(),
        provider: state.llm.provider(),
        model: state.llm.model().map(str::to_string),
        session_store: state.interviewer.store_backend(),
        timestamp: Utc::now(),
    })
}
