use axum::{extract::State, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::interview::interviewer::{
    AnalyzeResponse, CandidateAnswerResponse, CompleteResponse, ConversationView,
    FirstQuestionResponse, MessageResponse,
};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub user_response: String,
}

#[derive(Deserialize)]
pub struct CandidateQuestionRequest {
    #[serde(default)]
    pub question: String,
}

/// POST /api/v1/interviews/start
pub async fn handle_start(
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(state.interviewer.start().await?))
}

/// POST /api/v1/interviews/:id/explanation
pub async fn handle_explanation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(state.interviewer.explain(id).await?))
}

/// POST /api/v1/interviews/:id/first-question
pub async fn handle_first_question(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<FirstQuestionResponse>, AppError> {
    Ok(Json(state.interviewer.first_question(id).await?))
}

/// POST /api/v1/interviews/:id/analyze-and-respond
pub async fn handle_analyze_and_respond(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let answer = required("userResponse", &req.user_response)?;
    Ok(Json(state.interviewer.analyze_and_respond(id, answer).await?))
}

/// POST /api/v1/interviews/:id/transition-to-candidate-questions
pub async fn handle_transition_to_candidate_questions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(state.interviewer.invite_candidate_questions(id).await?))
}

/// POST /api/v1/interviews/:id/answer-candidate-question
pub async fn handle_answer_candidate_question(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<CandidateQuestionRequest>,
) -> Result<Json<CandidateAnswerResponse>, AppError> {
    let question = required("question", &req.question)?;
    Ok(Json(
        state
            .interviewer
            .answer_candidate_question(id, question)
            .await?,
    ))
}

/// POST /api/v1/interviews/:id/farewell
pub async fn handle_farewell(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    Ok(Json(state.interviewer.farewell(id).await?))
}

/// POST /api/v1/interviews/:id/complete
pub async fn handle_complete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<CompleteResponse>, AppError> {
    Ok(Json(state.interviewer.complete(id).await?))
}

/// GET /api/v1/interviews/:id/conversation
pub async fn handle_conversation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ConversationView>, AppError> {
    Ok(Json(state.interviewer.conversation(id).await?))
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field}: must not be empty")));
    }
    Ok(trimmed)
}
