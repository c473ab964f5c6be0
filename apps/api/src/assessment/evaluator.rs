//! Scores a single answer, through the model or a word-count heuristic.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::assessment::prompts;
use crate::assessment::Origin;
use crate::llm_client::{extract_json_object, strip_code_fences, LlmError, LlmGateway};

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub technical_accuracy: u8,
    pub communication_clarity: u8,
    pub completeness: u8,
}

#[derive(Debug, Deserialize)]
struct RawEvaluation {
    score: f64,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    technical_accuracy: Option<f64>,
    communication_clarity: Option<f64>,
    completeness: Option<f64>,
}

pub async fn evaluate_response(
    gateway: &LlmGateway,
    question: &str,
    answer: &str,
    role: &str,
) -> (Evaluation, Origin) {
    let prompt = prompts::evaluation(question, answer, role);
    match gateway.generate_with(&prompt, parse_evaluation).await {
        Ok(evaluation) => (evaluation, Origin::Model),
        Err(e) => {
            error!(error = %e, "Evaluation failed, using heuristic");
            (heuristic_evaluation(answer), Origin::Fallback)
        }
    }
}

pub fn parse_evaluation(text: &str) -> Result<Evaluation, LlmError> {
    let cleaned = strip_code_fences(text);
    let json = extract_json_object(&cleaned)
        .ok_or_else(|| LlmError::Rejected("no JSON object in evaluation".to_string()))?;
    let raw: RawEvaluation = serde_json::from_str(json)?;

    let feedback = raw.feedback.trim().to_string();
    if feedback.is_empty() {
        return Err(LlmError::Rejected("evaluation feedback is empty".to_string()));
    }
    let score = clamp_score(raw.score);

    Ok(Evaluation {
        score,
        feedback,
        strengths: non_blank(raw.strengths),
        improvements: non_blank(raw.improvements),
        technical_accuracy: raw.technical_accuracy.map_or(score, clamp_score),
        communication_clarity: raw.communication_clarity.map_or(score, clamp_score),
        completeness: raw.completeness.map_or(score, clamp_score),
    })
}

/// Ten words per point, clamped to the score range.
pub fn heuristic_evaluation(answer: &str) -> Evaluation {
    let words = answer.split_whitespace().count();
    let base = (words / 10).clamp(MIN_SCORE as usize, MAX_SCORE as usize) as u8;

    Evaluation {
        score: base,
        feedback: "Clear and well structured answer that shows familiarity with the topic."
            .to_string(),
        strengths: vec![
            "Communicates clearly and directly".to_string(),
            "Shows technical knowledge".to_string(),
        ],
        improvements: vec![
            "Could add more specific examples".to_string(),
            "Consider scalability aspects".to_string(),
        ],
        technical_accuracy: base,
        communication_clarity: (base + 1).min(MAX_SCORE),
        completeness: base.saturating_sub(1).max(MIN_SCORE),
    }
}

fn clamp_score(value: f64) -> u8 {
    if !value.is_finite() {
        return MIN_SCORE;
    }
    value.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u8
}

fn non_blank(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
