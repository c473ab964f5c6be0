//! Stand-alone question generation and answer scoring, outside any interview.

pub mod evaluator;
pub mod handlers;
pub mod prompts;
pub mod question_bank;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::interview::parser::{parse_utterance, UtteranceRules};
use crate::llm_client::{LlmError, LlmGateway};
use question_bank::{fallback_question, Category, Difficulty};

const QUESTION_RULES: UtteranceRules = UtteranceRules {
    min_chars: 15,
    require_terminal: false,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Model,
    Fallback,
}

pub const DEFAULT_SIMULATED_QUESTIONS: u32 = 5;
pub const MAX_SIMULATED_QUESTIONS: u32 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct SimulatedQuestion {
    pub id: String,
    pub question: String,
    pub order: u32,
    pub source: Origin,
}

pub async fn generate_question(
    gateway: &LlmGateway,
    role: &str,
    difficulty: Difficulty,
    category: Category,
) -> (String, Origin) {
    match ask(gateway, role, difficulty, category, &[]).await {
        Ok(question) => (question, Origin::Model),
        Err(e) => {
            error!(error = %e, %difficulty, %category, "Question generation failed, using question bank");
            (fallback_question(category, difficulty).to_string(), Origin::Fallback)
        }
    }
}

/// Builds an ordered question set for a practice interview.
///
/// Each prompt lists the questions already chosen and a repeated question
/// burns an attempt. Bank fallbacks rotate through the categories starting
/// at `category`.
pub async fn simulate_interview(
    gateway: &LlmGateway,
    role: &str,
    difficulty: Difficulty,
    category: Category,
    count: u32,
) -> Vec<SimulatedQuestion> {
    let count = count.clamp(1, MAX_SIMULATED_QUESTIONS);
    let mut asked: Vec<String> = Vec::with_capacity(count as usize);
    let mut questions = Vec::with_capacity(count as usize);

    for order in 1..=count {
        let (question, source) = match ask(gateway, role, difficulty, category, &asked).await {
            Ok(question) => (question, Origin::Model),
            Err(e) => {
                let rotated = category.rotated(order as usize - 1);
                warn!(error = %e, order, category = %rotated, "Simulated question falls back to question bank");
                (fallback_question(rotated, difficulty).to_string(), Origin::Fallback)
            }
        };
        asked.push(question.clone());
        questions.push(SimulatedQuestion {
            id: format!("q_{order}"),
            question,
            order,
            source,
        });
    }

    info!(count, %difficulty, "Interview simulation prepared");
    questions
}

async fn ask(
    gateway: &LlmGateway,
    role: &str,
    difficulty: Difficulty,
    category: Category,
    previous: &[String],
) -> Result<String, LlmError> {
    let prompt = prompts::question(role, &difficulty.to_string(), &category.to_string(), previous);
    gateway
        .generate_with(&prompt, |text| {
            let question = parse_utterance(text, QUESTION_RULES)?;
            if previous.iter().any(|p| p.eq_ignore_ascii_case(&question)) {
                return Err(LlmError::Rejected("repeated question".to_string()));
            }
            Ok(question)
        })
        .await
}
