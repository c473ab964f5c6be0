use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::interview::models::{InterviewSession, Message};
use crate::interview::phase::Phase;

#[derive(Debug, Clone, FromRow)]
pub struct InterviewSessionRow {
    pub interview_id: Uuid,
    pub phase: String,
    pub question_count: i32,
    pub candidate_question_count: i32,
    pub messages: Json<Vec<Message>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<InterviewSessionRow> for InterviewSession {
    type Error = String;

    fn try_from(row: InterviewSessionRow) -> Result<Self, Self::Error> {
        let phase: Phase = row.phase.parse().map_err(|e| format!("{e}"))?;
        let question_count = u32::try_from(row.question_count)
            .map_err(|_| format!("negative question_count {}", row.question_count))?;
        let candidate_question_count = u32::try_from(row.candidate_question_count).map_err(|_| {
            format!(
                "negative candidate_question_count {}",
                row.candidate_question_count
            )
        })?;
        Ok(InterviewSession {
            interview_id: row.interview_id,
            phase,
            question_count,
            candidate_question_count,
            messages: row.messages.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
