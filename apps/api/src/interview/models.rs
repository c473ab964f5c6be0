use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interview::phase::Phase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Full state of one interview. The message list is append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewSession {
    pub interview_id: Uuid,
    pub phase: Phase,
    /// Primary questions asked so far (follow-ups excluded).
    pub question_count: u32,
    pub candidate_question_count: u32,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewSession {
    pub fn new(interview_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            interview_id,
            phase: Phase::Welcome,
            question_count: 0,
            candidate_question_count: 0,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
    }
}

/// Where a decision came from. Surfaced to clients so a fallback is never
/// mistaken for a real model judgement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionSource {
    #[default]
    Model,
    Salvaged,
    Fallback,
}

/// The interviewer's reaction to one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub comment: String,
    pub should_ask_follow_up: bool,
    pub follow_up_question: Option<String>,
    pub should_continue_to_next: bool,
    pub next_question: Option<String>,
    pub reasoning: String,
    pub source: DecisionSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_in_welcome() {
        let session = InterviewSession::new(Uuid::new_v4());
        assert_eq!(session.phase, Phase::Welcome);
        assert_eq!(session.question_count, 0);
        assert!(session.messages.is_empty());
    }

    #[test]
    fn test_last_assistant_message_skips_user_turns() {
        let mut session = InterviewSession::new(Uuid::new_v4());
        session.push(Message::assistant("Tell me about yourself."));
        session.push(Message::user("I build compilers."));
        assert_eq!(
            session.last_assistant_message().unwrap().content,
            "Tell me about yourself."
        );
    }

    #[test]
    fn test_message_role_serializes_lowercase() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_session_json_is_camel_case() {
        let session = InterviewSession::new(Uuid::new_v4());
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("questionCount").is_some());
        assert!(json.get("candidateQuestionCount").is_some());
        assert_eq!(json["phase"], "WELCOME");
    }
}
