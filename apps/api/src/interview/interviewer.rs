//! Drives one interview through its phases.
//!
//! Every mutating call takes the per-interview lock, loads the session,
//! checks the phase *before* talking to the model, then saves the whole
//! session back. Model failures never escape: each call site has a
//! deterministic fallback.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::interview::fallback::{self, CONTINUATION_QUESTION};
use crate::interview::models::{DecisionSource, InterviewSession, Message};
use crate::interview::parser::{parse_decision, parse_utterance, UtteranceRules};
use crate::interview::phase::{Phase, PhaseError};
use crate::interview::prompts::{self, AnalyzeContext};
use crate::interview::store::{SessionLocks, SessionStore, StoreError};
use crate::interview::tracker::count_primary_questions;
use crate::llm_client::{LlmError, LlmGateway};

pub const TOTAL_QUESTIONS: u32 = 5;
pub const CANDIDATE_QUESTION_LIMIT: u32 = 1;

const WELCOME_RULES: UtteranceRules = UtteranceRules {
    min_chars: 40,
    require_terminal: true,
};
const EXPLANATION_RULES: UtteranceRules = UtteranceRules {
    min_chars: 60,
    require_terminal: true,
};
const QUESTION_RULES: UtteranceRules = UtteranceRules {
    min_chars: 30,
    require_terminal: true,
};
const CANDIDATE_ANSWER_RULES: UtteranceRules = UtteranceRules {
    min_chars: 50,
    require_terminal: true,
};
const CLOSING_RULES: UtteranceRules = UtteranceRules {
    min_chars: 30,
    require_terminal: false,
};

#[derive(Debug, Error)]
pub enum InterviewError {
    #[error("interview {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub interview_id: Uuid,
    pub phase: Phase,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstQuestionResponse {
    pub interview_id: Uuid,
    pub phase: Phase,
    pub question: String,
    pub question_number: u32,
    pub total_questions: u32,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub interview_id: Uuid,
    pub comment: String,
    pub should_ask_follow_up: bool,
    pub follow_up_question: Option<String>,
    pub should_continue_to_next: bool,
    /// The question now waiting for an answer: the follow-up when one was
    /// asked, otherwise the next primary question. Always null once the
    /// question budget is spent.
    pub next_question: Option<String>,
    pub reasoning: String,
    pub source: DecisionSource,
    pub question_number: u32,
    pub total_questions: u32,
    pub phase: Phase,
    pub should_transition_to_candidate_questions: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateAnswerResponse {
    pub interview_id: Uuid,
    pub answer: String,
    pub question_count: u32,
    pub should_proceed_to_farewell: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    pub interview_id: Uuid,
    pub phase: Phase,
    pub completed: bool,
    pub conversation_length: usize,
    pub evaluation_url: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub interview_id: Uuid,
    pub phase: Phase,
    pub completed: bool,
    pub question_count: u32,
    pub derived_question_count: u32,
    pub candidate_question_count: u32,
    pub conversation: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
}

pub struct Interviewer {
    gateway: LlmGateway,
    store: Arc<dyn SessionStore>,
    locks: SessionLocks,
    persona: String,
}

impl Interviewer {
    pub fn new(gateway: LlmGateway, store: Arc<dyn SessionStore>, persona: String) -> Self {
        Self {
            gateway,
            store,
            locks: SessionLocks::new(),
            persona,
        }
    }

    pub fn store_backend(&self) -> &'static str {
        self.store.backend()
    }

    /// POST /start: new session in WELCOME with the welcome message.
    pub async fn start(&self) -> Result<MessageResponse, InterviewError> {
        let id = Uuid::new_v4();
        let _guard = self.locks.acquire(id).await;
        let mut session = InterviewSession::new(id);

        let message = self
            .utterance(&prompts::welcome(&self.persona), WELCOME_RULES, "welcome")
            .await
            .unwrap_or_else(|| fallback::welcome(&self.persona));
        session.push(Message::assistant(message.clone()));
        self.store.save(&session).await?;

        info!(interview_id = %id, "Interview started");
        Ok(reply(&session, message))
    }

    pub async fn explain(&self, id: Uuid) -> Result<MessageResponse, InterviewError> {
        let _guard = self.locks.acquire(id).await;
        let mut session = self.load(id).await?;
        session.phase.require(Phase::Welcome)?;

        let message = self
            .utterance(
                &prompts::explanation(&self.persona, TOTAL_QUESTIONS),
                EXPLANATION_RULES,
                "explanation",
            )
            .await
            .unwrap_or_else(|| fallback::EXPLANATION.to_string());
        session.push(Message::assistant(message.clone()));
        self.advance(&mut session, Phase::Explanation)?;
        self.store.save(&session).await?;

        Ok(reply(&session, message))
    }

    pub async fn first_question(&self, id: Uuid) -> Result<FirstQuestionResponse, InterviewError> {
        let _guard = self.locks.acquire(id).await;
        let mut session = self.load(id).await?;
        session.phase.require(Phase::Explanation)?;

        let question = self
            .utterance(
                &prompts::first_question(&self.persona),
                QUESTION_RULES,
                "first question",
            )
            .await
            .unwrap_or_else(|| fallback::FIRST_QUESTION.to_string());
        session.push(Message::assistant(question.clone()));
        session.question_count = 1;
        self.advance(&mut session, Phase::Questions)?;
        self.store.save(&session).await?;

        Ok(FirstQuestionResponse {
            interview_id: id,
            phase: session.phase,
            question,
            question_number: session.question_count,
            total_questions: TOTAL_QUESTIONS,
            timestamp: Utc::now(),
        })
    }

    /// Comments on the answer to the current question and asks the next one.
    ///
    /// The answer to question `TOTAL_QUESTIONS` ends the question phase no
    /// matter what the model proposes.
    pub async fn analyze_and_respond(
        &self,
        id: Uuid,
        answer: &str,
    ) -> Result<AnalyzeResponse, InterviewError> {
        let _guard = self.locks.acquire(id).await;
        let mut session = self.load(id).await?;
        session.phase.require(Phase::Questions)?;

        let number = session.question_count;
        let current_question = session
            .last_assistant_message()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let prompt = prompts::analyze(&AnalyzeContext {
            persona: &self.persona,
            history: &session.messages,
            current_question: &current_question,
            answer,
            number,
            total: TOTAL_QUESTIONS,
        });
        session.push(Message::user(answer));

        let mut decision = match self
            .gateway
            .generate_with(&prompt, |text| parse_decision(text).map_err(LlmError::from))
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                error!(interview_id = %id, error = %e, "Answer analysis failed, using fallback decision");
                fallback::decision()
            }
        };
        session.push(Message::assistant(decision.comment.clone()));

        let mut transition = false;
        let pending_question = if number >= TOTAL_QUESTIONS {
            if decision.next_question.is_some() || decision.should_ask_follow_up {
                warn!(interview_id = %id, number, "Question budget spent, discarding proposed question");
            }
            decision.next_question = None;
            decision.follow_up_question = None;
            decision.should_ask_follow_up = false;
            decision.should_continue_to_next = false;
            self.advance(&mut session, Phase::CandidateQuestions)?;
            transition = true;
            None
        } else if let Some(follow_up) = decision
            .follow_up_question
            .clone()
            .filter(|_| decision.should_ask_follow_up)
        {
            session.push(Message::assistant(follow_up.clone()));
            Some(follow_up)
        } else {
            decision.should_ask_follow_up = false;
            decision.follow_up_question = None;
            let next = decision
                .next_question
                .get_or_insert_with(|| CONTINUATION_QUESTION.to_string())
                .clone();
            session.push(Message::assistant(next.clone()));
            session.question_count += 1;
            Some(next)
        };

        debug!(
            interview_id = %id,
            question_count = session.question_count,
            derived = count_primary_questions(&session.messages),
            "Question count"
        );
        self.store.save(&session).await?;

        Ok(AnalyzeResponse {
            interview_id: id,
            comment: decision.comment,
            should_ask_follow_up: decision.should_ask_follow_up,
            follow_up_question: decision.follow_up_question,
            should_continue_to_next: decision.should_continue_to_next,
            next_question: pending_question,
            reasoning: decision.reasoning,
            source: decision.source,
            question_number: session.question_count,
            total_questions: TOTAL_QUESTIONS,
            phase: session.phase,
            should_transition_to_candidate_questions: transition,
            timestamp: Utc::now(),
        })
    }

    pub async fn invite_candidate_questions(
        &self,
        id: Uuid,
    ) -> Result<MessageResponse, InterviewError> {
        let _guard = self.locks.acquire(id).await;
        let mut session = self.load(id).await?;
        session.phase.require(Phase::CandidateQuestions)?;
        if session.candidate_question_count > 0 {
            return Err(InterviewError::Conflict(
                "candidate questions have already started".to_string(),
            ));
        }

        let message = self
            .utterance(
                &prompts::candidate_invitation(&self.persona, TOTAL_QUESTIONS),
                CLOSING_RULES,
                "candidate invitation",
            )
            .await
            .unwrap_or_else(|| fallback::CANDIDATE_INVITATION.to_string());
        session.push(Message::assistant(message.clone()));
        self.store.save(&session).await?;

        Ok(reply(&session, message))
    }

    pub async fn answer_candidate_question(
        &self,
        id: Uuid,
        question: &str,
    ) -> Result<CandidateAnswerResponse, InterviewError> {
        let _guard = self.locks.acquire(id).await;
        let mut session = self.load(id).await?;
        session.phase.require(Phase::CandidateQuestions)?;
        if session.candidate_question_count >= CANDIDATE_QUESTION_LIMIT {
            return Err(InterviewError::Conflict(format!(
                "candidate question limit of {CANDIDATE_QUESTION_LIMIT} reached"
            )));
        }

        let prompt = prompts::candidate_answer(&self.persona, &session.messages, question);
        session.push(Message::user(question));
        let answer = self
            .utterance(&prompt, CANDIDATE_ANSWER_RULES, "candidate answer")
            .await
            .unwrap_or_else(|| fallback::CANDIDATE_ANSWER.to_string());
        session.push(Message::assistant(answer.clone()));
        session.candidate_question_count += 1;
        self.store.save(&session).await?;

        Ok(CandidateAnswerResponse {
            interview_id: id,
            answer,
            question_count: session.candidate_question_count,
            should_proceed_to_farewell: session.candidate_question_count
                >= CANDIDATE_QUESTION_LIMIT,
            timestamp: Utc::now(),
        })
    }

    pub async fn farewell(&self, id: Uuid) -> Result<MessageResponse, InterviewError> {
        let _guard = self.locks.acquire(id).await;
        let mut session = self.load(id).await?;
        session.phase.require(Phase::CandidateQuestions)?;

        let message = self
            .utterance(&prompts::farewell(&self.persona), CLOSING_RULES, "farewell")
            .await
            .unwrap_or_else(|| fallback::FAREWELL.to_string());
        session.push(Message::assistant(message.clone()));
        self.advance(&mut session, Phase::Farewell)?;
        self.store.save(&session).await?;

        Ok(reply(&session, message))
    }

    pub async fn complete(&self, id: Uuid) -> Result<CompleteResponse, InterviewError> {
        let _guard = self.locks.acquire(id).await;
        let mut session = self.load(id).await?;
        session.phase.require(Phase::Farewell)?;

        self.advance(&mut session, Phase::Completed)?;
        session.updated_at = Utc::now();
        self.store.save(&session).await?;

        Ok(CompleteResponse {
            interview_id: id,
            phase: session.phase,
            completed: true,
            conversation_length: session.messages.len(),
            evaluation_url: format!("/evaluation/{id}"),
            timestamp: Utc::now(),
        })
    }

    pub async fn conversation(&self, id: Uuid) -> Result<ConversationView, InterviewError> {
        let session = self.load(id).await?;
        Ok(ConversationView {
            interview_id: id,
            phase: session.phase,
            completed: session.phase.is_terminal(),
            question_count: session.question_count,
            derived_question_count: count_primary_questions(&session.messages),
            candidate_question_count: session.candidate_question_count,
            conversation: session.messages,
            created_at: session.created_at,
            updated_at: session.updated_at,
            timestamp: Utc::now(),
        })
    }

    async fn load(&self, id: Uuid) -> Result<InterviewSession, InterviewError> {
        self.store
            .load(id)
            .await?
            .ok_or(InterviewError::NotFound(id))
    }

    fn advance(&self, session: &mut InterviewSession, to: Phase) -> Result<(), PhaseError> {
        let from = session.phase;
        session.phase = from.transition(to)?;
        info!(interview_id = %session.interview_id, %from, %to, "Phase transition");
        Ok(())
    }

    /// Free-text generation; `None` means the caller should use its fallback.
    async fn utterance(&self, prompt: &str, rules: UtteranceRules, what: &str) -> Option<String> {
        match self
            .gateway
            .generate_with(prompt, |text| {
                parse_utterance(text, rules).map_err(LlmError::from)
            })
            .await
        {
            Ok(text) => Some(text),
            Err(e) => {
                error!(error = %e, "Generating {what} failed, using fallback");
                None
            }
        }
    }
}

fn reply(session: &InterviewSession, message: String) -> MessageResponse {
    MessageResponse {
        interview_id: session.interview_id,
        phase: session.phase,
        message,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::store::InMemorySessionStore;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::RetryPolicy;

    const DECISION_WITH_NEXT: &str = r#"{
        "comment": "That is a thoughtful answer about your background in systems work.",
        "shouldAskFollowUp": false,
        "followUpQuestion": null,
        "shouldContinueToNext": true,
        "nextQuestion": "What project are you most proud of and why?",
        "reasoning": "clear answer"
    }"#;

    const DECISION_WITH_FOLLOW_UP: &str = r#"{
        "comment": "You mentioned leading a migration, which sounds like a big effort.",
        "shouldAskFollowUp": true,
        "followUpQuestion": "What was the hardest part of that migration for you?",
        "shouldContinueToNext": false,
        "nextQuestion": null,
        "reasoning": "answer was vague"
    }"#;

    struct Fixture {
        interviewer: Interviewer,
        store: Arc<InMemorySessionStore>,
        generator: Arc<ScriptedGenerator>,
    }

    fn fixture(generator: ScriptedGenerator) -> Fixture {
        let generator = Arc::new(generator);
        let store = Arc::new(InMemorySessionStore::new());
        let gateway = LlmGateway::new(generator.clone(), RetryPolicy::default());
        Fixture {
            interviewer: Interviewer::new(gateway, store.clone(), "Zavi".to_string()),
            store,
            generator,
        }
    }

    async fn seed(store: &InMemorySessionStore, phase: Phase, question_count: u32) -> Uuid {
        let mut session = InterviewSession::new(Uuid::new_v4());
        session.phase = phase;
        session.question_count = question_count;
        session.push(Message::assistant("Tell me about a recent project of yours."));
        store.save(&session).await.unwrap();
        session.interview_id
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_failures_yield_fallback_decision() {
        let f = fixture(ScriptedGenerator::failing());
        let id = seed(&f.store, Phase::Questions, 1).await;

        let res = f
            .interviewer
            .analyze_and_respond(id, "I have worked on distributed databases.")
            .await
            .unwrap();

        assert_eq!(f.generator.calls(), 3);
        assert_eq!(res.comment, fallback::DECISION_COMMENT);
        assert_eq!(res.reasoning, "fallback");
        assert_eq!(res.source, DecisionSource::Fallback);
        assert_eq!(res.next_question.as_deref(), Some(CONTINUATION_QUESTION));
        assert!(!res.should_ask_follow_up);
        assert_eq!(res.question_number, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fifth_answer_never_yields_next_question() {
        let f = fixture(ScriptedGenerator::replying(&[DECISION_WITH_NEXT]));
        let id = seed(&f.store, Phase::Questions, TOTAL_QUESTIONS).await;

        let res = f
            .interviewer
            .analyze_and_respond(id, "I would like to grow into a staff role.")
            .await
            .unwrap();

        assert!(res.next_question.is_none());
        assert!(res.follow_up_question.is_none());
        assert!(!res.should_ask_follow_up);
        assert!(res.should_transition_to_candidate_questions);
        assert_eq!(res.phase, Phase::CandidateQuestions);
        assert_eq!(res.question_number, TOTAL_QUESTIONS);

        let stored = f.store.load(id).await.unwrap().unwrap();
        assert_eq!(stored.phase, Phase::CandidateQuestions);
        assert_eq!(
            stored.messages.last().unwrap().content,
            "That is a thoughtful answer about your background in systems work."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_cycles_transition_exactly_once() {
        let f = fixture(ScriptedGenerator::failing());
        let id = f.interviewer.start().await.unwrap().interview_id;
        f.interviewer.explain(id).await.unwrap();
        let first = f.interviewer.first_question(id).await.unwrap();
        assert_eq!(first.question_number, 1);

        let mut transitions = 0;
        for _ in 0..TOTAL_QUESTIONS {
            let res = f
                .interviewer
                .analyze_and_respond(id, "Here is my answer to that question.")
                .await
                .unwrap();
            if res.should_transition_to_candidate_questions {
                transitions += 1;
            }
        }
        assert_eq!(transitions, 1);

        let again = f
            .interviewer
            .analyze_and_respond(id, "One more answer.")
            .await;
        assert!(matches!(again, Err(InterviewError::Phase(_))));

        let view = f.interviewer.conversation(id).await.unwrap();
        assert_eq!(view.phase, Phase::CandidateQuestions);
        assert_eq!(view.question_count, TOTAL_QUESTIONS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_follow_up_does_not_advance_count() {
        let f = fixture(ScriptedGenerator::replying(&[DECISION_WITH_FOLLOW_UP]));
        let id = seed(&f.store, Phase::Questions, 2).await;

        let res = f
            .interviewer
            .analyze_and_respond(id, "I led a migration once.")
            .await
            .unwrap();

        assert!(res.should_ask_follow_up);
        assert_eq!(res.question_number, 2);
        assert_eq!(
            res.next_question.as_deref(),
            Some("What was the hardest part of that migration for you?")
        );
        let stored = f.store.load(id).await.unwrap().unwrap();
        assert_eq!(stored.question_count, 2);
        assert_eq!(stored.messages.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_question_advances_count() {
        let f = fixture(ScriptedGenerator::replying(&[DECISION_WITH_NEXT]));
        let id = seed(&f.store, Phase::Questions, 3).await;

        let res = f
            .interviewer
            .analyze_and_respond(id, "I enjoy debugging hard problems.")
            .await
            .unwrap();

        assert_eq!(res.question_number, 4);
        assert_eq!(res.source, DecisionSource::Model);
        assert!(!res.should_transition_to_candidate_questions);
    }

    #[tokio::test(start_paused = true)]
    async fn test_conversational_reply_is_salvaged() {
        let f = fixture(ScriptedGenerator::replying(&[
            "Thanks for walking me through your migration project. It shows real ownership. \
             Let me think about what to ask next",
        ]));
        let id = seed(&f.store, Phase::Questions, 1).await;

        let res = f
            .interviewer
            .analyze_and_respond(id, "I migrated our billing system.")
            .await
            .unwrap();

        assert_eq!(f.generator.calls(), 1);
        assert_eq!(res.source, DecisionSource::Salvaged);
        assert_eq!(res.next_question.as_deref(), Some(CONTINUATION_QUESTION));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_interview_is_not_found() {
        let f = fixture(ScriptedGenerator::failing());
        let id = Uuid::new_v4();

        assert!(matches!(
            f.interviewer.explain(id).await,
            Err(InterviewError::NotFound(got)) if got == id
        ));
        assert!(matches!(
            f.interviewer.first_question(id).await,
            Err(InterviewError::NotFound(_))
        ));
        assert!(matches!(
            f.interviewer.conversation(id).await,
            Err(InterviewError::NotFound(_))
        ));
        assert_eq!(f.generator.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_is_checked_before_calling_model() {
        let f = fixture(ScriptedGenerator::failing());
        let id = seed(&f.store, Phase::Welcome, 0).await;

        let err = f.interviewer.first_question(id).await.unwrap_err();
        assert!(matches!(err, InterviewError::Phase(_)));
        assert_eq!(f.generator.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_welcome_is_used_when_valid() {
        let f = fixture(ScriptedGenerator::replying(&[
            "Hi, I'm Zavi, your virtual interviewer. I'm really glad to meet you today!",
        ]));
        let res = f.interviewer.start().await.unwrap();
        assert_eq!(res.phase, Phase::Welcome);
        assert!(res.message.starts_with("Hi, I'm Zavi"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_persona_breaking_welcome_falls_back() {
        let off_persona = "As an AI language model, I am happy to interview you today.";
        let f = fixture(ScriptedGenerator::replying(&[off_persona; 3]));
        let res = f.interviewer.start().await.unwrap();
        assert_eq!(f.generator.calls(), 3);
        assert_eq!(res.message, fallback::welcome("Zavi"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_candidate_question_limit() {
        let f = fixture(ScriptedGenerator::failing());
        let id = seed(&f.store, Phase::CandidateQuestions, TOTAL_QUESTIONS).await;

        f.interviewer.invite_candidate_questions(id).await.unwrap();
        let res = f
            .interviewer
            .answer_candidate_question(id, "What does a typical week look like?")
            .await
            .unwrap();
        assert_eq!(res.question_count, 1);
        assert!(res.should_proceed_to_farewell);
        assert_eq!(res.answer, fallback::CANDIDATE_ANSWER);

        assert!(matches!(
            f.interviewer
                .answer_candidate_question(id, "And the team size?")
                .await,
            Err(InterviewError::Conflict(_))
        ));
        assert!(matches!(
            f.interviewer.invite_candidate_questions(id).await,
            Err(InterviewError::Conflict(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_farewell_and_complete_release_lock() {
        let f = fixture(ScriptedGenerator::failing());
        let id = seed(&f.store, Phase::CandidateQuestions, TOTAL_QUESTIONS).await;

        let bye = f.interviewer.farewell(id).await.unwrap();
        assert_eq!(bye.phase, Phase::Farewell);
        let done = f.interviewer.complete(id).await.unwrap();
        assert!(done.completed);
        assert_eq!(done.phase, Phase::Completed);
        assert_eq!(done.evaluation_url, format!("/evaluation/{id}"));
        assert_eq!(f.interviewer.locks.len(), 0);

        assert!(matches!(
            f.interviewer.complete(id).await,
            Err(InterviewError::Phase(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lock_table_does_not_grow_with_unknown_or_abandoned_ids() {
        let f = fixture(ScriptedGenerator::failing());
        for _ in 0..1000 {
            let res = f.interviewer.explain(Uuid::new_v4()).await;
            assert!(matches!(res, Err(InterviewError::NotFound(_))));
        }
        for _ in 0..10 {
            f.interviewer.start().await.unwrap();
        }
        assert_eq!(f.interviewer.locks.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analyze_prompt_carries_question_number_and_answer() {
        let f = fixture(ScriptedGenerator::replying(&[DECISION_WITH_NEXT]));
        let id = seed(&f.store, Phase::Questions, 3).await;

        f.interviewer
            .analyze_and_respond(id, "I profile before I optimize.")
            .await
            .unwrap();

        let prompts = f.generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("QUESTION NUMBER: 3 of 5"));
        assert!(prompts[0].contains("CANDIDATE'S ANSWER: \"I profile before I optimize.\""));
        assert!(prompts[0].contains("Zavi: Tell me about a recent project of yours."));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_answers_are_serialized() {
        let f = Arc::new(fixture(ScriptedGenerator::failing()));
        let id = seed(&f.store, Phase::Questions, 1).await;

        let a = {
            let f = f.clone();
            tokio::spawn(async move { f.interviewer.analyze_and_respond(id, "first").await })
        };
        let b = {
            let f = f.clone();
            tokio::spawn(async move { f.interviewer.analyze_and_respond(id, "second").await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let stored = f.store.load(id).await.unwrap().unwrap();
        assert_eq!(stored.question_count, 3);
        assert_eq!(stored.messages.len(), 7);
    }
}
