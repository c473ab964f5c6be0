//! Deterministic replies used when the gateway gives up or is not configured.
//!
//! These are deliberately plain and context-free so they are never mistaken
//! for a real model decision.

use crate::interview::models::{Decision, DecisionSource};

pub const EXPLANATION: &str = "Here is how our interview will work. First, I will ask you five \
questions to get to know your experience and skills. After that, you will have the chance to ask \
me about the company and the role. Finally, I will put everything together to give you useful \
feedback on your performance.";

pub const FIRST_QUESTION: &str = "To get started, I would love to get to know you better. Tell me \
about your professional journey, the experiences that shaped you, and what you enjoy most about \
your field.";

/// Used whenever a new primary question is needed and the model did not supply one.
pub const CONTINUATION_QUESTION: &str =
    "Could you tell me more about your professional experience?";

pub const DECISION_COMMENT: &str = "Thank you, I understand. Let's keep going with the interview.";

pub const CANDIDATE_INVITATION: &str = "Great, that wraps up my questions. Now it's your turn: do \
you have any questions for me about the role or the company?";

pub const CANDIDATE_ANSWER: &str = "That's a great question. In this role you would work on \
challenging projects with modern technology, in a collaborative team that values continuous \
learning. Our HR team can share specific details about benefits and compensation.";

pub const FAREWELL: &str = "Thank you so much for your time and your answers. It was a pleasure \
talking with you. I will now put together your personalised evaluation. Best of luck!";

pub fn welcome(persona: &str) -> String {
    format!(
        "Hello! I'm {persona}, your virtual interviewer. It's a pleasure to meet you, and I'm \
         really looking forward to this conversation. My goal is to make this a comfortable space \
         where you can share your experience and show your talent. I'm ready whenever you are!"
    )
}

pub fn decision() -> Decision {
    Decision {
        comment: DECISION_COMMENT.to_string(),
        should_ask_follow_up: false,
        follow_up_question: None,
        should_continue_to_next: true,
        next_question: Some(CONTINUATION_QUESTION.to_string()),
        reasoning: "fallback".to_string(),
        source: DecisionSource::Fallback,
    }
}
