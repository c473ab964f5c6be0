//! Interview lifecycle.
//!
//! WELCOME → EXPLANATION → QUESTIONS → CANDIDATE_QUESTIONS → FAREWELL → COMPLETED
//!
//! Transitions only ever move one step forward. Each one is triggered by an
//! explicit HTTP call; nothing advances on its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Welcome,
    Explanation,
    Questions,
    CandidateQuestions,
    Farewell,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhaseError {
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: Phase, to: Phase },

    #[error("operation requires phase {expected}, interview is in {actual}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("unknown phase '{0}'")]
    Unknown(String),
}

impl Phase {
    pub const ALL: [Phase; 6] = [
        Phase::Welcome,
        Phase::Explanation,
        Phase::Questions,
        Phase::CandidateQuestions,
        Phase::Farewell,
        Phase::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Welcome => "WELCOME",
            Phase::Explanation => "EXPLANATION",
            Phase::Questions => "QUESTIONS",
            Phase::CandidateQuestions => "CANDIDATE_QUESTIONS",
            Phase::Farewell => "FAREWELL",
            Phase::Completed => "COMPLETED",
        }
    }

    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Welcome => Some(Phase::Explanation),
            Phase::Explanation => Some(Phase::Questions),
            Phase::Questions => Some(Phase::CandidateQuestions),
            Phase::CandidateQuestions => Some(Phase::Farewell),
            Phase::Farewell => Some(Phase::Completed),
            Phase::Completed => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    /// Validates a move to `to`. Only the immediate successor is allowed.
    pub fn transition(self, to: Phase) -> Result<Phase, PhaseError> {
        if self.next() == Some(to) {
            Ok(to)
        } else {
            Err(PhaseError::InvalidTransition { from: self, to })
        }
    }

    pub fn require(self, expected: Phase) -> Result<(), PhaseError> {
        if self == expected {
            Ok(())
        } else {
            Err(PhaseError::WrongPhase {
                expected,
                actual: self,
            })
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = PhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PhaseError::Unknown(s.to_string()))
    }
}
