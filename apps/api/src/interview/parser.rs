//! Response Parser: turns free-form model output into a `Decision`.
//!
//! Pipeline: strip code fences → isolate `{ … }` → deserialize → validate.
//! When the JSON is missing or fails validation, the prose around it is tried
//! as a conversational reply ("salvage"). Anything that still does not pass
//! is an error, which the gateway counts as a failed attempt.
//!
//! Validation is structural and language-agnostic: minimum lengths, no JSON
//! leaking into text fields, and text must end on sentence punctuation.

use serde::Deserialize;
use thiserror::Error;

use crate::interview::fallback::CONTINUATION_QUESTION;
use crate::interview::models::{Decision, DecisionSource};
use crate::llm_client::prompts::PERSONA_BREAKERS;
use crate::llm_client::{json_object_bounds, strip_code_fences, LlmError};

pub const MIN_COMMENT_CHARS: usize = 30;
pub const MIN_QUESTION_CHARS: usize = 20;

const DEFAULT_REASONING: &str = "model decision";
const SALVAGE_REASONING: &str = "conversational reply converted";
const SALVAGE_SENTENCES: usize = 2;

/// Markers of a decision object that leaked into a text field.
const DECISION_KEYS: &[&str] = &[
    "\"comment\"",
    "\"nextQuestion\"",
    "\"shouldAskFollowUp\"",
    "\"followUpQuestion\"",
    "\"shouldContinueToNext\"",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("no JSON object found in model output")]
    NoJson,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("`comment` is missing or empty")]
    MissingComment,

    #[error("`{field}` is too short ({actual} chars, minimum {min})")]
    TooShort {
        field: &'static str,
        actual: usize,
        min: usize,
    },

    #[error("`{0}` embeds a JSON object")]
    EmbeddedJson(&'static str),

    #[error("`{0}` ends mid-sentence")]
    Truncated(&'static str),

    #[error("output breaks the interviewer persona")]
    BreaksPersona,
}

impl From<ParseError> for LlmError {
    fn from(e: ParseError) -> Self {
        LlmError::Rejected(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDecision {
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    should_ask_follow_up: Option<bool>,
    #[serde(default)]
    follow_up_question: Option<String>,
    #[serde(default)]
    should_continue_to_next: Option<bool>,
    #[serde(default)]
    next_question: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Parses the model's reply to an answer-analysis prompt.
pub fn parse_decision(text: &str) -> Result<Decision, ParseError> {
    let cleaned = strip_code_fences(text);

    let Some(bounds) = json_object_bounds(&cleaned) else {
        return salvage(&cleaned).ok_or(ParseError::NoJson);
    };

    match decode_decision(&cleaned[bounds.clone()]) {
        Ok(decision) => Ok(decision),
        Err(err) => {
            let prose = format!("{} {}", &cleaned[..bounds.start], &cleaned[bounds.end..]);
            salvage(&prose).ok_or(err)
        }
    }
}

fn decode_decision(json: &str) -> Result<Decision, ParseError> {
    let raw: RawDecision =
        serde_json::from_str(json).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let comment = raw.comment.ok_or(ParseError::MissingComment)?;
    if embeds_json(&comment) {
        return Err(ParseError::EmbeddedJson("comment"));
    }
    let comment = clean_text(&comment);
    if comment.is_empty() {
        return Err(ParseError::MissingComment);
    }
    validate_sentence("comment", &comment, MIN_COMMENT_CHARS)?;

    let follow_up_question = normalize_question("followUpQuestion", raw.follow_up_question)?;
    let next_question = normalize_question("nextQuestion", raw.next_question)?;

    Ok(Decision {
        comment,
        should_ask_follow_up: raw.should_ask_follow_up.unwrap_or(false),
        follow_up_question,
        should_continue_to_next: raw.should_continue_to_next.unwrap_or(true),
        next_question,
        reasoning: raw
            .reasoning
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| DEFAULT_REASONING.to_string()),
        source: DecisionSource::Model,
    })
}

fn normalize_question(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<String>, ParseError> {
    let Some(value) = value else {
        return Ok(None);
    };
    if embeds_json(&value) {
        return Err(ParseError::EmbeddedJson(field));
    }
    let question = clean_text(&value);
    if question.is_empty() || question.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    let actual = question.chars().count();
    if actual < MIN_QUESTION_CHARS {
        return Err(ParseError::TooShort {
            field,
            actual,
            min: MIN_QUESTION_CHARS,
        });
    }
    Ok(Some(question))
}

/// Builds a decision from a plain conversational reply.
fn salvage(text: &str) -> Option<Decision> {
    if embeds_json(text) {
        return None;
    }
    let comment = leading_sentences(&clean_text(text), SALVAGE_SENTENCES).to_string();
    validate_sentence("comment", &comment, MIN_COMMENT_CHARS).ok()?;

    Some(Decision {
        comment,
        should_ask_follow_up: false,
        follow_up_question: None,
        should_continue_to_next: true,
        next_question: Some(CONTINUATION_QUESTION.to_string()),
        reasoning: SALVAGE_REASONING.to_string(),
        source: DecisionSource::Salvaged,
    })
}

/// Rules for a free-text utterance (welcome, explanation, answers…).
#[derive(Debug, Clone, Copy)]
pub struct UtteranceRules {
    pub min_chars: usize,
    pub require_terminal: bool,
}

/// Validates a free-text reply and returns it cleaned.
pub fn parse_utterance(text: &str, rules: UtteranceRules) -> Result<String, ParseError> {
    let text = clean_text(&strip_code_fences(text));
    if embeds_json(&text) {
        return Err(ParseError::EmbeddedJson("message"));
    }
    let lowered = text.to_lowercase();
    if PERSONA_BREAKERS.iter().any(|p| lowered.contains(p)) {
        return Err(ParseError::BreaksPersona);
    }
    let actual = text.chars().count();
    if actual < rules.min_chars {
        return Err(ParseError::TooShort {
            field: "message",
            actual,
            min: rules.min_chars,
        });
    }
    if rules.require_terminal && !ends_on_sentence(&text) {
        return Err(ParseError::Truncated("message"));
    }
    Ok(text)
}

fn validate_sentence(field: &'static str, text: &str, min: usize) -> Result<(), ParseError> {
    let actual = text.chars().count();
    if actual < min {
        return Err(ParseError::TooShort { field, actual, min });
    }
    if !ends_on_sentence(text) {
        return Err(ParseError::Truncated(field));
    }
    Ok(())
}

fn embeds_json(text: &str) -> bool {
    DECISION_KEYS.iter().any(|k| text.contains(k)) || json_object_bounds(text).is_some()
}

fn ends_on_sentence(text: &str) -> bool {
    text.trim_end()
        .chars()
        .last()
        .is_some_and(|c| matches!(c, '.' | '!' | '?' | '…' | '"' | '\'' | ')' | '»' | '”'))
}

/// Collapses whitespace, drops wrapping quotes and a stray `comment:` label.
fn clean_text(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = strip_quotes(&collapsed);
    let without_label = match trimmed.get(..8) {
        Some(prefix) if prefix.eq_ignore_ascii_case("comment:") => &trimmed[8..],
        _ => trimmed,
    };
    strip_quotes(without_label).to_string()
}

fn strip_quotes(text: &str) -> &str {
    text.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Returns the text up to and including the `count`-th sentence terminator.
fn leading_sentences(text: &str, count: usize) -> &str {
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen == count {
                    return &text[..idx + c.len_utf8()];
                }
            }
        }
    }
    text
}
