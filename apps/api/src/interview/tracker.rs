//! History-derived question count.
//!
//! The session's `question_count` is the authoritative counter. This scan
//! reconstructs it from message shape alone and is kept as a diagnostic: an
//! assistant message counts as a primary question when it opens the
//! conversation or directly follows a user message. A follow-up, which is the
//! second of two consecutive assistant messages, does not count.
//! Two assistant messages in a row for any other reason will skew the result.

use crate::interview::models::{Message, Role};

pub fn count_primary_questions(messages: &[Message]) -> u32 {
    let mut count = 0;
    let mut previous_was_user = true;
    for message in messages {
        match message.role {
            Role::Assistant => {
                if previous_was_user {
                    count += 1;
                }
                previous_was_user = false;
            }
            Role::User => previous_was_user = true,
        }
    }
    count
}
