// Shared prompt fragments.
// Each feature module that talks to the LLM keeps its own prompts.rs alongside it;
// this file holds the cross-cutting pieces.

/// Appended to every prompt that expects a structured reply.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Keeps the interviewer persona from breaking character.
pub const PERSONA_GUARDRAILS: &str = "\
    Never describe yourself as a model, an AI or a system. \
    Never add labels, prefixes or stage directions. \
    Always finish your last sentence.";

/// Phrases that give away a broken persona. Matched case-insensitively.
pub const PERSONA_BREAKERS: &[&str] = &[
    "language model",
    "as an ai",
    "ai model",
    "i am an ai",
    "i'm an ai",
];

/// Fills `{name}` placeholders in a single pass over `template`.
/// Inserted values are never rescanned, and braces that do not name a known
/// placeholder (JSON reply schemas) are kept as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let filled = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });
        match filled {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_known_placeholders() {
        assert_eq!(
            render("Hi {name}, you are {age}.", &[("name", "Ada"), ("age", "36")]),
            "Hi Ada, you are 36."
        );
    }

    #[test]
    fn test_render_keeps_unknown_braces() {
        let template = "{\n  \"score\": <1-10>\n} {who}";
        assert_eq!(
            render(template, &[("who", "me")]),
            "{\n  \"score\": <1-10>\n} me"
        );
    }

    #[test]
    fn test_render_does_not_rescan_inserted_values() {
        let out = render("{a}|{b}", &[("a", "{b}"), ("b", "B")]);
        assert_eq!(out, "{b}|B");
    }

    #[test]
    fn test_render_unterminated_brace() {
        assert_eq!(render("tail {open", &[("open", "x")]), "tail {open");
    }
}
