// Assessment LLM prompt templates.

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};

const QUESTION_PROMPT: &str = "\
You are an expert technology recruiter. Write ONE interview question for a {difficulty}-level {role}.

Category: {category}
- technical: knowledge, code, architecture
- behavioral: behaviour, teamwork, leadership
- situational: hypothetical situations and problem solving

Examples of good questions:
- technical: \"How would you implement a caching layer for a high-traffic web application?\"
- behavioral: \"Tell me about a time you had to resolve a conflict with a teammate.\"
- situational: \"What would you do if you found a critical production bug five minutes before a demo?\"
{previous}

Reply with the question only, without any introduction or commentary.";

const EVALUATION_PROMPT: &str = "\
You are an expert technical interview assessor. Evaluate this candidate answer for a {role} position.

QUESTION: \"{question}\"

CANDIDATE'S ANSWER: \"{answer}\"

Score the answer on:
1. Technical accuracy (1-10)
2. Communication clarity (1-10)
3. Completeness (1-10)

REPLY FORMAT:
{
  \"score\": <1-10>,
  \"feedback\": \"overall feedback, at most 100 words\",
  \"strengths\": [\"strength 1\", \"strength 2\"],
  \"improvements\": [\"improvement 1\", \"improvement 2\"],
  \"technical_accuracy\": <1-10>,
  \"communication_clarity\": <1-10>,
  \"completeness\": <1-10>
}
{json_only}";

pub fn question(role: &str, difficulty: &str, category: &str, previous: &[String]) -> String {
    let previous = if previous.is_empty() {
        String::new()
    } else {
        let listed: Vec<String> = previous.iter().map(|q| format!("- {q}")).collect();
        format!(
            "\nAlready asked in this interview, do NOT repeat or rephrase these:\n{}\n",
            listed.join("\n")
        )
    };
    render(
        QUESTION_PROMPT,
        &[
            ("difficulty", difficulty),
            ("category", category),
            ("role", role),
            ("previous", &previous),
        ],
    )
}

pub fn evaluation(question: &str, answer: &str, role: &str) -> String {
    render(
        EVALUATION_PROMPT,
        &[
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("role", role),
            ("question", question),
            ("answer", answer),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_lists_previous_questions() {
        let first = question("backend engineer", "mid", "technical", &[]);
        assert!(!first.contains("Already asked"));
        assert!(!first.contains("{previous}"));

        let asked = vec!["How does TCP slow start work?".to_string()];
        let next = question("backend engineer", "mid", "technical", &asked);
        assert!(next.contains("Already asked in this interview"));
        assert!(next.contains("- How does TCP slow start work?"));
        assert!(next.contains("mid-level backend engineer"));
    }

    #[test]
    fn test_evaluation_keeps_braces_in_answer() {
        let prompt = evaluation("What is {role}?", "I'd return {question} as is", "engineer");
        assert!(prompt.contains("for a engineer position"));
        assert!(prompt.contains("QUESTION: \"What is {role}?\""));
        assert!(prompt.contains("CANDIDATE'S ANSWER: \"I'd return {question} as is\""));
        assert!(!prompt.contains("{json_only}"));
    }
}
