// Interview LLM prompt templates.
// All prompts for the interview module are defined here.

use crate::interview::models::{Message, Role};
use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION, PERSONA_GUARDRAILS};

/// How many recent messages are replayed to the model as context.
pub const CONTEXT_WINDOW: usize = 6;

const WELCOME_PROMPT: &str = "\
You are {persona}, a professional and empathetic virtual interviewer.

TASK: Welcome the candidate to the interview.
- Introduce yourself as \"{persona}, your virtual interviewer\".
- Give a warm, professional welcome and say you are glad to meet them.
- Help them feel comfortable.
- Write 3-4 complete sentences.
{guardrails}

Reply with the welcome message only.";

const EXPLANATION_PROMPT: &str = "\
You are {persona}, the virtual interviewer who has already introduced yourself.

TASK: Explain how the interview will work, clearly and encouragingly.
STRUCTURE:
1. You will ask the candidate {total} questions.
2. The candidate can then ask you about the company and the role.
3. Farewell and final evaluation.

- Do NOT introduce yourself again or say hello.
- Use 3-4 complete sentences and mention it will be a natural conversation.
{guardrails}

Reply with the explanation only.";

const FIRST_QUESTION_PROMPT: &str = "\
You are {persona}, the virtual interviewer who has just explained the process.

TASK: Ask the FIRST interview question so the candidate can introduce themselves.
- Do NOT introduce yourself again or say hello.
- Ask an open question about their experience and career path.
- Keep it to 2-3 sentences with a conversational tone.
{guardrails}

Reply with the question only.";

const ANALYZE_PROMPT: &str = "\
You are {persona}, a professional and empathetic virtual interviewer.

RECENT CONVERSATION:
{transcript}

QUESTION BEING ANSWERED: \"{current_question}\"
CANDIDATE'S ANSWER: \"{answer}\"
QUESTION NUMBER: {number} of {total}{question_rules}

INSTRUCTIONS:
1. Read the candidate's answer carefully.
2. Write an empathetic comment (30-60 words) that mentions something specific they said.
3. If the answer is very short or vague, you may ask ONE specific follow-up question instead of moving on.
4. Otherwise provide the next interview question.
5. Ask only one question at a time and wait for the candidate.
{guardrails}

REPLY FORMAT:
{
  \"comment\": \"specific comment about the answer\",
  \"shouldAskFollowUp\": false,
  \"followUpQuestion\": null,
  \"shouldContinueToNext\": true,
  \"nextQuestion\": \"next relevant interview question\",
  \"reasoning\": \"short reason\"
}
{json_only}";

const LATE_QUESTION_RULES: &str = "
IMPORTANT: This is question {number} of {total}. Do NOT ask a follow-up question; \
only provide nextQuestion.";

const FINAL_QUESTION_RULES: &str = "
FINAL QUESTION: This is the last question. \"nextQuestion\" MUST be null and \
\"shouldAskFollowUp\" MUST be false. Only comment on the answer; do not thank the candidate \
or close the interview.";

const CANDIDATE_INVITATION_PROMPT: &str = "\
You are {persona}, a virtual interviewer who has just finished asking the candidate {total} questions.

TASK: Move to the part where the candidate can ask you questions.
- Briefly congratulate the candidate for completing the questions.
- Invite them to ask about the company or the role.
- Be warm and open. At most 3 sentences.
{guardrails}

Reply with the transition message only.";

const CANDIDATE_ANSWER_PROMPT: &str = "\
You are {persona}, an expert virtual interviewer at an innovative company.

RECENT CONVERSATION:
{transcript}

CANDIDATE'S QUESTION: \"{question}\"

ABOUT THE COMPANY AND ROLE:
- Growing, innovative company that values creativity and continuous learning
- Collaborative, inclusive and flexible environment with hybrid/remote options
- Professional development, mentoring and a feedback culture
- Challenging projects with modern technology and competitive benefits

INSTRUCTIONS:
- Answer honestly, professionally and completely (at least 60 words).
- If you lack exact information, say the HR team can provide details.
- Use a conversational, enthusiastic tone.
{guardrails}

Reply with the answer only.";

const FAREWELL_PROMPT: &str = "\
You are {persona}, a virtual interviewer finishing a successful interview.

TASK: Say goodbye to the candidate professionally and warmly.
- Thank them for their time and participation.
- Mention that you will prepare their evaluation.
- Be positive and motivating. At most 3 sentences.
{guardrails}

Reply with the farewell message only.";

pub fn welcome(persona: &str) -> String {
    fill(WELCOME_PROMPT, persona, &[])
}

pub fn explanation(persona: &str, total: u32) -> String {
    fill(EXPLANATION_PROMPT, persona, &[("total", &total.to_string())])
}

pub fn first_question(persona: &str) -> String {
    fill(FIRST_QUESTION_PROMPT, persona, &[])
}

pub struct AnalyzeContext<'a> {
    pub persona: &'a str,
    pub history: &'a [Message],
    pub current_question: &'a str,
    pub answer: &'a str,
    pub number: u32,
    pub total: u32,
}

pub fn analyze(ctx: &AnalyzeContext<'_>) -> String {
    let number = ctx.number.to_string();
    let total = ctx.total.to_string();
    let counts = [("number", number.as_str()), ("total", total.as_str())];
    let question_rules = if ctx.number >= ctx.total {
        FINAL_QUESTION_RULES.to_string()
    } else if ctx.number + 1 >= ctx.total {
        render(LATE_QUESTION_RULES, &counts)
    } else {
        String::new()
    };
    let transcript = transcript(ctx.persona, ctx.history);

    fill(
        ANALYZE_PROMPT,
        ctx.persona,
        &[
            counts[0],
            counts[1],
            ("json_only", JSON_ONLY_INSTRUCTION),
            ("question_rules", &question_rules),
            ("current_question", ctx.current_question),
            ("transcript", &transcript),
            ("answer", ctx.answer),
        ],
    )
}

pub fn candidate_invitation(persona: &str, total: u32) -> String {
    fill(
        CANDIDATE_INVITATION_PROMPT,
        persona,
        &[("total", &total.to_string())],
    )
}

pub fn candidate_answer(persona: &str, history: &[Message], question: &str) -> String {
    let transcript = transcript(persona, history);
    fill(
        CANDIDATE_ANSWER_PROMPT,
        persona,
        &[("transcript", &transcript), ("question", question)],
    )
}

pub fn farewell(persona: &str) -> String {
    fill(FAREWELL_PROMPT, persona, &[])
}

/// Single-pass fill: text from the candidate or the model is inserted as is.
fn fill(template: &str, persona: &str, vars: &[(&str, &str)]) -> String {
    let mut all = vec![("guardrails", PERSONA_GUARDRAILS), ("persona", persona)];
    all.extend_from_slice(vars);
    render(template, &all)
}

/// Renders the last `CONTEXT_WINDOW` messages as `Speaker: text` lines.
pub fn transcript(persona: &str, history: &[Message]) -> String {
    let start = history.len().saturating_sub(CONTEXT_WINDOW);
    history[start..]
        .iter()
        .map(|m| {
            let speaker = match m.role {
                Role::Assistant => persona,
                Role::User => "Candidate",
            };
            format!("{speaker}: {}", m.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
