//! Prompt templates for the dialogue flow

use crate::protocol::markers::{CLARIFY_CLOSE, CLARIFY_OPEN, END_MARKER};
use crate::protocol::think::{THINK_CLOSE, THINK_OPEN};

/// Templates for the pieces of an agent prompt
pub struct PromptTemplate;

impl PromptTemplate {
    /// Full preamble, sent on an agent's first invocation only.
    pub fn full_preamble(persona: &str, speaker: &str, roster: &[&str], question: &str) -> String {
        let mut preamble = String::new();
        if !persona.trim().is_empty() {
            preamble.push_str(persona.trim());
            preamble.push_str("\n\n");
        }
        preamble.push_str(&format!(
            r#"You are {speaker}, one participant in a round-table conversation.
Participants, in speaking order: {participants}.
Speak only as {speaker}. Keep each contribution focused and build on what the others said.

The user opened the conversation with:
{question}

Conventions:
- Put private reasoning inside {think_open}...{think_close}; only the text after {think_close} is shown to the others.
- If you need information only the user can provide, ask with {clarify_open}your question{clarify_close}.
- When you believe the conversation has reached its conclusion, include {end} in your answer."#,
            speaker = speaker,
            participants = roster.join(", "),
            question = question,
            think_open = THINK_OPEN,
            think_close = THINK_CLOSE,
            clarify_open = CLARIFY_OPEN,
            clarify_close = CLARIFY_CLOSE,
            end = END_MARKER,
        ));
        preamble
    }

    /// Short reminder used after the first invocation.
    pub fn abbreviated_preamble(question: &str) -> String {
        format!("Reminder, the user's original prompt was:\n{}", question)
    }

    /// One history line.
    pub fn history_line(sender: &str, text: &str) -> String {
        format!("{}: {}", sender, text)
    }

    pub fn history_header() -> &'static str {
        "Conversation so far:"
    }

    /// Trailing cue the speaking agent continues from.
    pub fn speaker_cue(speaker: &str) -> String {
        format!("{}:", speaker)
    }
}
