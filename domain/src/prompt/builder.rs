//! Assembles the prompt for one agent invocation.
//!
//! A prompt is three sections separated by blank lines:
//!
//! 1. preamble: full on the agent's first turn, a reminder of the user's
//!    prompt afterwards
//! 2. rolling history: the last `context_window` records, reasoning skipped
//! 3. the speaking agent's cue, e.g. `Alice:`

use super::template::PromptTemplate;
use crate::agent::entities::{AgentDescriptor, Roster};
use crate::core::question::Question;
use crate::session::log::MessageLog;

/// Inputs for building one prompt.
pub struct PromptBuilder<'a> {
    roster: &'a Roster,
    question: &'a Question,
    context_window: usize,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(roster: &'a Roster, question: &'a Question, context_window: usize) -> Self {
        Self {
            roster,
            question,
            context_window,
        }
    }

    /// Build the prompt for `speaker`. `first_invocation` selects the full preamble.
    pub fn build(&self, speaker: &AgentDescriptor, log: &MessageLog, first_invocation: bool) -> String {
        let preamble = if first_invocation {
            PromptTemplate::full_preamble(
                &speaker.persona_prompt,
                &speaker.display_name,
                &self.roster.display_names(),
                self.question.content(),
            )
        } else {
            PromptTemplate::abbreviated_preamble(self.question.content())
        };

        let mut sections = vec![preamble];
        let history = self.history(log);
        if !history.is_empty() {
            sections.push(format!("{}\n{}", PromptTemplate::history_header(), history));
        }
        sections.push(PromptTemplate::speaker_cue(&speaker.display_name));
        sections.join("\n\n")
    }

    /// Render the tail of the log, one line per visible record.
    pub fn history(&self, log: &MessageLog) -> String {
        log.tail(self.context_window)
            .iter()
            .filter(|record| !record.is_reasoning)
            .map(|record| {
                PromptTemplate::history_line(
                    self.roster.display_name_of(&record.sender_id),
                    &record.text,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
