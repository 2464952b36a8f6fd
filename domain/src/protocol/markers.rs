//! Control markers agents embed in their answers.
//!
//! - `<conversationEnd/>` votes to end the dialogue
//! - `<clarifyWithUser>question</clarifyWithUser>` asks the human for input
//!
//! Markers are read from the complete response once its stream finished,
//! `<think>` body included.

pub const END_MARKER: &str = "<conversationEnd/>";
pub const CLARIFY_OPEN: &str = "<clarifyWithUser>";
pub const CLARIFY_CLOSE: &str = "</clarifyWithUser>";

/// What a finalized response asks the scheduler to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlSignal {
    /// Plain contribution, keep scheduling.
    Continue,
    /// The agent votes to end the conversation.
    EndVote,
    /// The agent needs human input before the dialogue continues.
    Clarify { question: String },
}

/// Check for the end-of-conversation marker.
pub fn contains_end_marker(text: &str) -> bool {
    text.contains(END_MARKER)
}

/// Inner text of the first well-formed, non-empty clarification request.
pub fn extract_clarification(text: &str) -> Option<String> {
    let start = text.find(CLARIFY_OPEN)? + CLARIFY_OPEN.len();
    let len = text[start..].find(CLARIFY_CLOSE)?;
    let question = text[start..start + len].trim();
    (!question.is_empty()).then(|| question.to_string())
}

/// Classify a finalized response. The end vote takes precedence.
pub fn parse_control_signal(text: &str) -> ControlSignal {
    if contains_end_marker(text) {
        return ControlSignal::EndVote;
    }
    match extract_clarification(text) {
        Some(question) => ControlSignal::Clarify { question },
        None => ControlSignal::Continue,
    }
}
