//! Orchestration value objects - immutable views of a running dialogue.
//!
//! - [`DialogueStatus`] - short human-readable phase descriptions
//! - [`DialogueSnapshot`] - what observers are allowed to see
//! - [`DialogueEnd`] / [`DialogueOutcome`] - how a dialogue finished

use super::entities::{ConversationState, DialoguePhase, PendingClarification};
use crate::agent::value_objects::AgentId;
use crate::session::entities::MessageRecord;
use crate::session::log::MessageLog;
use std::sync::Arc;

/// Status line texts shown to the user.
pub struct DialogueStatus;

impl DialogueStatus {
    pub fn idle() -> String {
        "Idle".to_string()
    }

    pub fn thinking(agent: &str) -> String {
        format!("{} is thinking…", agent)
    }

    pub fn error(agent: &str) -> String {
        format!("{} error!", agent)
    }

    pub fn awaiting_clarification() -> String {
        "Waiting for user clarification…".to_string()
    }

    pub fn all_agreed() -> String {
        "All models agreed to stop".to_string()
    }

    pub fn turn_limit() -> String {
        "Turn limit reached".to_string()
    }

    pub fn cancelled() -> String {
        "Cancelled by user".to_string()
    }
}

/// Immutable published view of a dialogue.
///
/// The message list is shared, so holding a snapshot is cheap and never
/// observes later appends.
#[derive(Debug, Clone)]
pub struct DialogueSnapshot {
    pub status: String,
    pub phase: DialoguePhase,
    /// 1-based turn in progress; after the end, the last turn that ran.
    pub turn: u32,
    pub substeps: u64,
    pub vote_count: usize,
    pub agent_count: usize,
    /// Agent currently streaming or evaluated, if any.
    pub active_agent: Option<AgentId>,
    pub pending_clarification: Option<PendingClarification>,
    pub messages: Arc<[MessageRecord]>,
}

impl DialogueSnapshot {
    /// Snapshot before anything has happened.
    pub fn initial(agent_count: usize) -> Self {
        Self {
            status: DialogueStatus::idle(),
            phase: DialoguePhase::Idle,
            turn: 1,
            substeps: 0,
            vote_count: 0,
            agent_count,
            active_agent: None,
            pending_clarification: None,
            messages: Arc::from(Vec::new()),
        }
    }

    pub fn capture(
        status: &str,
        state: &ConversationState,
        log: &MessageLog,
        agent_count: usize,
        active_agent: Option<&AgentId>,
    ) -> Self {
        Self {
            status: status.to_string(),
            phase: state.phase(),
            turn: state.reported_turn(),
            substeps: state.substeps(),
            vote_count: state.votes().count(),
            agent_count,
            active_agent: active_agent.cloned(),
            pending_clarification: state.pending_clarification().cloned(),
            messages: log.shared(),
        }
    }

    /// Records meant for the main conversation view.
    pub fn visible_messages(&self) -> impl Iterator<Item = &MessageRecord> {
        self.messages.iter().filter(|m| !m.is_reasoning)
    }
}

/// Why a dialogue stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueEnd {
    /// End votes reached the number of agents.
    Terminated,
    TurnLimitReached,
    Cancelled,
    /// A transport error for `agent_id` aborted the whole dialogue.
    Aborted { agent_id: AgentId, error: String },
}

impl DialogueEnd {
    pub fn phase(&self) -> DialoguePhase {
        match self {
            DialogueEnd::Terminated => DialoguePhase::Terminated,
            DialogueEnd::TurnLimitReached => DialoguePhase::TurnLimitReached,
            DialogueEnd::Cancelled => DialoguePhase::Cancelled,
            DialogueEnd::Aborted { .. } => DialoguePhase::Aborted,
        }
    }
}

/// Final result of a dialogue task.
#[derive(Debug, Clone)]
pub struct DialogueOutcome {
    pub end: DialogueEnd,
    pub snapshot: DialogueSnapshot,
}

impl DialogueOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.end, DialogueEnd::Cancelled)
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self.end, DialogueEnd::Aborted { .. })
    }
}
