//! Dialogue state machine entities

use crate::agent::value_objects::AgentId;
use crate::quorum::vote::{TerminationVotes, VotePolicy};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Phase of the turn scheduler.
///
/// ```text
/// Idle → SelectingAgent → AwaitingStream → EvaluatingResponse
///          ↑                                   │
///          └──── ClarifyingSuspended ←─────────┤
///                                              ↓
///            Terminated | TurnLimitReached | Aborted | Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialoguePhase {
    Idle,
    SelectingAgent,
    AwaitingStream,
    EvaluatingResponse,
    ClarifyingSuspended,
    /// Every agent voted to stop.
    Terminated,
    /// The configured turn limit was reached.
    TurnLimitReached,
    /// A transport error ended the dialogue.
    Aborted,
    /// The user cancelled.
    Cancelled,
}

impl DialoguePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialoguePhase::Idle => "idle",
            DialoguePhase::SelectingAgent => "selecting_agent",
            DialoguePhase::AwaitingStream => "awaiting_stream",
            DialoguePhase::EvaluatingResponse => "evaluating_response",
            DialoguePhase::ClarifyingSuspended => "clarifying_suspended",
            DialoguePhase::Terminated => "terminated",
            DialoguePhase::TurnLimitReached => "turn_limit_reached",
            DialoguePhase::Aborted => "aborted",
            DialoguePhase::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DialoguePhase::Terminated
                | DialoguePhase::TurnLimitReached
                | DialoguePhase::Aborted
                | DialoguePhase::Cancelled
        )
    }
}

impl std::fmt::Display for DialoguePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An agent's outstanding request for human input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingClarification {
    pub agent_id: AgentId,
    pub question: String,
}

/// Mutable scheduling state of one dialogue (Entity)
///
/// Owned and mutated only by the scheduler task.
#[derive(Debug, Clone)]
pub struct ConversationState {
    phase: DialoguePhase,
    /// Round-robin position into the roster.
    cursor: usize,
    /// Agent invocations that finished successfully.
    substeps: u64,
    /// Full passes through the roster.
    completed_turns: u32,
    /// Turn of the most recent agent invocation; 0 before the first one.
    started_turn: u32,
    votes: TerminationVotes,
    pending_clarification: Option<PendingClarification>,
    introduced: HashSet<AgentId>,
}

impl ConversationState {
    pub fn new(policy: VotePolicy) -> Self {
        Self {
            phase: DialoguePhase::Idle,
            cursor: 0,
            substeps: 0,
            completed_turns: 0,
            started_turn: 0,
            votes: TerminationVotes::new(policy),
            pending_clarification: None,
            introduced: HashSet::new(),
        }
    }

    pub fn phase(&self) -> DialoguePhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: DialoguePhase) {
        self.phase = phase;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn substeps(&self) -> u64 {
        self.substeps
    }

    pub fn completed_turns(&self) -> u32 {
        self.completed_turns
    }

    /// The externally visible, 1-based turn counter.
    pub fn current_turn(&self) -> u32 {
        self.completed_turns + 1
    }

    /// Turn number to publish. While running this is the turn in progress;
    /// once the dialogue ended it is the last turn an agent was invoked in.
    pub fn reported_turn(&self) -> u32 {
        if self.phase.is_terminal() {
            self.started_turn.max(1)
        } else {
            self.current_turn()
        }
    }

    /// Record that an agent is being invoked for the current turn.
    pub fn begin_substep(&mut self) {
        self.started_turn = self.current_turn();
    }

    /// Move to the next agent. Wrapping to the first agent completes a turn.
    pub fn advance(&mut self, agent_count: usize) {
        self.substeps += 1;
        self.cursor = (self.cursor + 1) % agent_count.max(1);
        if self.cursor == 0 {
            self.completed_turns += 1;
        }
    }

    /// Count a finished sub-step that keeps the same agent up next.
    pub fn stay(&mut self) {
        self.substeps += 1;
    }

    pub fn turn_limit_reached(&self, limit: Option<u32>) -> bool {
        limit.is_some_and(|limit| self.completed_turns >= limit)
    }

    pub fn votes(&self) -> &TerminationVotes {
        &self.votes
    }

    /// Record an end vote; returns true when the vote made it unanimous.
    pub fn record_vote(&mut self, agent: &AgentId, agent_count: usize) -> bool {
        self.votes.record(agent);
        self.votes.is_unanimous(agent_count)
    }

    pub fn pending_clarification(&self) -> Option<&PendingClarification> {
        self.pending_clarification.as_ref()
    }

    pub fn suspend_for_clarification(&mut self, agent_id: AgentId, question: String) {
        self.pending_clarification = Some(PendingClarification { agent_id, question });
        self.phase = DialoguePhase::ClarifyingSuspended;
    }

    pub fn clear_clarification(&mut self) -> Option<PendingClarification> {
        self.pending_clarification.take()
    }

    /// Mark `agent` as having received its full preamble.
    ///
    /// Returns true the first time, i.e. when the full preamble is due.
    pub fn introduce(&mut self, agent: &AgentId) -> bool {
        self.introduced.insert(agent.clone())
    }
}
