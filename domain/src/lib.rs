//! Domain layer for roundtable
//!
//! This crate contains the core entities, value objects and pure logic of a
//! round-robin dialogue between text-generation agents. It has no
//! dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Roster**: the ordered set of enabled agents; its order is the
//!   speaking order
//! - **Message Log**: append-only record of finalized messages, the only
//!   state prompts are built from
//! - **Tag protocol**: `<think>`, `<clarifyWithUser>` and
//!   `<conversationEnd/>` markers embedded in agent output
//! - **Termination votes**: the dialogue ends once the end votes reach the
//!   number of agents

pub mod agent;
pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod protocol;
pub mod quorum;
pub mod session;

// Re-export commonly used types
pub use agent::{
    entities::{AgentDescriptor, Roster},
    validation::{ConfigIssue, ConfigIssueCode, Severity},
    value_objects::{AgentId, Endpoint},
};
pub use core::{error::DomainError, question::Question};
pub use orchestration::{
    entities::{ConversationState, DialoguePhase, PendingClarification},
    value_objects::{DialogueEnd, DialogueOutcome, DialogueSnapshot, DialogueStatus},
};
pub use prompt::{PromptBuilder, PromptTemplate};
pub use protocol::{ControlSignal, ThinkSplit, extract_think, parse_control_signal};
pub use quorum::{TerminationVotes, VotePolicy};
pub use session::{
    entities::{DraftMessage, MessageId, MessageRecord},
    log::MessageLog,
    stream::{StreamError, StreamEvent},
};
