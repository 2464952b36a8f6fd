//! Dialogue orchestration domain.
//!
//! - [`entities::ConversationState`] / [`entities::DialoguePhase`]: scheduler state
//! - [`value_objects::DialogueSnapshot`]: published read-only view
//! - [`value_objects::DialogueOutcome`]: how a dialogue ended

pub mod entities;
pub mod value_objects;
