//! Message records of a dialogue

use crate::agent::value_objects::AgentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a committed message record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Ids are derived from the record's position in the log.
    pub fn for_sequence(sequence_index: u64) -> Self {
        Self(format!("msg-{:06}", sequence_index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A finalized message in the dialogue (Entity)
///
/// Records are created only by [`MessageLog`](super::log::MessageLog) and
/// never change once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    /// Agent id, or the `"user"` sentinel for human-authored records.
    pub sender_id: AgentId,
    pub text: String,
    /// Reasoning records are hidden from the main view and from prompts.
    pub is_reasoning: bool,
    pub sequence_index: u64,
    pub created_at: DateTime<Utc>,
}

impl MessageRecord {
    pub fn is_from_user(&self) -> bool {
        self.sender_id.is_user()
    }
}

/// A record about to be appended; the log assigns id and sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftMessage {
    pub sender_id: AgentId,
    pub text: String,
    pub is_reasoning: bool,
}

impl DraftMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender_id: AgentId::user(),
            text: text.into(),
            is_reasoning: false,
        }
    }

    pub fn visible(sender_id: AgentId, text: impl Into<String>) -> Self {
        Self {
            sender_id,
            text: text.into(),
            is_reasoning: false,
        }
    }

    pub fn reasoning(sender_id: AgentId, text: impl Into<String>) -> Self {
        Self {
            sender_id,
            text: text.into(),
            is_reasoning: true,
        }
    }
}
