//! Append-only message log

use super::entities::{DraftMessage, MessageId, MessageRecord};
use chrono::Utc;
use std::sync::{Arc, OnceLock};

/// Ordered record of finalized messages.
///
/// The only mutation is [`append`](Self::append); sequence indices are
/// strictly increasing and records are never edited or removed.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    records: Vec<MessageRecord>,
    next_sequence: u64,
    /// Shared copy handed out to snapshots; reset on every append.
    shared: OnceLock<Arc<[MessageRecord]>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a draft and return the stored record.
    pub fn append(&mut self, draft: DraftMessage) -> &MessageRecord {
        let sequence_index = self.next_sequence;
        self.next_sequence += 1;
        self.shared = OnceLock::new();
        self.records.push(MessageRecord {
            id: MessageId::for_sequence(sequence_index),
            sender_id: draft.sender_id,
            text: draft.text,
            is_reasoning: draft.is_reasoning,
            sequence_index,
            created_at: Utc::now(),
        });
        // just pushed
        &self.records[self.records.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    /// The records as a shared slice. Repeated calls between appends return
    /// the same allocation.
    pub fn shared(&self) -> Arc<[MessageRecord]> {
        Arc::clone(
            self.shared
                .get_or_init(|| Arc::from(self.records.as_slice())),
        )
    }

    /// The last `count` records in log order.
    pub fn tail(&self, count: usize) -> &[MessageRecord] {
        let start = self.records.len().saturating_sub(count);
        &self.records[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::value_objects::AgentId;

    #[test]
    fn test_append_assigns_increasing_sequence() {
        let mut log = MessageLog::new();
        log.append(DraftMessage::user("hi"));
        log.append(DraftMessage::reasoning(AgentId::new("a"), "hmm"));
        log.append(DraftMessage::visible(AgentId::new("a"), "hello"));

        let indices: Vec<u64> = log.records().iter().map(|r| r.sequence_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(log.records()[0].id.as_str(), "msg-000000");
        assert!(log.records()[0].is_from_user());
        assert!(log.records()[1].is_reasoning);
    }

    #[test]
    fn test_shared_is_reused_until_next_append() {
        let mut log = MessageLog::new();
        log.append(DraftMessage::user("hi"));
        let first = log.shared();
        let again = log.shared();
        assert!(Arc::ptr_eq(&first, &again));

        log.append(DraftMessage::user("later"));
        let after = log.shared();
        assert!(!Arc::ptr_eq(&first, &after));
        assert_eq!(first.len(), 1);
        assert_eq!(after.len(), 2);
        assert_eq!(after[1].text, "later");
    }

    #[test]
    fn test_tail() {
        let mut log = MessageLog::new();
        for i in 0..5 {
            log.append(DraftMessage::user(format!("m{}", i)));
        }
        let tail: Vec<&str> = log.tail(2).iter().map(|r| r.text.as_str()).collect();
        assert_eq!(tail, vec!["m3", "m4"]);
        assert_eq!(log.tail(10).len(), 5);
        assert!(log.tail(0).is_empty());
    }
}
