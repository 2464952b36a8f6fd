//! Transcript port.
//!
//! The scheduler reports what happened in a dialogue (start, turns,
//! commits, votes, clarifications, finish) as [`ConversationEvent`]s.
//! Operational diagnostics go through `tracing` instead.

use serde_json::Value;
use std::sync::Mutex;

/// One transcript entry: a fixed kind plus a JSON payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// Snake-case kind such as `"turn_started"` or `"message_committed"`.
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn kind(&self) -> &'static str {
        self.event_type
    }
}

/// Sink for transcript events. Implementations swallow their own failures.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// Discards every event.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

/// Keeps events in memory, in arrival order.
#[derive(Default)]
pub struct MemoryConversationLogger {
    events: Mutex<Vec<ConversationEvent>>,
}

impl MemoryConversationLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ConversationEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Event kinds only, handy for asserting on sequence.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(ConversationEvent::kind).collect()
    }
}

impl ConversationLogger for MemoryConversationLogger {
    fn log(&self, event: ConversationEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
