//! Dialogue observation port
//!
//! Callbacks for the presentation layer. They are purely observational:
//! nothing an observer does reaches the message log.

use roundtable_domain::{AgentDescriptor, DialogueOutcome, DialogueSnapshot, MessageRecord, ThinkSplit};

/// Receives live updates while a dialogue runs.
///
/// Every method has a no-op default so implementations pick what they need.
pub trait DialogueObserver: Send + Sync {
    /// A new snapshot was published (status, phase, counters or log changed).
    fn on_status(&self, _snapshot: &DialogueSnapshot) {}

    /// `agent` is about to be invoked for sub-step `substep` of turn `turn`.
    fn on_turn_start(&self, _agent: &AgentDescriptor, _substep: u64, _turn: u32) {}

    /// A raw text fragment arrived for the in-flight turn.
    fn on_stream_delta(&self, _agent: &AgentDescriptor, _delta: &str) {}

    /// Live segmentation of the in-flight text after the latest delta.
    fn on_live_segments(&self, _agent: &AgentDescriptor, _split: &ThinkSplit) {}

    /// A record was committed to the message log.
    fn on_message(&self, _record: &MessageRecord) {}

    /// `agent` asked the user a question; the dialogue is suspended.
    fn on_clarification_requested(&self, _agent: &AgentDescriptor, _question: &str) {}

    /// The dialogue task finished.
    fn on_finished(&self, _outcome: &DialogueOutcome) {}
}

/// No-op observer for when nothing needs live updates
pub struct NoObserver;

impl DialogueObserver for NoObserver {}
