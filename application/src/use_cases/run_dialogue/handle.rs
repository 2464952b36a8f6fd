//! Control handle of a running dialogue.
//!
//! The scheduler task is the single writer of dialogue state. Everything
//! else talks to it through a [`DialogueControl`]: a cancellation token, the
//! parked clarification token, and a `watch` channel of immutable
//! snapshots.

use super::RunDialogueError;
use roundtable_domain::{DialogueOutcome, DialoguePhase, DialogueSnapshot};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Single-use slot the scheduler parks on while waiting for the user.
///
/// The scheduler [`park`](Self::park)s a sender; the first
/// [`fulfill`](Self::fulfill) takes it, so an answer is delivered at most once.
#[derive(Default)]
pub(crate) struct ClarificationSlot {
    pending: Mutex<Option<oneshot::Sender<String>>>,
}

impl ClarificationSlot {
    pub(crate) fn park(&self, sender: oneshot::Sender<String>) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(sender);
        }
    }

    /// Drop a parked token without answering (used on cancellation).
    pub(crate) fn clear(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.take();
        }
    }

    fn fulfill(&self, answer: String) -> Result<(), RunDialogueError> {
        let sender = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.take())
            .ok_or(RunDialogueError::NotAwaitingClarification)?;
        sender
            .send(answer)
            .map_err(|_| RunDialogueError::NotAwaitingClarification)
    }
}

/// Cloneable control surface of a dialogue.
#[derive(Clone)]
pub struct DialogueControl {
    pub(crate) cancellation: CancellationToken,
    pub(crate) clarification: Arc<ClarificationSlot>,
    pub(crate) snapshots: watch::Receiver<DialogueSnapshot>,
}

impl DialogueControl {
    /// Cancel the dialogue. Idempotent; a no-op once the dialogue ended.
    pub fn cancel(&self) {
        if !self.cancellation.is_cancelled() {
            debug!("Dialogue cancellation requested");
        }
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Answer the pending clarification request.
    ///
    /// Fails with [`RunDialogueError::NotAwaitingClarification`] unless the
    /// dialogue is suspended on a clarification. The scheduler appends the
    /// answer as a user record and resumes.
    pub fn submit_clarification_answer(
        &self,
        text: impl Into<String>,
    ) -> Result<(), RunDialogueError> {
        if self.snapshots.borrow().phase != DialoguePhase::ClarifyingSuspended {
            return Err(RunDialogueError::NotAwaitingClarification);
        }
        self.clarification.fulfill(text.into())
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> DialogueSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<DialogueSnapshot> {
        self.snapshots.clone()
    }
}

/// Handle returned by `RunDialogueUseCase::start`.
pub struct DialogueHandle {
    control: DialogueControl,
    task: JoinHandle<DialogueOutcome>,
}

impl DialogueHandle {
    pub(crate) fn new(control: DialogueControl, task: JoinHandle<DialogueOutcome>) -> Self {
        Self { control, task }
    }

    /// A cloneable control surface, e.g. for a Ctrl+C handler.
    pub fn control(&self) -> DialogueControl {
        self.control.clone()
    }

    pub fn cancel(&self) {
        self.control.cancel();
    }

    pub fn submit_clarification_answer(
        &self,
        text: impl Into<String>,
    ) -> Result<(), RunDialogueError> {
        self.control.submit_clarification_answer(text)
    }

    pub fn snapshot(&self) -> DialogueSnapshot {
        self.control.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<DialogueSnapshot> {
        self.control.subscribe()
    }

    /// Wait for the dialogue task to finish.
    pub async fn wait(self) -> Result<DialogueOutcome, RunDialogueError> {
        self.task
            .await
            .map_err(|e| RunDialogueError::TaskFailed(e.to_string()))
    }
}
