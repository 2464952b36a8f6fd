//! Run Dialogue use case
//!
//! The turn scheduler: a round robin over the roster where each agent turn
//! builds a prompt from the message log, streams the agent's answer, splits
//! it into reasoning and visible segments, commits 0–2 records and reacts to
//! the control markers.
//!
//! ```text
//! start ─► SelectingAgent ─► AwaitingStream ─► EvaluatingResponse ─┬─► SelectingAgent
//!               ▲                                                 ├─► ClarifyingSuspended ─┐
//!               └─────────────────────────────────────────────────┼────────────────────────┘
//!                                                                 └─► Terminated | TurnLimitReached
//! any non-terminal phase ─► Cancelled (cancel) | Aborted (transport error)
//! ```
//!
//! Exactly one dialogue task runs per [`DialogueHandle`]; turns are strictly
//! serialized and the task is the only writer of the message log.

mod handle;
mod turn;

#[cfg(test)]
mod tests;

pub use handle::{DialogueControl, DialogueHandle};

use crate::config::DialogueConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::dialogue_observer::{DialogueObserver, NoObserver};
use crate::ports::generation_gateway::{GenerationGateway, GenerationRequest};
use handle::ClarificationSlot;
use roundtable_domain::core::string::preview;
use roundtable_domain::{
    AgentDescriptor, AgentId, ControlSignal, ConversationState, DialogueEnd, DialogueOutcome,
    DialoguePhase, DialogueSnapshot, DialogueStatus, DomainError, DraftMessage, MessageLog,
    PromptBuilder, Question, Roster, extract_think, parse_control_signal,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use turn::{StreamSession, TurnFailure};

/// Errors returned by the dialogue control surface
#[derive(Error, Debug)]
pub enum RunDialogueError {
    #[error("No agents configured")]
    NoAgentsConfigured,

    #[error("Opening prompt cannot be empty")]
    EmptyPrompt,

    #[error("No clarification is pending")]
    NotAwaitingClarification,

    #[error("Dialogue task failed: {0}")]
    TaskFailed(String),
}

impl From<DomainError> for RunDialogueError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::EmptyPrompt => RunDialogueError::EmptyPrompt,
            DomainError::NoAgentsConfigured => RunDialogueError::NoAgentsConfigured,
        }
    }
}

/// Input for the RunDialogue use case
#[derive(Debug, Clone)]
pub struct RunDialogueInput {
    /// The user's opening prompt
    pub prompt: String,
    /// Agents in registry order; disabled ones are skipped
    pub agents: Vec<AgentDescriptor>,
}

impl RunDialogueInput {
    pub fn new(prompt: impl Into<String>, agents: Vec<AgentDescriptor>) -> Self {
        Self {
            prompt: prompt.into(),
            agents,
        }
    }
}

/// Use case for running a round-robin dialogue
pub struct RunDialogueUseCase<G: GenerationGateway + 'static> {
    gateway: Arc<G>,
    config: DialogueConfig,
    observer: Arc<dyn DialogueObserver>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<G: GenerationGateway + 'static> RunDialogueUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            config: DialogueConfig::default(),
            observer: Arc::new(NoObserver),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_config(mut self, config: DialogueConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn DialogueObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Validate the input, record the opening prompt and spawn the dialogue task.
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&self, input: RunDialogueInput) -> Result<DialogueHandle, RunDialogueError> {
        let roster = Roster::from_descriptors(input.agents)?;
        let question = Question::try_new(input.prompt)?;

        info!(
            "Starting dialogue with {} agents: {}",
            roster.len(),
            roster.display_names().join(", ")
        );

        let (snapshot_tx, snapshot_rx) = watch::channel(DialogueSnapshot::initial(roster.len()));
        let cancellation = CancellationToken::new();
        let clarification = Arc::new(ClarificationSlot::default());

        let mut run = DialogueRun {
            gateway: Arc::clone(&self.gateway),
            config: self.config.clone(),
            observer: Arc::clone(&self.observer),
            conversation_logger: Arc::clone(&self.conversation_logger),
            roster,
            question,
            state: ConversationState::new(self.config.vote_policy),
            log: MessageLog::new(),
            status: DialogueStatus::idle(),
            snapshots: snapshot_tx,
            cancellation: cancellation.clone(),
            clarification: Arc::clone(&clarification),
        };
        run.begin();

        let task = tokio::spawn(run.run());
        let control = DialogueControl {
            cancellation,
            clarification,
            snapshots: snapshot_rx,
        };
        Ok(DialogueHandle::new(control, task))
    }
}

/// State owned by the dialogue task.
struct DialogueRun<G: GenerationGateway + 'static> {
    gateway: Arc<G>,
    config: DialogueConfig,
    observer: Arc<dyn DialogueObserver>,
    conversation_logger: Arc<dyn ConversationLogger>,
    roster: Roster,
    question: Question,
    state: ConversationState,
    log: MessageLog,
    status: String,
    snapshots: watch::Sender<DialogueSnapshot>,
    cancellation: CancellationToken,
    clarification: Arc<ClarificationSlot>,
}

impl<G: GenerationGateway + 'static> DialogueRun<G> {
    /// Append the opening prompt and enter scheduling.
    fn begin(&mut self) {
        self.conversation_logger.log(ConversationEvent::new(
            "dialogue_started",
            json!({
                "prompt": self.question.content(),
                "agents": self.roster.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(),
                "turn_limit": self.config.turn_limit,
                "context_window": self.config.context_window,
                "vote_policy": self.config.vote_policy.as_str(),
            }),
        ));
        self.commit(DraftMessage::user(self.question.content()));
        self.state.set_phase(DialoguePhase::SelectingAgent);
        self.publish(None);
    }

    async fn run(mut self) -> DialogueOutcome {
        let end = self.schedule().await;
        self.finish(end)
    }

    async fn schedule(&mut self) -> DialogueEnd {
        let agent_count = self.roster.len();

        loop {
            if self.cancellation.is_cancelled() {
                return DialogueEnd::Cancelled;
            }
            if self.state.turn_limit_reached(self.config.turn_limit) {
                info!("Turn limit reached after {} turns", self.state.completed_turns());
                return DialogueEnd::TurnLimitReached;
            }

            self.state.set_phase(DialoguePhase::SelectingAgent);
            let agent = self.roster.at(self.state.cursor()).clone();
            let first_invocation = self.state.introduce(&agent.id);
            self.state.begin_substep();
            let prompt = PromptBuilder::new(&self.roster, &self.question, self.config.context_window)
                .build(&agent, &self.log, first_invocation);

            self.state.set_phase(DialoguePhase::AwaitingStream);
            self.status = DialogueStatus::thinking(&agent.display_name);
            self.publish(Some(&agent.id));
            self.observer
                .on_turn_start(&agent, self.state.substeps(), self.state.current_turn());
            self.conversation_logger.log(ConversationEvent::new(
                "turn_started",
                json!({
                    "agent": agent.id.as_str(),
                    "turn": self.state.current_turn(),
                    "substep": self.state.substeps(),
                    "full_preamble": first_invocation,
                    "prompt_bytes": prompt.len(),
                }),
            ));
            debug!(
                "Turn {} sub-step {}: {} ({} prompt bytes)",
                self.state.current_turn(),
                self.state.substeps(),
                agent.id,
                prompt.len()
            );

            let request = GenerationRequest {
                endpoint: agent.endpoint.clone(),
                model: agent.model_name.clone(),
                prompt,
                options: self.config.generation,
            };
            let session = StreamSession::new(&agent, self.cancellation.child_token());
            let text = match session
                .run(self.gateway.as_ref(), request, self.observer.as_ref())
                .await
            {
                Ok(text) => text,
                Err(TurnFailure::Cancelled) => return DialogueEnd::Cancelled,
                Err(TurnFailure::Transport(error)) => {
                    warn!("Agent {} failed: {}", agent.id, error);
                    self.status = DialogueStatus::error(&agent.display_name);
                    return DialogueEnd::Aborted {
                        agent_id: agent.id.clone(),
                        error: error.to_string(),
                    };
                }
            };

            // A cancel racing with stream completion wins; the draft is dropped.
            if self.cancellation.is_cancelled() {
                return DialogueEnd::Cancelled;
            }

            self.state.set_phase(DialoguePhase::EvaluatingResponse);
            let split = extract_think(&text);
            if let Some(reasoning) = &split.reasoning {
                self.commit(DraftMessage::reasoning(agent.id.clone(), reasoning.clone()));
            }
            if !split.visible.is_empty() {
                self.commit(DraftMessage::visible(agent.id.clone(), split.visible.clone()));
            }
            info!("{} answered: {}", agent.display_name, preview(&split.visible, 80));

            match parse_control_signal(&text) {
                ControlSignal::EndVote => {
                    let unanimous = self.state.record_vote(&agent.id, agent_count);
                    self.conversation_logger.log(ConversationEvent::new(
                        "termination_vote",
                        json!({
                            "agent": agent.id.as_str(),
                            "votes": self.state.votes().count(),
                            "needed": agent_count,
                        }),
                    ));
                    info!(
                        "{} voted to end ({}/{})",
                        agent.display_name,
                        self.state.votes().count(),
                        agent_count
                    );
                    if unanimous {
                        return DialogueEnd::Terminated;
                    }
                    self.state.advance(agent_count);
                }
                ControlSignal::Clarify { question } => {
                    if !self.await_clarification(&agent, question).await {
                        return DialogueEnd::Cancelled;
                    }
                    // the same agent speaks again, now with the answer in history
                    self.state.stay();
                }
                ControlSignal::Continue => self.state.advance(agent_count),
            }
            self.publish(Some(&agent.id));
        }
    }

    /// Park until the user answers or the dialogue is cancelled.
    ///
    /// Returns false on cancellation.
    async fn await_clarification(&mut self, agent: &AgentDescriptor, question: String) -> bool {
        let (answer_tx, answer_rx) = oneshot::channel();
        self.clarification.park(answer_tx);
        self.state
            .suspend_for_clarification(agent.id.clone(), question.clone());
        self.status = DialogueStatus::awaiting_clarification();
        self.publish(Some(&agent.id));
        self.observer.on_clarification_requested(agent, &question);
        self.conversation_logger.log(ConversationEvent::new(
            "clarification_requested",
            json!({ "agent": agent.id.as_str(), "question": question }),
        ));
        info!("{} asked for clarification: {}", agent.display_name, question);

        let answer = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => None,
            answer = answer_rx => answer.ok(),
        };

        let Some(answer) = answer else {
            self.clarification.clear();
            return false;
        };

        self.state.clear_clarification();
        self.state.set_phase(DialoguePhase::SelectingAgent);
        self.commit(DraftMessage::user(answer.clone()));
        self.conversation_logger.log(ConversationEvent::new(
            "clarification_answered",
            json!({ "agent": agent.id.as_str(), "answer": answer }),
        ));
        true
    }

    fn commit(&mut self, draft: DraftMessage) {
        let record = self.log.append(draft);
        self.conversation_logger.log(ConversationEvent::new(
            "message_committed",
            json!({
                "id": record.id.as_str(),
                "sequence_index": record.sequence_index,
                "sender": record.sender_id.as_str(),
                "is_reasoning": record.is_reasoning,
                "text": record.text,
            }),
        ));
        self.observer.on_message(record);
    }

    fn publish(&self, active_agent: Option<&AgentId>) {
        let snapshot = DialogueSnapshot::capture(
            &self.status,
            &self.state,
            &self.log,
            self.roster.len(),
            active_agent,
        );
        self.observer.on_status(&snapshot);
        self.snapshots.send_replace(snapshot);
    }

    fn finish(mut self, end: DialogueEnd) -> DialogueOutcome {
        self.clarification.clear();
        self.state.clear_clarification();
        self.state.set_phase(end.phase());
        match &end {
            DialogueEnd::Terminated => self.status = DialogueStatus::all_agreed(),
            DialogueEnd::TurnLimitReached => self.status = DialogueStatus::turn_limit(),
            DialogueEnd::Cancelled => self.status = DialogueStatus::cancelled(),
            // status already names the failing agent
            DialogueEnd::Aborted { .. } => {}
        }
        let active = match &end {
            DialogueEnd::Aborted { agent_id, .. } => Some(agent_id.clone()),
            _ => None,
        };
        self.publish(active.as_ref());

        self.conversation_logger.log(ConversationEvent::new(
            "dialogue_finished",
            json!({
                "end": end.phase().as_str(),
                "turns": self.state.completed_turns(),
                "substeps": self.state.substeps(),
                "votes": self.state.votes().count(),
                "messages": self.log.len(),
            }),
        ));
        info!("Dialogue finished: {}", self.status);

        let outcome = DialogueOutcome {
            end,
            snapshot: self.snapshots.borrow().clone(),
        };
        self.observer.on_finished(&outcome);
        outcome
    }
}
