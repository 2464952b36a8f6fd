use super::*;
use crate::ports::conversation_logger::MemoryConversationLogger;
use crate::ports::generation_gateway::{GatewayError, StreamHandle};
use async_trait::async_trait;
use roundtable_domain::{StreamError, StreamEvent, ThinkSplit, VotePolicy};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

// ==================== Test doubles ====================

enum Script {
    /// Emit each chunk as a delta, then complete.
    Chunks(Vec<&'static str>),
    /// Fail before the stream opens.
    Refuse(GatewayError),
    /// Emit the chunks, then a terminal stream error.
    BreakAfter(Vec<&'static str>, StreamError),
    /// Never produce anything until cancelled.
    Hang,
}

fn reply(text: &'static str) -> Script {
    Script::Chunks(vec![text])
}

struct ScriptedGateway {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGateway {
    fn new(scripts: Vec<Script>) -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(scripts.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn models(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.model).collect()
    }
}

#[async_trait]
impl GenerationGateway for ScriptedGateway {
    async fn generate(
        &self,
        request: GenerationRequest,
        cancellation: CancellationToken,
    ) -> Result<StreamHandle, GatewayError> {
        self.requests.lock().unwrap().push(request);
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| reply("ok"));

        let (tx, rx) = mpsc::channel(16);
        match script {
            Script::Refuse(error) => return Err(error),
            Script::Chunks(chunks) => {
                tokio::spawn(async move {
                    let mut full = String::new();
                    for chunk in chunks {
                        full.push_str(chunk);
                        let _ = tx.send(StreamEvent::Delta(chunk.to_string())).await;
                    }
                    let _ = tx.send(StreamEvent::Completed(full)).await;
                });
            }
            Script::BreakAfter(chunks, error) => {
                tokio::spawn(async move {
                    for chunk in chunks {
                        let _ = tx.send(StreamEvent::Delta(chunk.to_string())).await;
                    }
                    let _ = tx.send(StreamEvent::Error(error)).await;
                });
            }
            Script::Hang => {
                tokio::spawn(async move {
                    cancellation.cancelled().await;
                    let _ = tx.send(StreamEvent::Cancelled).await;
                });
            }
        }
        Ok(StreamHandle::new(rx))
    }
}

#[derive(Default)]
struct RecordingObserver {
    live: Mutex<Vec<ThinkSplit>>,
    questions: Mutex<Vec<String>>,
    finished: Mutex<usize>,
}

impl DialogueObserver for RecordingObserver {
    fn on_live_segments(&self, _agent: &AgentDescriptor, split: &ThinkSplit) {
        self.live.lock().unwrap().push(split.clone());
    }

    fn on_clarification_requested(&self, _agent: &AgentDescriptor, question: &str) {
        self.questions.lock().unwrap().push(question.to_string());
    }

    fn on_finished(&self, _outcome: &DialogueOutcome) {
        *self.finished.lock().unwrap() += 1;
    }
}

// ==================== Helpers ====================

fn agents(names: &[(&str, &str)]) -> Vec<AgentDescriptor> {
    names
        .iter()
        .map(|(id, name)| {
            AgentDescriptor::new(*id, *name, format!("model-{}", id))
                .with_persona(format!("Persona of {}", name))
        })
        .collect()
}

fn two_agents() -> Vec<AgentDescriptor> {
    agents(&[("a", "Alice"), ("b", "Bob")])
}

fn use_case(gateway: &Arc<ScriptedGateway>, config: DialogueConfig) -> RunDialogueUseCase<ScriptedGateway> {
    RunDialogueUseCase::new(Arc::clone(gateway)).with_config(config)
}

async fn wait_for_phase(handle: &DialogueHandle, phase: DialoguePhase) -> DialogueSnapshot {
    let mut rx = handle.subscribe();
    let snapshot = tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.phase == phase))
        .await
        .expect("phase not reached in time")
        .expect("dialogue task dropped its sender")
        .clone();
    snapshot
}

async fn finish(handle: DialogueHandle) -> DialogueOutcome {
    tokio::time::timeout(Duration::from_secs(5), handle.wait())
        .await
        .expect("dialogue did not finish in time")
        .unwrap()
}

fn texts(snapshot: &DialogueSnapshot) -> Vec<(String, bool, String)> {
    snapshot
        .messages
        .iter()
        .map(|m| (m.sender_id.to_string(), m.is_reasoning, m.text.clone()))
        .collect()
}

// ==================== start() validation ====================

#[tokio::test]
async fn test_start_requires_agents() {
    let gateway = ScriptedGateway::new(vec![]);
    let uc = use_case(&gateway, DialogueConfig::default());

    let err = uc.start(RunDialogueInput::new("hi", vec![])).err().unwrap();
    assert!(matches!(err, RunDialogueError::NoAgentsConfigured));

    let disabled = vec![AgentDescriptor::new("a", "Alice", "m").disabled()];
    let err = uc.start(RunDialogueInput::new("hi", disabled)).err().unwrap();
    assert!(matches!(err, RunDialogueError::NoAgentsConfigured));
    assert!(gateway.requests().is_empty());
}

#[tokio::test]
async fn test_start_requires_prompt() {
    let gateway = ScriptedGateway::new(vec![]);
    let uc = use_case(&gateway, DialogueConfig::default());
    let err = uc.start(RunDialogueInput::new("  ", two_agents())).err().unwrap();
    assert!(matches!(err, RunDialogueError::EmptyPrompt));
}

// ==================== Scheduling ====================

#[tokio::test]
async fn test_round_robin_order_and_turn_limit() {
    let gateway = ScriptedGateway::new(vec![]);
    let config = DialogueConfig::default().with_max_turns(2);
    let roster = agents(&[("a", "Alice"), ("b", "Bob"), ("c", "Carol")]);
    let handle = use_case(&gateway, config)
        .start(RunDialogueInput::new("Discuss", roster))
        .unwrap();

    let outcome = finish(handle).await;
    assert_eq!(outcome.end, DialogueEnd::TurnLimitReached);
    assert_eq!(outcome.snapshot.status, "Turn limit reached");
    assert_eq!(outcome.snapshot.substeps, 6);
    assert_eq!(outcome.snapshot.turn, 2);

    let models = gateway.models();
    for (substep, model) in models.iter().enumerate() {
        let expected = ["model-a", "model-b", "model-c"][substep % 3];
        assert_eq!(model, expected, "sub-step {}", substep);
    }
}

#[tokio::test]
async fn test_disabled_agents_are_skipped() {
    let gateway = ScriptedGateway::new(vec![]);
    let mut roster = agents(&[("a", "Alice"), ("b", "Bob"), ("c", "Carol")]);
    roster[1].enabled = false;
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(1))
        .start(RunDialogueInput::new("Discuss", roster))
        .unwrap();

    finish(handle).await;
    assert_eq!(gateway.models(), vec!["model-a", "model-c"]);
}

#[tokio::test]
async fn test_prompts_use_full_preamble_only_once() {
    let gateway = ScriptedGateway::new(vec![reply("Margherita."), reply("Pepperoni.")]);
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(2))
        .start(RunDialogueInput::new("Best pizza?", two_agents()))
        .unwrap();
    finish(handle).await;

    let requests = gateway.requests();
    assert_eq!(requests.len(), 4);

    let first = &requests[0].prompt;
    assert!(first.starts_with("Persona of Alice"));
    assert!(first.contains("Alice, Bob"));
    assert!(first.contains("User: Best pizza?"));
    assert!(first.ends_with("Alice:"));

    let bob = &requests[1].prompt;
    assert!(bob.starts_with("Persona of Bob"));
    assert!(bob.contains("Alice: Margherita."));
    assert!(bob.ends_with("Bob:"));

    let alice_again = &requests[2].prompt;
    assert!(!alice_again.contains("Persona of Alice"));
    assert!(alice_again.starts_with("Reminder, the user's original prompt was:\nBest pizza?"));
    assert!(alice_again.contains("Bob: Pepperoni."));
}

#[tokio::test]
async fn test_context_window_limits_history() {
    let gateway = ScriptedGateway::new(vec![reply("one"), reply("two"), reply("three")]);
    let config = DialogueConfig::default()
        .with_max_turns(2)
        .with_context_window(1);
    let handle = use_case(&gateway, config)
        .start(RunDialogueInput::new("Count", two_agents()))
        .unwrap();
    finish(handle).await;

    let prompt = &gateway.requests()[2].prompt;
    assert!(prompt.contains("Conversation so far:\nBob: two"));
    assert!(!prompt.contains("Alice: one"));
}

#[tokio::test]
async fn test_generation_options_are_forwarded() {
    let gateway = ScriptedGateway::new(vec![]);
    let generation = crate::config::GenerationOptions {
        temperature: 0.2,
        top_p: 0.5,
    };
    let config = DialogueConfig::default()
        .with_max_turns(1)
        .with_generation(generation);
    let handle = use_case(&gateway, config)
        .start(RunDialogueInput::new("q", agents(&[("a", "Alice")])))
        .unwrap();
    finish(handle).await;

    let request = &gateway.requests()[0];
    assert_eq!(request.options, generation);
    assert_eq!(request.endpoint.generate_url(), "http://localhost:11434/api/generate");
}

// ==================== Commit ====================

#[tokio::test]
async fn test_reasoning_and_visible_records_committed() {
    let gateway = ScriptedGateway::new(vec![Script::Chunks(vec![
        "<think>compare ",
        "options</think>",
        " Rust wins.",
    ])]);
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(1))
        .start(RunDialogueInput::new("Which language?", agents(&[("a", "Alice")])))
        .unwrap();
    let outcome = finish(handle).await;

    assert_eq!(
        texts(&outcome.snapshot),
        vec![
            ("user".to_string(), false, "Which language?".to_string()),
            ("a".to_string(), true, "compare options".to_string()),
            ("a".to_string(), false, "Rust wins.".to_string()),
        ]
    );
    let indices: Vec<u64> = outcome.snapshot.messages.iter().map(|m| m.sequence_index).collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_reasoning_is_not_fed_back_into_prompts() {
    let gateway = ScriptedGateway::new(vec![reply("<think>secret plan</think>Public answer")]);
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(1))
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();
    finish(handle).await;

    let bob_prompt = &gateway.requests()[1].prompt;
    assert!(bob_prompt.contains("Alice: Public answer"));
    assert!(!bob_prompt.contains("secret plan"));
}

#[tokio::test]
async fn test_empty_response_commits_nothing() {
    let gateway = ScriptedGateway::new(vec![reply("   ")]);
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(1))
        .start(RunDialogueInput::new("q", agents(&[("a", "Alice")])))
        .unwrap();
    let outcome = finish(handle).await;
    assert_eq!(outcome.snapshot.messages.len(), 1);
}

#[tokio::test]
async fn test_unclosed_think_commits_last_reasoning_line() {
    let gateway = ScriptedGateway::new(vec![Script::Chunks(vec![
        "<think>first idea\n",
        "second idea\n",
        "the answer is 42",
    ])]);
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(1))
        .start(RunDialogueInput::new("q", agents(&[("a", "Alice")])))
        .unwrap();
    let outcome = finish(handle).await;

    assert_eq!(
        texts(&outcome.snapshot)[1..],
        [("a".to_string(), true, "🤔 the answer is 42".to_string())]
    );
}

#[tokio::test]
async fn test_live_segments_show_latest_reasoning_line() {
    let gateway = ScriptedGateway::new(vec![Script::Chunks(vec![
        "<think>step one",
        "\nstep two",
        "</think>Done",
    ])]);
    let observer = Arc::new(RecordingObserver::default());
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(1))
        .with_observer(observer.clone())
        .start(RunDialogueInput::new("q", agents(&[("a", "Alice")])))
        .unwrap();
    finish(handle).await;

    let live = observer.live.lock().unwrap().clone();
    assert_eq!(live.len(), 3);
    assert_eq!(live[0].reasoning.as_deref(), Some("🤔 step one"));
    assert!(live[0].visible.is_empty());
    assert_eq!(live[1].reasoning.as_deref(), Some("🤔 step two"));
    assert!(live[2].reasoning_complete);
    assert_eq!(live[2].visible, "Done");
    assert_eq!(*observer.finished.lock().unwrap(), 1);
}

// ==================== Termination votes ====================

#[tokio::test]
async fn test_unanimous_end_votes_terminate() {
    let gateway = ScriptedGateway::new(vec![
        reply("I think we're done. <conversationEnd/>"),
        reply("Agreed <conversationEnd/>"),
    ]);
    let handle = use_case(&gateway, DialogueConfig::default().unlimited())
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();
    let outcome = finish(handle).await;

    assert_eq!(outcome.end, DialogueEnd::Terminated);
    assert_eq!(outcome.snapshot.status, "All models agreed to stop");
    assert_eq!(outcome.snapshot.phase, DialoguePhase::Terminated);
    assert_eq!(outcome.snapshot.vote_count, 2);
    assert_eq!(gateway.requests().len(), 2);
}

#[tokio::test]
async fn test_transcript_records_events_in_order() {
    let gateway = ScriptedGateway::new(vec![
        reply("Done here <conversationEnd/>"),
        reply("Same <conversationEnd/>"),
    ]);
    let transcript = Arc::new(MemoryConversationLogger::new());
    let handle = use_case(&gateway, DialogueConfig::default())
        .with_conversation_logger(Arc::clone(&transcript) as Arc<dyn ConversationLogger>)
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();
    finish(handle).await;

    assert_eq!(
        transcript.kinds(),
        vec![
            "dialogue_started",
            "message_committed",
            "turn_started",
            "message_committed",
            "termination_vote",
            "turn_started",
            "message_committed",
            "termination_vote",
            "dialogue_finished",
        ]
    );
    let events = transcript.events();
    assert_eq!(events[1].payload["sender"], "user");
    assert_eq!(events[4].payload["votes"], 1);
    assert_eq!(events[8].payload["end"], "terminated");
}

#[tokio::test]
async fn test_cumulative_votes_count_repeat_voters() {
    let gateway = ScriptedGateway::new(vec![
        reply("<conversationEnd/>"),
        reply("Not yet."),
        reply("Still done. <conversationEnd/>"),
    ]);
    let handle = use_case(&gateway, DialogueConfig::default().unlimited())
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();
    let outcome = finish(handle).await;

    assert_eq!(outcome.end, DialogueEnd::Terminated);
    assert_eq!(gateway.models(), vec!["model-a", "model-b", "model-a"]);
}

#[tokio::test]
async fn test_distinct_votes_need_every_agent() {
    let gateway = ScriptedGateway::new(vec![
        reply("<conversationEnd/>"),
        reply("Not yet."),
        reply("<conversationEnd/>"),
        reply("Not yet."),
    ]);
    let config = DialogueConfig::default()
        .with_max_turns(2)
        .with_vote_policy(VotePolicy::Distinct);
    let handle = use_case(&gateway, config)
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();
    let outcome = finish(handle).await;

    assert_eq!(outcome.end, DialogueEnd::TurnLimitReached);
    assert_eq!(outcome.snapshot.vote_count, 1);
}

#[tokio::test]
async fn test_end_marker_inside_reasoning_counts_as_vote() {
    let gateway = ScriptedGateway::new(vec![reply(
        "<think>we covered it all <conversationEnd/></think>Nothing to add.",
    )]);
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(3))
        .start(RunDialogueInput::new("q", agents(&[("a", "Alice")])))
        .unwrap();
    let outcome = finish(handle).await;
    assert_eq!(outcome.end, DialogueEnd::Terminated);
    assert_eq!(outcome.snapshot.vote_count, 1);
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn test_clarification_inside_reasoning_suspends() {
    let gateway = ScriptedGateway::new(vec![reply(
        "<think>maybe <clarifyWithUser>Color?</clarifyWithUser></think>",
    )]);
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(1))
        .start(RunDialogueInput::new("q", agents(&[("a", "Alice")])))
        .unwrap();

    let snapshot = wait_for_phase(&handle, DialoguePhase::ClarifyingSuspended).await;
    assert_eq!(
        snapshot.pending_clarification.map(|p| p.question),
        Some("Color?".to_string())
    );
    handle.cancel();
    assert_eq!(finish(handle).await.end, DialogueEnd::Cancelled);
}

// ==================== Clarification ====================

#[tokio::test]
async fn test_clarification_suspends_and_resumes_same_agent() {
    let gateway = ScriptedGateway::new(vec![
        reply("<clarifyWithUser>What color?</clarifyWithUser>"),
        reply("Blue it is."),
        reply("Nice."),
    ]);
    let observer = Arc::new(RecordingObserver::default());
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(1))
        .with_observer(observer.clone())
        .start(RunDialogueInput::new("Paint the shed", two_agents()))
        .unwrap();

    let suspended = wait_for_phase(&handle, DialoguePhase::ClarifyingSuspended).await;
    let pending = suspended.pending_clarification.clone().unwrap();
    assert_eq!(pending.question, "What color?");
    assert_eq!(pending.agent_id.as_str(), "a");
    assert_eq!(suspended.turn, 1);
    assert_eq!(suspended.status, "Waiting for user clarification…");
    assert_eq!(gateway.requests().len(), 1);

    handle.submit_clarification_answer("Blue").unwrap();
    let outcome = finish(handle).await;

    assert_eq!(outcome.end, DialogueEnd::TurnLimitReached);
    assert_eq!(gateway.models(), vec!["model-a", "model-a", "model-b"]);
    assert!(gateway.requests()[1].prompt.contains("User: Blue"));

    let messages = texts(&outcome.snapshot);
    assert_eq!(messages.len(), 5);
    assert_eq!(messages[2], ("user".to_string(), false, "Blue".to_string()));
    assert!(outcome.snapshot.pending_clarification.is_none());
    assert_eq!(observer.questions.lock().unwrap().as_slice(), ["What color?"]);
}

#[tokio::test]
async fn test_clarification_does_not_advance_turn() {
    let gateway = ScriptedGateway::new(vec![reply(
        "<clarifyWithUser>Which city?</clarifyWithUser>",
    )]);
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(1))
        .start(RunDialogueInput::new("Plan a trip", agents(&[("a", "Alice")])))
        .unwrap();

    wait_for_phase(&handle, DialoguePhase::ClarifyingSuspended).await;
    handle.submit_clarification_answer("Lisbon").unwrap();
    let outcome = finish(handle).await;

    // clarifying sub-step + one real turn
    assert_eq!(gateway.requests().len(), 2);
    assert_eq!(outcome.snapshot.substeps, 2);
    assert_eq!(outcome.end, DialogueEnd::TurnLimitReached);
}

#[tokio::test]
async fn test_answer_rejected_when_not_suspended() {
    let gateway = ScriptedGateway::new(vec![Script::Hang]);
    let handle = use_case(&gateway, DialogueConfig::default())
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();

    wait_for_phase(&handle, DialoguePhase::AwaitingStream).await;
    assert!(matches!(
        handle.submit_clarification_answer("too early"),
        Err(RunDialogueError::NotAwaitingClarification)
    ));
    handle.cancel();
    finish(handle).await;
}

#[tokio::test]
async fn test_second_answer_is_rejected() {
    let gateway = ScriptedGateway::new(vec![
        reply("<clarifyWithUser>Size?</clarifyWithUser>"),
        Script::Hang,
    ]);
    let handle = use_case(&gateway, DialogueConfig::default())
        .start(RunDialogueInput::new("q", agents(&[("a", "Alice")])))
        .unwrap();

    wait_for_phase(&handle, DialoguePhase::ClarifyingSuspended).await;
    handle.submit_clarification_answer("Large").unwrap();
    assert!(handle.submit_clarification_answer("Small").is_err());

    wait_for_phase(&handle, DialoguePhase::AwaitingStream).await;
    handle.cancel();
    let outcome = finish(handle).await;
    let users: Vec<_> = outcome
        .snapshot
        .messages
        .iter()
        .filter(|m| m.is_from_user())
        .map(|m| m.text.clone())
        .collect();
    assert_eq!(users, vec!["q", "Large"]);
}

#[tokio::test]
async fn test_cancel_while_awaiting_clarification() {
    let gateway = ScriptedGateway::new(vec![reply("<clarifyWithUser>Why?</clarifyWithUser>")]);
    let handle = use_case(&gateway, DialogueConfig::default())
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();

    wait_for_phase(&handle, DialoguePhase::ClarifyingSuspended).await;
    handle.cancel();
    let outcome = finish(handle).await;

    assert!(outcome.is_cancelled());
    assert_eq!(outcome.snapshot.status, "Cancelled by user");
    assert!(outcome.snapshot.pending_clarification.is_none());
    assert_eq!(gateway.requests().len(), 1);
}

// ==================== Cancellation ====================

#[tokio::test]
async fn test_cancel_mid_turn_discards_draft() {
    let gateway = ScriptedGateway::new(vec![reply("first"), Script::Hang]);
    let handle = use_case(&gateway, DialogueConfig::default())
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();

    let mut rx = handle.subscribe();
    let before = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.phase == DialoguePhase::AwaitingStream && s.substeps == 1),
    )
    .await
    .unwrap()
    .unwrap()
    .messages
    .len();

    handle.cancel();
    handle.cancel();
    let outcome = finish(handle).await;

    assert_eq!(outcome.end, DialogueEnd::Cancelled);
    assert_eq!(outcome.snapshot.phase, DialoguePhase::Cancelled);
    assert_eq!(outcome.snapshot.messages.len(), before);
    assert_eq!(gateway.requests().len(), 2);
}

#[tokio::test]
async fn test_cancel_after_finish_is_noop() {
    let gateway = ScriptedGateway::new(vec![]);
    let handle = use_case(&gateway, DialogueConfig::default().with_max_turns(1))
        .start(RunDialogueInput::new("q", agents(&[("a", "Alice")])))
        .unwrap();
    let control = handle.control();
    let outcome = finish(handle).await;

    control.cancel();
    assert_eq!(outcome.end, DialogueEnd::TurnLimitReached);
    assert_eq!(control.snapshot().phase, DialoguePhase::TurnLimitReached);
}

// ==================== Transport failures ====================

#[tokio::test]
async fn test_connection_failure_aborts_dialogue() {
    let gateway = ScriptedGateway::new(vec![Script::Refuse(GatewayError::Connection(
        "refused".into(),
    ))]);
    let handle = use_case(&gateway, DialogueConfig::default())
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();
    let outcome = finish(handle).await;

    assert!(outcome.is_aborted());
    match &outcome.end {
        DialogueEnd::Aborted { agent_id, error } => {
            assert_eq!(agent_id.as_str(), "a");
            assert!(error.contains("refused"));
        }
        other => panic!("unexpected end: {:?}", other),
    }
    assert_eq!(outcome.snapshot.status, "Alice error!");
    assert_eq!(gateway.requests().len(), 1);
}

#[tokio::test]
async fn test_http_status_error_aborts_dialogue() {
    let gateway = ScriptedGateway::new(vec![
        reply("fine"),
        Script::Refuse(GatewayError::HttpStatus {
            status: 404,
            body: "model not found".into(),
        }),
    ]);
    let handle = use_case(&gateway, DialogueConfig::default())
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();
    let outcome = finish(handle).await;

    assert_eq!(outcome.snapshot.phase, DialoguePhase::Aborted);
    assert_eq!(outcome.snapshot.status, "Bob error!");
    assert_eq!(gateway.requests().len(), 2);
}

#[tokio::test]
async fn test_stream_error_discards_partial_text() {
    let gateway = ScriptedGateway::new(vec![Script::BreakAfter(
        vec!["half an ans"],
        StreamError::Interrupted("connection reset".into()),
    )]);
    let handle = use_case(&gateway, DialogueConfig::default())
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();
    let outcome = finish(handle).await;

    assert!(outcome.is_aborted());
    assert_eq!(outcome.snapshot.messages.len(), 1);
    assert!(outcome.snapshot.messages[0].is_from_user());
}

#[tokio::test]
async fn test_stream_timeout_aborts_as_timeout() {
    let gateway = ScriptedGateway::new(vec![Script::BreakAfter(
        vec!["<think>still going"],
        StreamError::Timeout,
    )]);
    let handle = use_case(&gateway, DialogueConfig::default())
        .start(RunDialogueInput::new("q", two_agents()))
        .unwrap();
    let outcome = finish(handle).await;

    assert_eq!(
        outcome.end,
        DialogueEnd::Aborted {
            agent_id: AgentId::new("a"),
            error: "Request timed out".to_string(),
        }
    );
    assert_eq!(outcome.snapshot.messages.len(), 1);
}
