//! One agent turn: open the stream, accumulate text, watch for cancellation.

use crate::ports::dialogue_observer::DialogueObserver;
use crate::ports::generation_gateway::{GatewayError, GenerationGateway, GenerationRequest};
use roundtable_domain::{AgentDescriptor, StreamEvent, extract_think};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// How a turn's stream ended when it did not complete.
#[derive(Debug)]
pub(crate) enum TurnFailure {
    Cancelled,
    Transport(GatewayError),
}

impl From<GatewayError> for TurnFailure {
    fn from(error: GatewayError) -> Self {
        if error.is_cancelled() {
            TurnFailure::Cancelled
        } else {
            TurnFailure::Transport(error)
        }
    }
}

/// Draft state of the in-flight turn.
///
/// Lives for exactly one turn; its text reaches the message log only after
/// the stream completed.
pub(crate) struct StreamSession<'a> {
    agent: &'a AgentDescriptor,
    accumulated: String,
    cancellation: CancellationToken,
}

impl<'a> StreamSession<'a> {
    pub(crate) fn new(agent: &'a AgentDescriptor, cancellation: CancellationToken) -> Self {
        Self {
            agent,
            accumulated: String::new(),
            cancellation,
        }
    }

    /// Drive the stream to its terminal event and return the final text.
    pub(crate) async fn run<G: GenerationGateway + ?Sized>(
        mut self,
        gateway: &G,
        request: GenerationRequest,
        observer: &dyn DialogueObserver,
    ) -> Result<String, TurnFailure> {
        let mut handle = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => return Err(TurnFailure::Cancelled),
            opened = gateway.generate(request, self.cancellation.clone()) => opened?,
        };

        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => {
                    debug!("Turn for {} cancelled, discarding {} bytes of draft", self.agent.id, self.accumulated.len());
                    return Err(TurnFailure::Cancelled);
                }
                event = handle.next() => event,
            };

            match event {
                Some(StreamEvent::Delta(chunk)) => {
                    trace!("Delta from {}: {} bytes", self.agent.id, chunk.len());
                    self.accumulated.push_str(&chunk);
                    observer.on_stream_delta(self.agent, &chunk);
                    observer.on_live_segments(self.agent, &extract_think(&self.accumulated));
                }
                Some(StreamEvent::Completed(text)) => {
                    if self.accumulated.is_empty() {
                        self.accumulated = text;
                    }
                    return Ok(self.accumulated);
                }
                Some(StreamEvent::Error(e)) => {
                    return Err(TurnFailure::Transport(GatewayError::from(e)));
                }
                Some(StreamEvent::Cancelled) => return Err(TurnFailure::Cancelled),
                // channel closed without a terminal event
                None => return Ok(self.accumulated),
            }
        }
    }
}
