//! Generation gateway port
//!
//! Defines how the scheduler talks to an agent's streaming generation
//! endpoint. The adapter lives in the infrastructure layer.

use crate::config::GenerationOptions;
use async_trait::async_trait;
use roundtable_domain::{Endpoint, StreamError, StreamEvent};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while opening or consuming a generation stream.
///
/// Everything except [`GatewayError::Cancelled`] is a transport error and
/// aborts the whole dialogue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to encode request: {0}")]
    Encoding(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,
}

impl GatewayError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GatewayError::Cancelled)
    }
}

impl From<StreamError> for GatewayError {
    fn from(error: StreamError) -> Self {
        match error {
            StreamError::Timeout => GatewayError::Timeout,
            StreamError::Interrupted(message) => GatewayError::Stream(message),
        }
    }
}

/// One generation request for one agent turn.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub endpoint: Endpoint,
    pub model: String,
    pub prompt: String,
    pub options: GenerationOptions,
}

/// Handle for receiving streaming events of one request.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. Adapters guarantee exactly one
/// terminal event per stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Next event, or `None` once the adapter dropped its sender.
    pub async fn next(&mut self) -> Option<StreamEvent> {
        self.receiver.recv().await
    }
}

/// Gateway to the agents' streaming generation endpoints.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    /// Open a streaming generation request.
    ///
    /// Errors returned here happen before any text arrived (connection,
    /// status, encoding). Once a handle is returned, failures arrive as
    /// terminal [`StreamEvent`]s. Firing `cancellation` ends the stream with
    /// [`StreamEvent::Cancelled`] or makes this call return
    /// [`GatewayError::Cancelled`].
    async fn generate(
        &self,
        request: GenerationRequest,
        cancellation: CancellationToken,
    ) -> Result<StreamHandle, GatewayError>;
}
