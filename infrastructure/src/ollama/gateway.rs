//! `GenerationGateway` adapter for `POST http://{host}:{port}/api/generate`.
//!
//! The request is sent with `"stream": true`; the response body is read as
//! a byte stream on a spawned task, decoded line by line and forwarded as
//! [`StreamEvent`]s. Every stream ends with exactly one terminal event.

use super::decoder::{DecoderEvent, NdjsonDecoder};
use async_trait::async_trait;
use futures::StreamExt;
use roundtable_application::ports::generation_gateway::{
    GatewayError, GenerationGateway, GenerationRequest, StreamHandle,
};
use roundtable_domain::{StreamError, StreamEvent};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Request body of the generation route.
#[derive(Debug, Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f64,
    top_p: f64,
}

/// What the pump should do after forwarding decoded events.
enum Flow {
    Continue,
    Done,
    ReceiverGone,
}

/// HTTP client for the agents' generation endpoints.
#[derive(Debug, Clone)]
pub struct OllamaGateway {
    client: reqwest::Client,
    timeout: Duration,
}

impl OllamaGateway {
    /// Per-request ceiling, covering connect through the last body byte.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn encode_body(request: &GenerationRequest) -> Result<Vec<u8>, GatewayError> {
        let body = GenerateBody {
            model: &request.model,
            prompt: &request.prompt,
            stream: true,
            options: GenerateOptions {
                temperature: request.options.temperature,
                top_p: request.options.top_p,
            },
        };
        serde_json::to_vec(&body).map_err(|e| GatewayError::Encoding(e.to_string()))
    }

    fn map_send_error(error: reqwest::Error) -> GatewayError {
        if error.is_timeout() {
            GatewayError::Timeout
        } else if error.is_builder() {
            GatewayError::Encoding(error.to_string())
        } else {
            GatewayError::Connection(error.to_string())
        }
    }
}

impl Default for OllamaGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationGateway for OllamaGateway {
    async fn generate(
        &self,
        request: GenerationRequest,
        cancellation: CancellationToken,
    ) -> Result<StreamHandle, GatewayError> {
        let url = request.endpoint.generate_url();
        let body = Self::encode_body(&request)?;
        debug!(
            "POST {} model={} ({} prompt bytes)",
            url,
            request.model,
            request.prompt.len()
        );

        let send = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .timeout(self.timeout)
            .body(body)
            .send();

        let response = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Err(GatewayError::Cancelled),
            response = send => response.map_err(Self::map_send_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} answered HTTP {}: {}", url, status.as_u16(), body);
            return Err(GatewayError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(pump(response, tx, cancellation, request.model));
        Ok(StreamHandle::new(rx))
    }
}

/// Read the body to its end (or cancellation) and emit one terminal event.
async fn pump(
    response: reqwest::Response,
    tx: mpsc::Sender<StreamEvent>,
    cancellation: CancellationToken,
    model: String,
) {
    let mut body = response.bytes_stream();
    let mut decoder = NdjsonDecoder::new();
    let mut text = String::new();

    let terminal = loop {
        let chunk = tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("Stream for {} cancelled after {} bytes", model, text.len());
                break StreamEvent::Cancelled;
            }
            chunk = body.next() => chunk,
        };

        let flow = match chunk {
            Some(Ok(bytes)) => forward(decoder.push(&bytes), &tx, &mut text).await,
            Some(Err(e)) => {
                let error = if e.is_timeout() {
                    StreamError::Timeout
                } else {
                    StreamError::Interrupted(e.to_string())
                };
                warn!("Stream for {} failed: {}", model, error);
                break StreamEvent::Error(error);
            }
            None => match forward(decoder.finish(), &tx, &mut text).await {
                Flow::ReceiverGone => return,
                _ => Flow::Done,
            },
        };

        match flow {
            Flow::Continue => {}
            Flow::Done => break StreamEvent::Completed(text),
            Flow::ReceiverGone => {
                debug!("Receiver for {} dropped, stopping stream", model);
                return;
            }
        }
    };

    if let StreamEvent::Completed(text) = &terminal {
        info!("{} finished streaming ({} bytes)", model, text.len());
    }
    let _ = tx.send(terminal).await;
}

async fn forward(
    events: Vec<DecoderEvent>,
    tx: &mpsc::Sender<StreamEvent>,
    text: &mut String,
) -> Flow {
    for event in events {
        match event {
            DecoderEvent::Delta(delta) => {
                text.push_str(&delta);
                if tx.send(StreamEvent::Delta(delta)).await.is_err() {
                    return Flow::ReceiverGone;
                }
            }
            DecoderEvent::Done => return Flow::Done,
        }
    }
    Flow::Continue
}
