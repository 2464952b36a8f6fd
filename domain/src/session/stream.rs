//! Streaming events for one generation request.
//!
//! [`StreamEvent`] bridges the transport's byte stream to the scheduler.
//! Exactly one terminal event (`Completed`, `Error` or `Cancelled`) ends
//! every stream.

use thiserror::Error;

/// Why a stream ended before completing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The per-request deadline passed while the body was still arriving.
    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Interrupted(String),
}

/// An event in a streaming generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A text fragment; fragments concatenate in arrival order.
    Delta(String),
    /// The complete response text (signals stream end).
    Completed(String),
    /// A transport failure that ended the stream.
    Error(StreamError),
    /// The request was cancelled before completing.
    Cancelled,
}

impl StreamEvent {
    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamEvent::Delta(_))
    }
}
