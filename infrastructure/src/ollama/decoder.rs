//! Newline-delimited JSON decoder for generation responses.
//!
//! The endpoint answers with one JSON object per line:
//!
//! ```text
//! {"response":"Hel","done":false}
//! {"response":"lo","done":false}
//! {"response":"","done":true}
//! ```
//!
//! Network chunks do not respect line boundaries (or UTF-8 boundaries), so
//! bytes are buffered until a full line is available. Lines that fail to
//! parse are dropped; agents and proxies emit blank or keep-alive lines.

use serde::Deserialize;
use tracing::debug;

/// One decoded record of the response stream.
#[derive(Debug, Default, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    done: Option<bool>,
}

/// What a decoded line contributes to the turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderEvent {
    /// A text fragment, to be appended in order.
    Delta(String),
    /// The endpoint marked the stream complete.
    Done,
}

/// Incremental line decoder. Feed chunks with [`push`](Self::push) and call
/// [`finish`](Self::finish) once the body ends.
#[derive(Debug, Default)]
pub struct NdjsonDecoder {
    buffer: Vec<u8>,
}

impl NdjsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and decode every complete line it finished.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<DecoderEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            Self::decode_line(&line[..newline], &mut events);
        }
        events
    }

    /// Give leftover bytes one last decode attempt and clear the buffer.
    pub fn finish(&mut self) -> Vec<DecoderEvent> {
        let rest = std::mem::take(&mut self.buffer);
        let mut events = Vec::new();
        Self::decode_line(&rest, &mut events);
        events
    }

    /// Bytes waiting for a line terminator.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    fn decode_line(line: &[u8], events: &mut Vec<DecoderEvent>) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.iter().all(u8::is_ascii_whitespace) {
            return;
        }

        match serde_json::from_slice::<GenerateChunk>(line) {
            Ok(chunk) => {
                if let Some(text) = chunk.response
                    && !text.is_empty()
                {
                    events.push(DecoderEvent::Delta(text));
                }
                if chunk.done == Some(true) {
                    events.push(DecoderEvent::Done);
                }
            }
            Err(e) => {
                debug!(
                    "Dropping malformed stream line ({} bytes): {}",
                    line.len(),
                    e
                );
            }
        }
    }
}
