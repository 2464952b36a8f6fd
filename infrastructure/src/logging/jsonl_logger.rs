//! JSONL transcript writer for dialogue events.
//!
//! Each [`ConversationEvent`] becomes one JSON object per line. The payload's
//! fields are flattened into the object next to three envelope fields:
//!
//! ```text
//! {"seq":0,"type":"dialogue_started","timestamp":"2026-01-01T10:00:00.000Z","prompt":"...","agents":["alice","bob"]}
//! {"seq":1,"type":"message_committed","timestamp":"...","sender":"user","text":"..."}
//! ```
//!
//! `seq` numbers events in the order the scheduler emitted them, so a
//! transcript can be replayed even when timestamps collide.

use roundtable_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Sink {
    writer: BufWriter<File>,
    next_seq: u64,
}

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via a `Mutex`; every line is flushed as it is written.
pub struct JsonlConversationLogger {
    sink: Mutex<Sink>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Create (or truncate) the transcript at `path`, creating parent
    /// directories as needed.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            sink: Mutex::new(Sink {
                writer: BufWriter::new(file),
                next_seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Like [`create`](Self::create), but logs the failure and returns `None`.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        match Self::create(path) {
            Ok(logger) => Some(logger),
            Err(e) => {
                warn!("Could not create transcript {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of events written so far.
    pub fn events_written(&self) -> u64 {
        self.sink.lock().map(|sink| sink.next_seq).unwrap_or(0)
    }

    fn record(seq: u64, event: ConversationEvent) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = Map::new();
        record.insert("seq".to_string(), Value::from(seq));
        record.insert("type".to_string(), Value::from(event.event_type));
        record.insert("timestamp".to_string(), Value::from(timestamp));
        match event.payload {
            Value::Object(fields) => {
                for (key, value) in fields {
                    // envelope fields win over payload fields of the same name
                    record.entry(key).or_insert(value);
                }
            }
            Value::Null => {}
            other => {
                record.insert("data".to_string(), other);
            }
        }
        Value::Object(record)
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };

        let line = Self::record(sink.next_seq, event).to_string();
        let written = writeln!(sink.writer, "{}", line).and_then(|_| sink.writer.flush());
        match written {
            Ok(()) => sink.next_seq += 1,
            Err(e) => warn!("Failed to write transcript {}: {}", self.path.display(), e),
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.writer.flush();
        }
    }
}
