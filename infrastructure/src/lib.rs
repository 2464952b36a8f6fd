//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the streaming generation client, configuration file
//! loading and the JSONL transcript logger.

pub mod config;
pub mod logging;
pub mod ollama;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileAgentConfig, FileConfig, FileDialogueConfig,
    FileGenerationConfig, FileLoggingConfig,
};
pub use logging::JsonlConversationLogger;
pub use ollama::{DecoderEvent, NdjsonDecoder, OllamaGateway};
