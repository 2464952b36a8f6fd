//! Application layer for roundtable
//!
//! This crate contains the turn scheduler use case, port definitions, and
//! application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DialogueConfig, GenerationOptions};
pub use ports::{
    conversation_logger::{
        ConversationEvent, ConversationLogger, MemoryConversationLogger, NoConversationLogger,
    },
    dialogue_observer::{DialogueObserver, NoObserver},
    generation_gateway::{GatewayError, GenerationGateway, GenerationRequest, StreamHandle},
};
pub use use_cases::run_dialogue::{
    DialogueControl, DialogueHandle, RunDialogueError, RunDialogueInput, RunDialogueUseCase,
};
