//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No agents configured for the dialogue")]
    NoAgentsConfigured,

    #[error("Opening prompt cannot be empty")]
    EmptyPrompt,
}
