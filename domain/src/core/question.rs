//! Opening prompt value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The user's opening prompt for a dialogue (Value Object)
///
/// Every agent sees it in its preamble, in full on its first invocation and
/// as a short reminder afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
}

impl Question {
    /// Validate and wrap the prompt text. Whitespace-only input is rejected.
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(DomainError::EmptyPrompt);
        }
        Ok(Self { content })
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
