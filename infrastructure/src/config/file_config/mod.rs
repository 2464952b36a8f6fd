//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application and domain
//! types once validated.

mod agents;
mod dialogue;
mod generation;
mod logging;

pub use agents::FileAgentConfig;
pub use dialogue::FileDialogueConfig;
pub use generation::FileGenerationConfig;
pub use logging::FileLoggingConfig;

use roundtable_application::DialogueConfig;
use roundtable_domain::{AgentDescriptor, ConfigIssue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration that cannot be used as-is
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Turn limit, history window and vote counting
    pub dialogue: FileDialogueConfig,
    /// Sampling options and request timeout
    pub generation: FileGenerationConfig,
    /// Transcript logging
    pub logging: FileLoggingConfig,
    /// Agent registry, in speaking order
    pub agents: Vec<FileAgentConfig>,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// An empty registry is not reported here: the registry may still be
    /// filled in by the caller, and starting a dialogue without agents is
    /// rejected by the scheduler itself.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.dialogue.validate());
        issues.extend(self.generation.validate());
        issues.extend(agents::validate_agents(&self.agents));
        if !self.agents.is_empty() && !self.agents.iter().any(|a| a.enabled) {
            issues.push(ConfigIssue::no_enabled_agents());
        }
        issues
    }

    /// Split issues into warnings (returned) and errors (failing the call).
    pub fn ensure_valid(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError::Invalid(errors))
        }
    }

    /// Build the scheduler configuration; invalid values fall back to defaults.
    pub fn to_dialogue_config(&self) -> DialogueConfig {
        let (vote_policy, _) = self.dialogue.parse_vote_policy();
        let (generation, _) = self.generation.to_generation_options();
        DialogueConfig::default()
            .with_max_turns(self.dialogue.max_turns)
            .with_context_window(self.dialogue.context_window.max(1))
            .with_vote_policy(vote_policy)
            .with_generation(generation)
    }

    /// All configured agents in registry order, disabled ones included.
    pub fn agent_descriptors(&self) -> Vec<AgentDescriptor> {
        self.agents.iter().map(FileAgentConfig::to_descriptor).collect()
    }
}
