//! Dialogue configuration from TOML (`[dialogue]` section)

use roundtable_domain::{ConfigIssue, VotePolicy};
use serde::{Deserialize, Serialize};

/// Raw dialogue configuration from TOML
///
/// # Example
///
/// ```toml
/// [dialogue]
/// max_turns = 5                 # 0 = unlimited
/// context_window = 10
/// vote_policy = "cumulative"    # "cumulative" or "distinct"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDialogueConfig {
    /// Full passes through the roster; 0 means unlimited
    pub max_turns: u32,
    /// Trailing message records rendered into each prompt
    pub context_window: usize,
    /// How termination votes are counted
    pub vote_policy: String,
}

impl Default for FileDialogueConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            context_window: 10,
            vote_policy: VotePolicy::default().as_str().to_string(),
        }
    }
}

impl FileDialogueConfig {
    /// Parse vote_policy, falling back to the default with a warning.
    pub fn parse_vote_policy(&self) -> (VotePolicy, Vec<ConfigIssue>) {
        match self.vote_policy.parse::<VotePolicy>() {
            Ok(policy) => (policy, vec![]),
            Err(_) => {
                let fallback = VotePolicy::default();
                let issue = ConfigIssue::invalid_enum(
                    "dialogue.vote_policy",
                    &self.vote_policy,
                    &["cumulative", "distinct"],
                    fallback.as_str(),
                );
                (fallback, vec![issue])
            }
        }
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_vote_policy().1;
        if self.context_window == 0 {
            issues.push(ConfigIssue::invalid(
                "dialogue.context_window",
                0,
                "must be at least 1",
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vote_policy() {
        let config = FileDialogueConfig {
            vote_policy: "distinct".to_string(),
            ..Default::default()
        };
        assert_eq!(config.parse_vote_policy(), (VotePolicy::Distinct, vec![]));
    }

    #[test]
    fn test_unknown_vote_policy_falls_back() {
        let config = FileDialogueConfig {
            vote_policy: "majority".to_string(),
            ..Default::default()
        };
        let (policy, issues) = config.parse_vote_policy();
        assert_eq!(policy, VotePolicy::Cumulative);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_zero_context_window_is_an_error() {
        let config = FileDialogueConfig {
            context_window: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }
}
