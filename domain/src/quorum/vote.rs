//! Termination votes
//!
//! Agents vote to end the dialogue by emitting the end marker. Under the
//! default [`VotePolicy::Cumulative`] every marker counts, so one agent that
//! votes in several turns contributes several votes. [`VotePolicy::Distinct`]
//! counts each agent at most once.

use crate::agent::value_objects::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How repeated end votes from one agent are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VotePolicy {
    /// Additive counter; every end marker is one vote.
    #[default]
    Cumulative,
    /// Set semantics; one vote per agent id.
    Distinct,
}

impl VotePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            VotePolicy::Cumulative => "cumulative",
            VotePolicy::Distinct => "distinct",
        }
    }
}

impl std::str::FromStr for VotePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cumulative" | "additive" => Ok(VotePolicy::Cumulative),
            "distinct" | "unique" => Ok(VotePolicy::Distinct),
            other => Err(format!("unknown vote policy: {}", other)),
        }
    }
}

impl std::fmt::Display for VotePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tally of end votes within one dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationVotes {
    policy: VotePolicy,
    count: usize,
    voters: BTreeSet<AgentId>,
}

impl TerminationVotes {
    pub fn new(policy: VotePolicy) -> Self {
        Self {
            policy,
            count: 0,
            voters: BTreeSet::new(),
        }
    }

    /// Record one end marker from `agent`. Returns the effective vote count.
    pub fn record(&mut self, agent: &AgentId) -> usize {
        let first_time = self.voters.insert(agent.clone());
        if first_time || self.policy == VotePolicy::Cumulative {
            self.count += 1;
        }
        self.count
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Agents that voted at least once.
    pub fn voters(&self) -> impl Iterator<Item = &AgentId> {
        self.voters.iter()
    }

    pub fn policy(&self) -> VotePolicy {
        self.policy
    }

    /// The dialogue ends once the tally reaches the number of agents.
    pub fn is_unanimous(&self, agent_count: usize) -> bool {
        agent_count > 0 && self.count >= agent_count
    }
}
