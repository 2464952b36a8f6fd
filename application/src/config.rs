//! Application-level configuration.
//!
//! These types control how the dialogue use case behaves: how long it runs,
//! how much history each prompt carries and which sampling options are sent
//! with every generation request.

use roundtable_domain::VotePolicy;
use serde::{Deserialize, Serialize};

/// Sampling options forwarded with every generation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f64,
    /// Nucleus-sampling probability.
    pub top_p: f64,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

/// Dialogue behavior configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueConfig {
    /// Full passes through the roster before stopping; `None` is unlimited.
    pub turn_limit: Option<u32>,
    /// Number of trailing message records rendered into each prompt.
    pub context_window: usize,
    pub vote_policy: VotePolicy,
    pub generation: GenerationOptions,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            turn_limit: Some(10),
            context_window: 10,
            vote_policy: VotePolicy::default(),
            generation: GenerationOptions::default(),
        }
    }
}

impl DialogueConfig {
    /// Interpret `0` as "no limit", the convention used by config files and flags.
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.turn_limit = (max_turns > 0).then_some(max_turns);
        self
    }

    pub fn unlimited(mut self) -> Self {
        self.turn_limit = None;
        self
    }

    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }

    pub fn with_vote_policy(mut self, policy: VotePolicy) -> Self {
        self.vote_policy = policy;
        self
    }

    pub fn with_generation(mut self, generation: GenerationOptions) -> Self {
        self.generation = generation;
        self
    }
}
