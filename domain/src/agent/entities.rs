//! Agent descriptors and the ordered roster of a dialogue.
//!
//! A [`Roster`] is built once per dialogue from the enabled descriptors and
//! never changes afterwards. Its order is the round-robin order.

use super::value_objects::{AgentId, Endpoint};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One configured generation endpoint taking part in the round robin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    pub id: AgentId,
    pub display_name: String,
    pub endpoint: Endpoint,
    pub model_name: String,
    /// Persona/system text placed at the top of the agent's first prompt.
    pub persona_prompt: String,
    pub enabled: bool,
}

impl AgentDescriptor {
    pub fn new(
        id: impl Into<AgentId>,
        display_name: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            endpoint: Endpoint::default(),
            model_name: model_name.into(),
            persona_prompt: String::new(),
            enabled: true,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona_prompt = persona.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Ordered, immutable set of enabled agents for one dialogue.
#[derive(Debug, Clone)]
pub struct Roster {
    agents: Vec<AgentDescriptor>,
}

impl Roster {
    /// Keep the enabled descriptors in registry order.
    ///
    /// Fails with [`DomainError::NoAgentsConfigured`] when nothing is enabled.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = AgentDescriptor>,
    ) -> Result<Self, DomainError> {
        let agents: Vec<_> = descriptors.into_iter().filter(|a| a.enabled).collect();
        if agents.is_empty() {
            return Err(DomainError::NoAgentsConfigured);
        }
        Ok(Self { agents })
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agent at a round-robin cursor position (wraps around).
    pub fn at(&self, cursor: usize) -> &AgentDescriptor {
        &self.agents[cursor % self.agents.len()]
    }

    pub fn get(&self, id: &AgentId) -> Option<&AgentDescriptor> {
        self.agents.iter().find(|a| &a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentDescriptor> {
        self.agents.iter()
    }

    pub fn display_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.display_name.as_str()).collect()
    }

    /// Name shown for a sender id: "User" for the sentinel, the agent's
    /// display name otherwise, the raw id as a last resort.
    pub fn display_name_of<'a>(&'a self, id: &'a AgentId) -> &'a str {
        if id.is_user() {
            return "User";
        }
        self.get(id).map(|a| a.display_name.as_str()).unwrap_or(id.as_str())
    }
}
