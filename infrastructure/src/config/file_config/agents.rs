//! Agent registry from TOML (`[[agents]]` array)

use roundtable_domain::{AgentDescriptor, ConfigIssue, Endpoint};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One configured agent
///
/// # Example
///
/// ```toml
/// [[agents]]
/// id = "alice"
/// display_name = "Alice"
/// host = "localhost"
/// port = 11434
/// model = "llama3"
/// persona = "You are a pragmatic engineer."
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub id: String,
    pub display_name: String,
    pub host: String,
    pub port: u16,
    pub model: String,
    pub persona: String,
    pub enabled: bool,
}

impl Default for FileAgentConfig {
    fn default() -> Self {
        let endpoint = Endpoint::default();
        Self {
            id: String::new(),
            display_name: String::new(),
            host: endpoint.host,
            port: endpoint.port,
            model: String::new(),
            persona: String::new(),
            enabled: true,
        }
    }
}

impl FileAgentConfig {
    pub fn to_descriptor(&self) -> AgentDescriptor {
        let descriptor = AgentDescriptor::new(
            self.id.trim(),
            self.display_name.trim(),
            self.model.trim(),
        )
        .with_endpoint(Endpoint::new(self.host.trim(), self.port))
        .with_persona(self.persona.clone());
        if self.enabled {
            descriptor
        } else {
            descriptor.disabled()
        }
    }
}

/// Check the registry as a whole: required fields, ports, unique ids.
pub(super) fn validate_agents(agents: &[FileAgentConfig]) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();

    for (index, agent) in agents.iter().enumerate() {
        let field = |name: &str| format!("agents[{}].{}", index, name);

        if agent.id.trim().is_empty() {
            issues.push(ConfigIssue::empty_field(&field("id")));
        } else if !seen.insert(agent.id.trim()) {
            issues.push(ConfigIssue::duplicate_agent_id(agent.id.trim()));
        }
        if agent.display_name.trim().is_empty() {
            issues.push(ConfigIssue::empty_field(&field("display_name")));
        }
        if agent.model.trim().is_empty() {
            issues.push(ConfigIssue::empty_field(&field("model")));
        }
        if agent.host.trim().is_empty() {
            issues.push(ConfigIssue::empty_field(&field("host")));
        }
        if agent.port == 0 {
            issues.push(ConfigIssue::invalid(&field("port"), 0, "port cannot be 0"));
        }
    }

    issues
}
