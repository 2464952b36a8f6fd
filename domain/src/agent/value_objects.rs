//! Agent value objects - identifiers and network endpoints.

use serde::{Deserialize, Serialize};

/// Stable identifier of an agent within a roster.
///
/// Message records refer to their sender by this id. The reserved value
/// [`AgentId::USER`] marks records authored by the human.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    /// Sentinel sender id for records written on behalf of the human.
    pub const USER: &'static str = "user";

    /// Creates an AgentId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The sentinel id used for user-authored records.
    pub fn user() -> Self {
        Self(Self::USER.to_string())
    }

    pub fn is_user(&self) -> bool {
        self.0 == Self::USER
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for AgentId {
    fn from(s: T) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host/port pair of a generation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    /// Path of the streaming generation route on every agent endpoint.
    pub const GENERATE_PATH: &'static str = "/api/generate";

    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Full URL of the streaming generation route.
    pub fn generate_url(&self) -> String {
        format!("http://{}:{}{}", self.host, self.port, Self::GENERATE_PATH)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new("localhost", 11434)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}
