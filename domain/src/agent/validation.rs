//! Structured configuration issues.
//!
//! Config validation never stops at the first problem: it collects every
//! [`ConfigIssue`] it finds and lets the caller decide. [`Severity::Error`]
//! issues make the configuration unusable; warnings are reported and the
//! offending value falls back to its default.
//!
//! # Examples
//!
//! ```
//! use roundtable_domain::agent::validation::{ConfigIssue, Severity};
//!
//! let issue = ConfigIssue::empty_field("agents[0].model");
//! assert_eq!(issue.severity, Severity::Error);
//! assert!(issue.message.contains("agents[0].model"));
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Two `[[agents]]` entries share an id.
    DuplicateAgentId { id: String },
    /// A required string field is empty.
    EmptyField { field: String },
    /// A numeric field is outside its accepted range.
    OutOfRange { field: String, value: String },
    /// A string field does not name a known variant.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// No `[[agents]]` entry is enabled.
    NoEnabledAgents,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn duplicate_agent_id(id: &str) -> Self {
        Self {
            severity: Severity::Error,
            code: ConfigIssueCode::DuplicateAgentId { id: id.to_string() },
            message: format!("agent id '{}' is used more than once", id),
        }
    }

    pub fn empty_field(field: &str) -> Self {
        Self {
            severity: Severity::Error,
            code: ConfigIssueCode::EmptyField {
                field: field.to_string(),
            },
            message: format!("{}: must not be empty", field),
        }
    }

    /// An out-of-range value; `fallback` names what is used instead.
    pub fn out_of_range(field: &str, value: impl ToString, fallback: &str) -> Self {
        let value = value.to_string();
        Self {
            severity: Severity::Warning,
            message: format!(
                "{}: value {} is out of range, falling back to {}",
                field, value, fallback
            ),
            code: ConfigIssueCode::OutOfRange {
                field: field.to_string(),
                value,
            },
        }
    }

    pub fn invalid(field: &str, value: impl ToString, reason: &str) -> Self {
        let value = value.to_string();
        Self {
            severity: Severity::Error,
            message: format!("{}: invalid value {} ({})", field, value, reason),
            code: ConfigIssueCode::OutOfRange {
                field: field.to_string(),
                value,
            },
        }
    }

    /// An unknown enum string; `fallback` names the default used instead.
    pub fn invalid_enum(field: &str, value: &str, valid_values: &[&str], fallback: &str) -> Self {
        Self {
            severity: Severity::Warning,
            code: ConfigIssueCode::InvalidEnumValue {
                field: field.to_string(),
                value: value.to_string(),
                valid_values: valid_values.iter().map(|v| v.to_string()).collect(),
            },
            message: format!(
                "{}: unknown value '{}', falling back to '{}'",
                field, value, fallback
            ),
        }
    }

    pub fn no_enabled_agents() -> Self {
        Self {
            severity: Severity::Error,
            code: ConfigIssueCode::NoEnabledAgents,
            message: "no enabled [[agents]] entries configured".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severities() {
        assert!(ConfigIssue::duplicate_agent_id("a").is_error());
        assert!(ConfigIssue::no_enabled_agents().is_error());
        assert!(!ConfigIssue::out_of_range("generation.top_p", 1.5, "0.9").is_error());
    }

    #[test]
    fn test_out_of_range_message() {
        let issue = ConfigIssue::out_of_range("generation.temperature", 3.5, "0.7");
        assert_eq!(
            issue.message,
            "generation.temperature: value 3.5 is out of range, falling back to 0.7"
        );
        assert_eq!(
            issue.code,
            ConfigIssueCode::OutOfRange {
                field: "generation.temperature".to_string(),
                value: "3.5".to_string(),
            }
        );
    }

    #[test]
    fn test_display_prefixes_severity() {
        let issue = ConfigIssue::empty_field("agents[1].id");
        assert_eq!(issue.to_string(), "error: agents[1].id: must not be empty");
    }
}
