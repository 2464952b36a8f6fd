//! Generation configuration from TOML (`[generation]` section)

use roundtable_application::GenerationOptions;
use roundtable_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw generation configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    /// Per-request timeout for the generation endpoint
    pub timeout_seconds: u64,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        let options = GenerationOptions::default();
        Self {
            temperature: options.temperature,
            top_p: options.top_p,
            timeout_seconds: 300,
        }
    }
}

impl FileGenerationConfig {
    /// Sampling options, with out-of-range values replaced by defaults.
    pub fn to_generation_options(&self) -> (GenerationOptions, Vec<ConfigIssue>) {
        let defaults = GenerationOptions::default();
        let mut options = defaults;
        let mut issues = Vec::new();

        if !(0.0..=2.0).contains(&self.temperature) {
            issues.push(ConfigIssue::out_of_range(
                "generation.temperature",
                self.temperature,
                &defaults.temperature.to_string(),
            ));
        } else {
            options.temperature = self.temperature;
        }

        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            issues.push(ConfigIssue::out_of_range(
                "generation.top_p",
                self.top_p,
                &defaults.top_p.to_string(),
            ));
        } else {
            options.top_p = self.top_p;
        }

        (options, issues)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.to_generation_options().1;
        if self.timeout_seconds == 0 {
            issues.push(ConfigIssue::invalid(
                "generation.timeout_seconds",
                0,
                "timeout cannot be 0",
            ));
        }
        issues
    }
}
