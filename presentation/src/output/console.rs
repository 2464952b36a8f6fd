//! Console output formatter for dialogue results

use colored::Colorize;
use roundtable_domain::{
    AgentDescriptor, AgentId, DialogueEnd, DialogueOutcome, MessageRecord,
};
use std::collections::HashMap;

/// Formats message records and outcomes for console display
pub struct ConsoleFormatter {
    names: HashMap<AgentId, String>,
    show_reasoning: bool,
}

impl ConsoleFormatter {
    pub fn new<'a>(agents: impl IntoIterator<Item = &'a AgentDescriptor>) -> Self {
        Self {
            names: agents
                .into_iter()
                .map(|a| (a.id.clone(), a.display_name.clone()))
                .collect(),
            show_reasoning: true,
        }
    }

    pub fn with_show_reasoning(mut self, show: bool) -> Self {
        self.show_reasoning = show;
        self
    }

    fn name_of<'a>(&'a self, id: &'a AgentId) -> &'a str {
        if id.is_user() {
            return "User";
        }
        self.names.get(id).map(String::as_str).unwrap_or(id.as_str())
    }

    /// Format one committed record; `None` for hidden reasoning.
    pub fn format_record(&self, record: &MessageRecord) -> Option<String> {
        let name = self.name_of(&record.sender_id);
        if record.is_reasoning {
            if !self.show_reasoning {
                return None;
            }
            let body = record
                .text
                .lines()
                .map(|line| format!("  │ {}", line))
                .collect::<Vec<_>>()
                .join("\n");
            return Some(format!(
                "{}\n{}",
                format!("── {} (reasoning) ──", name).dimmed(),
                body.dimmed()
            ));
        }

        let header = if record.is_from_user() {
            format!("── {} ──", name).green().bold()
        } else {
            format!("── {} ──", name).yellow().bold()
        };
        Some(format!("{}\n{}", header, record.text))
    }

    /// Format the complete transcript followed by the outcome line
    pub fn format_transcript(&self, outcome: &DialogueOutcome) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Round-table Transcript"));
        output.push('\n');

        for record in outcome.snapshot.messages.iter() {
            if let Some(text) = self.format_record(record) {
                output.push('\n');
                output.push_str(&text);
                output.push('\n');
            }
        }

        output.push('\n');
        output.push_str(&self.format_outcome(outcome));
        output.push_str(&Self::footer());
        output
    }

    /// One-line summary of how the dialogue ended
    pub fn format_outcome(&self, outcome: &DialogueOutcome) -> String {
        let snapshot = &outcome.snapshot;
        let stats = format!(
            "({} messages, {} sub-steps, {} end votes)",
            snapshot.messages.len(),
            snapshot.substeps,
            snapshot.vote_count
        )
        .dimmed();

        let status = match &outcome.end {
            DialogueEnd::Terminated => snapshot.status.green().bold(),
            DialogueEnd::TurnLimitReached => snapshot.status.cyan().bold(),
            DialogueEnd::Cancelled => snapshot.status.yellow().bold(),
            DialogueEnd::Aborted { .. } => snapshot.status.red().bold(),
        };

        let mut line = format!("{} {}", status, stats);
        if let DialogueEnd::Aborted { agent_id, error } = &outcome.end {
            line.push_str(&format!("\n{} {}: {}", "Error:".red(), self.name_of(agent_id), error));
        }
        line.push('\n');
        line
    }

    /// Format the message log as JSON
    pub fn format_json(outcome: &DialogueOutcome) -> String {
        let messages: Vec<&MessageRecord> = outcome.snapshot.messages.iter().collect();
        let value = serde_json::json!({
            "end": outcome.end.phase().as_str(),
            "status": outcome.snapshot.status,
            "turn": outcome.snapshot.turn,
            "votes": outcome.snapshot.vote_count,
            "messages": messages,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}
