//! Progress reporting for dialogue execution

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use roundtable_application::ports::dialogue_observer::DialogueObserver;
use roundtable_domain::core::string::preview;
use roundtable_domain::{AgentDescriptor, DialogueOutcome, MessageRecord, ThinkSplit};
use std::sync::Mutex;
use std::time::Duration;

/// Width of the live preview next to the spinner.
const LIVE_PREVIEW_CHARS: usize = 70;

/// Reports progress with a spinner per turn and prints committed messages
pub struct ProgressReporter {
    formatter: ConsoleFormatter,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new(formatter: ConsoleFormatter) -> Self {
        Self {
            formatter,
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.spinner.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }

    fn clear_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }

    /// Print above the spinner without tearing it.
    fn print(&self, text: &str) {
        let printed = self
            .spinner
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|pb| pb.suspend(|| println!("{}", text))));
        if printed.is_none() {
            println!("{}", text);
        }
    }
}

impl DialogueObserver for ProgressReporter {
    fn on_turn_start(&self, agent: &AgentDescriptor, _substep: u64, turn: u32) {
        self.clear_spinner();
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("[turn {}] {}", turn, agent.display_name));
        pb.set_message("is thinking…");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut guard) = self.spinner.lock() {
            *guard = Some(pb);
        }
    }

    fn on_live_segments(&self, _agent: &AgentDescriptor, split: &ThinkSplit) {
        let message = if !split.reasoning_complete {
            split
                .reasoning
                .as_deref()
                .map(|line| preview(line, LIVE_PREVIEW_CHARS).dimmed().to_string())
        } else if !split.visible.is_empty() {
            Some(preview(&split.visible, LIVE_PREVIEW_CHARS))
        } else {
            None
        };
        if let Some(message) = message {
            self.with_spinner(|pb| pb.set_message(message));
        }
    }

    fn on_message(&self, record: &MessageRecord) {
        // the opening prompt was typed by the user; no need to echo it
        if record.is_from_user() && record.sequence_index == 0 {
            return;
        }
        if let Some(text) = self.formatter.format_record(record) {
            self.print(&format!("\n{}", text));
        }
    }

    fn on_clarification_requested(&self, agent: &AgentDescriptor, _question: &str) {
        self.clear_spinner();
        println!(
            "\n{} {}",
            "?".yellow().bold(),
            format!("{} needs your input", agent.display_name).yellow()
        );
    }

    fn on_finished(&self, _outcome: &DialogueOutcome) {
        self.clear_spinner();
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress {
    formatter: ConsoleFormatter,
}

impl SimpleProgress {
    pub fn new(formatter: ConsoleFormatter) -> Self {
        Self { formatter }
    }
}

impl DialogueObserver for SimpleProgress {
    fn on_turn_start(&self, agent: &AgentDescriptor, _substep: u64, turn: u32) {
        println!(
            "{} {} (turn {})",
            "->".cyan(),
            agent.display_name.bold(),
            turn
        );
    }

    fn on_message(&self, record: &MessageRecord) {
        if record.is_from_user() && record.sequence_index == 0 {
            return;
        }
        if let Some(text) = self.formatter.format_record(record) {
            println!("{}\n", text);
        }
    }
}
