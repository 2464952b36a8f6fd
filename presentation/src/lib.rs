//! Presentation layer for roundtable
//!
//! This crate contains the CLI definition, console formatting of messages
//! and outcomes, live progress observers and the terminal clarification
//! prompt.

pub mod clarification;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use clarification::ClarificationPrompt;
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
