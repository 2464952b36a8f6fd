//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// What is printed once the dialogue ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Messages are printed live; only the outcome follows
    Live,
    /// The full transcript, printed once at the end
    Transcript,
    /// The message log as JSON
    Json,
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Round-table dialogue between local LLM agents")]
#[command(long_about = r#"
Roundtable lets several text-generation agents discuss a prompt in turns.

Each agent speaks in a fixed round-robin order and sees the recent
conversation. Agents may ask you a question with <clarifyWithUser>...</clarifyWithUser>
and vote to stop with <conversationEnd/>; the dialogue ends once the votes
reach the number of agents, the turn limit is hit, or you press Ctrl+C.

Agents are configured as [[agents]] entries. Configuration files are loaded
from (in priority order):
1. --config <path>          Explicit config file
2. ./roundtable.toml        Project-level config
3. ~/.config/roundtable/config.toml   Global config

Example:
  roundtable "Should we rewrite the billing service in Rust?"
  roundtable --max-turns 3 --transcript run.jsonl "Name our new cat"
"#)]
pub struct Cli {
    /// The opening prompt
    pub prompt: Option<String>,

    /// Full passes through the roster before stopping (0 = unlimited)
    #[arg(short = 't', long, value_name = "N")]
    pub max_turns: Option<u32>,

    /// Number of trailing messages shown to each agent
    #[arg(long, value_name = "N")]
    pub context_window: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "live")]
    pub output: OutputFormat,

    /// Hide reasoning segments in printed messages
    #[arg(long)]
    pub hide_reasoning: bool,

    /// Write a JSONL transcript of dialogue events to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
