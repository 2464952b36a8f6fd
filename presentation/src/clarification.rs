//! Terminal prompt for clarification questions.
//!
//! ```text
//! ───────────────────────────────────────────────
//!   Alice asks: What color should the shed be?
//! ───────────────────────────────────────────────
//! answer> Blue
//! ```

use colored::Colorize;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

/// Reads clarification answers line by line.
pub struct ClarificationPrompt<R> {
    lines: tokio::io::Lines<R>,
}

impl ClarificationPrompt<BufReader<Stdin>> {
    /// Prompt reading from the process's stdin.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> ClarificationPrompt<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Show `question` and wait for a non-empty answer.
    ///
    /// Returns `Ok(None)` once input is exhausted.
    pub async fn ask(&mut self, asker: &str, question: &str) -> io::Result<Option<String>> {
        Self::display_question(asker, question);
        loop {
            print!("{} ", "answer>".green().bold());
            io::stdout().flush()?;

            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            let answer = line.trim();
            if !answer.is_empty() {
                return Ok(Some(answer.to_string()));
            }
        }
    }

    fn display_question(asker: &str, question: &str) {
        let rule = "─".repeat(47);
        println!();
        println!("{}", rule.yellow());
        println!("  {} {}", format!("{} asks:", asker).yellow().bold(), question);
        println!("{}", rule.yellow());
    }
}
