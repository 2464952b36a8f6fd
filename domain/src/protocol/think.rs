//! Reasoning/visible segmentation of agent output.
//!
//! Agents wrap internal deliberation in `<think>...</think>`. The scanner is
//! run on the growing text after every delta (for the live view) and once on
//! the finalized text (for committing records). The policy:
//!
//! | Input | reasoning | visible | complete |
//! |-------|-----------|---------|----------|
//! | no `<think>` | `None` | trimmed text | `true` |
//! | `<think>A</think>B` | `Some("A")` | `"B"` | `true` |
//! | `<think>A` (still open) | `Some("🤔 A")` | `""` | `false` |
//!
//! A second `</think>` after the first closing marker is treated as
//! malformed structure and the whole text becomes visible.

use crate::core::string::last_non_empty_line;

pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";

/// Prefix shown in front of the latest in-progress reasoning line.
pub const LIVE_REASONING_PREFIX: &str = "🤔 ";

/// Result of scanning accumulated text for a reasoning segment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThinkSplit {
    pub reasoning: Option<String>,
    pub visible: String,
    /// `false` while a reasoning segment is open and the answer is withheld.
    pub reasoning_complete: bool,
}

impl ThinkSplit {
    fn plain(text: &str) -> Self {
        Self {
            reasoning: None,
            visible: text.trim().to_string(),
            reasoning_complete: true,
        }
    }
}

/// Split `text` into reasoning and visible segments.
pub fn extract_think(text: &str) -> ThinkSplit {
    let Some(open_at) = text.find(THINK_OPEN) else {
        return ThinkSplit::plain(text);
    };
    let after_open = &text[open_at + THINK_OPEN.len()..];

    match after_open.find(THINK_CLOSE) {
        Some(close_at) => {
            let inner = after_open[..close_at].trim();
            let rest = &after_open[close_at + THINK_CLOSE.len()..];
            if rest.contains(THINK_CLOSE) {
                return ThinkSplit::plain(text);
            }
            ThinkSplit {
                reasoning: (!inner.is_empty()).then(|| inner.to_string()),
                visible: rest.trim().to_string(),
                reasoning_complete: true,
            }
        }
        None => ThinkSplit {
            reasoning: last_non_empty_line(after_open)
                .map(|line| format!("{}{}", LIVE_REASONING_PREFIX, line)),
            visible: String::new(),
            reasoning_complete: false,
        },
    }
}
