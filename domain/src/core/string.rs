//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Collapse a multi-line text into one line for log output, then truncate.
pub fn preview(s: &str, max_len: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate(&flat, max_len)
}

/// Last line of `s` that contains anything besides whitespace, trimmed.
pub fn last_non_empty_line(s: &str) -> Option<&str> {
    s.lines().rev().map(str::trim).find(|line| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_multibyte() {
        // each char is 3 bytes; cutting inside a char backs up to the boundary
        assert_eq!(truncate("あのねあのね", 8), "あ...");
    }

    #[test]
    fn test_preview_flattens_lines() {
        assert_eq!(preview("a\n  b\tc", 20), "a b c");
        assert_eq!(preview("one two three", 9), "one tw...");
    }

    #[test]
    fn test_last_non_empty_line() {
        assert_eq!(last_non_empty_line("first\nsecond\n\n  "), Some("second"));
        assert_eq!(last_non_empty_line("  only  "), Some("only"));
        assert_eq!(last_non_empty_line("\n \n"), None);
        assert_eq!(last_non_empty_line(""), None);
    }
}
