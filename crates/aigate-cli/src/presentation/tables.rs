//! Table formatting utilities for CLI output.

use std::fmt::Write as _;

use aigate_core::Function;

const NAME_WIDTH: usize = 24;

/// Truncates a string to at most `max_chars` characters, adding "..." if needed.
///
/// Counts characters, not bytes, so CJK text is never split mid-character.
///
/// ```rust
/// use aigate_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Render the function listing as a two-column table.
pub fn format_functions(functions: &[Function]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<NAME_WIDTH$} Description", "Name");
    let _ = writeln!(out, "{}", "-".repeat(NAME_WIDTH + 12));
    for function in functions {
        let _ = writeln!(
            out,
            "{:<NAME_WIDTH$} {}",
            truncate_string(&function.name, NAME_WIDTH - 1),
            function.description
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_string("中文翻译成英文", 5), "中文...");
        assert_eq!(truncate_string("abc", 3), "abc");
    }

    #[test]
    fn function_table_lists_every_entry() {
        let table = format_functions(&[
            Function {
                name: "summarize".into(),
                description: "文本总结".into(),
            },
            Function {
                name: "translate_zh_to_en".into(),
                description: "中文翻译成英文".into(),
            },
        ]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[2].starts_with("summarize "));
        assert!(lines[3].ends_with("中文翻译成英文"));
    }
}
