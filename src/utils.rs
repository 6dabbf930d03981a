//! Small string helpers for scraping and logging.
//!
//! - Whitespace normalization for text pulled out of HTML
//! - Substring matching used to decide whether a comment mentions the word
//! - Truncation of comment bodies before they are logged

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Trim `s` and collapse every internal whitespace run to a single space.
///
/// Scraped text nodes often carry newlines and indentation from the page
/// markup; this turns them back into a single line.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(collapse_whitespace("  lasting a\n   very short time "), "lasting a very short time");
/// ```
pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}

/// Whether `body` mentions `word`.
///
/// Plain, case-sensitive substring containment, so `"ephemerality"` matches
/// `"ephemeral"`. An empty word never matches.
pub fn mentions(body: &str, word: &str) -> bool {
    !word.is_empty() && body.contains(word)
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (backing off to the nearest
/// character boundary) with an ellipsis and byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        // "é" is two bytes; cutting at 1 must back off to 0.
        let result = truncate_for_log("éé", 1);
        assert_eq!(result, "…(+4 bytes)");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  ephemeral \n"), "ephemeral");
        assert_eq!(
            collapse_whitespace("lasting a\n\t   very short   time"),
            "lasting a very short time"
        );
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_mentions() {
        assert!(mentions("that moment was ephemeral", "ephemeral"));
        assert!(mentions("pure ephemerality", "ephemeral"));
        assert!(!mentions("that moment was Ephemeral", "ephemeral"));
        assert!(!mentions("nothing here", "ephemeral"));
        assert!(!mentions("anything", ""));
    }
}
