//! Issue number extraction.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

/// Candidate forms, tried in order. Each has exactly one capture group.
static ISSUE_NUMBER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"#(\d+)",
        r"\bissue\s*#?(\d+)",
        r"\bissue-(\d+)",
        r"\b(?:fix|work\s+on|address|tackle|resolve|handle|debug|implement|close|finish|complete)\s+#?(\d+)\b",
    ]
    .iter()
    .filter_map(|p| match RegexBuilder::new(p).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(pattern = p, error = %e, "Invalid issue number pattern");
            None
        }
    })
    .collect()
});

/// Pull an issue number out of free text.
///
/// Returns the digits of the first candidate form that matches. The number
/// is not checked against any tracker.
pub fn extract_issue_number(text: &str) -> Option<String> {
    ISSUE_NUMBER_PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
