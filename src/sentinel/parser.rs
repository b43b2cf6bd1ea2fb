//! Awaiting-approval sentinel parser.
//!
//! Every field has its own extractor. A missing field leaves the record's
//! default in place; nothing here can fail.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use super::SentinelRecord;

// Key patterns tolerate markdown bold around the key (`**Title:**`).
static TITLE: Lazy<Regex> = Lazy::new(|| field_pattern(r"Title", r"(.+)"));
static BRANCH: Lazy<Regex> = Lazy::new(|| field_pattern(r"Branch", r"`?([^`\n]+)`?"));
static COMPLEXITY: Lazy<Regex> = Lazy::new(|| field_pattern(r"(?i:complexity)", r"(\w+)"));
static SERVER_RESTART: Lazy<Regex> =
    Lazy::new(|| field_pattern(r"(?i:server restart required)", r"(?i:(yes|no))\b"));

const FILES_HEADING: &str = "## Files Modified";
const SUMMARY_HEADING: &str = "## Implementation Summary";

fn field_pattern(key: &str, value: &str) -> Regex {
    let source = format!(r"{key}\**:\**[ \t]*{value}");
    Regex::new(&source).unwrap_or_else(|e| panic!("invalid sentinel field pattern {source}: {e}"))
}

/// Parse sentinel markdown into a record for the given issue.
pub fn parse_sentinel_content(content: &str, issue_number: &str, path: &Path) -> SentinelRecord {
    let mut record = SentinelRecord::new(issue_number, path);

    if let Some(title) = capture(&TITLE, content) {
        record.title = title;
    }
    if let Some(branch) = capture(&BRANCH, content) {
        record.branch = branch;
    }
    if let Some(complexity) = capture(&COMPLEXITY, content) {
        record.complexity = complexity.to_lowercase();
    }
    if let Some(restart) = capture(&SERVER_RESTART, content) {
        record.server_restart_required = restart.eq_ignore_ascii_case("yes");
    }

    record.files_modified = parse_files_modified(content);
    record.implementation_summary = parse_summary(content);

    record
}

fn capture(re: &Regex, content: &str) -> Option<String> {
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Lines following the first heading that starts with `heading`.
fn section_body<'a>(content: &'a str, heading: &str) -> Option<std::str::Lines<'a>> {
    let mut lines = content.lines();
    lines.by_ref().find(|line| line.trim_end().starts_with(heading))?;
    Some(lines)
}

/// Bullet items directly under `## Files Modified`.
///
/// Blank lines before the first bullet are skipped; the list ends at the
/// first line that is not a bullet.
fn parse_files_modified(content: &str) -> Vec<String> {
    let Some(body) = section_body(content, FILES_HEADING) else {
        return Vec::new();
    };

    body.map(str::trim)
        .skip_while(|line| line.is_empty())
        .map_while(|line| line.strip_prefix('-').or_else(|| line.strip_prefix('*')))
        .filter_map(parse_file_item)
        .collect()
}

fn parse_file_item(item: &str) -> Option<String> {
    let item = item.trim_start();
    let item = item.strip_prefix('`').unwrap_or(item);
    let path = item.split('`').next().unwrap_or_default().trim();
    (!path.is_empty()).then(|| path.to_string())
}

/// Free text under `## Implementation Summary`, up to the next heading.
fn parse_summary(content: &str) -> String {
    let Some(body) = section_body(content, SUMMARY_HEADING) else {
        return String::new();
    };

    let text: Vec<&str> = body.take_while(|line| !is_heading(line)).collect();
    text.join("\n").trim().to_string()
}

fn is_heading(line: &str) -> bool {
    let trimmed = line.trim_start();
    let rest = trimmed.trim_start_matches('#');
    rest.len() < trimmed.len() && (rest.is_empty() || rest.starts_with(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn parse(content: &str) -> SentinelRecord {
        let path = PathBuf::from("claudedocs/issue-12-awaiting-approval.md");
        parse_sentinel_content(content, "12", &path)
    }

    const FULL: &str = r#"# Issue #12 Awaiting Approval

Title: Sidebar collapses on resize
Branch: `fix/sidebar-resize`
Complexity: Medium
Server Restart Required: Yes

## Files Modified

- `web/src/Sidebar.tsx` - listen for resize
- `web/src/hooks/useResize.ts`
* server/routes.go

## Implementation Summary

Debounced the resize handler.

Added a hook for viewport width.

## Testing

Manual.
"#;

    #[test]
    fn test_parse_full_sentinel() {
        let record = parse(FULL);
        assert_eq!(record.issue_number, "12");
        assert_eq!(record.title, "Sidebar collapses on resize");
        assert_eq!(record.branch, "fix/sidebar-resize");
        assert_eq!(record.complexity, "medium");
        assert!(record.server_restart_required);
        assert_eq!(
            record.files_modified,
            vec!["web/src/Sidebar.tsx", "web/src/hooks/useResize.ts", "server/routes.go"]
        );
        assert_eq!(
            record.implementation_summary,
            "Debounced the resize handler.\n\nAdded a hook for viewport width."
        );
        assert!(record.parse_error.is_none());
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let record = parse("Title: Only a title\nBranch: main-2\n");
        assert_eq!(record.title, "Only a title");
        assert_eq!(record.branch, "main-2");
        assert_eq!(record.complexity, "low");
        assert!(!record.server_restart_required);
        assert!(record.files_modified.is_empty());
        assert!(record.implementation_summary.is_empty());
    }

    #[test]
    fn test_empty_content() {
        let record = parse("");
        assert_eq!(record.title, "");
        assert_eq!(record.branch, "main");
        assert_eq!(record.complexity, "low");
    }

    #[test]
    fn test_bold_keys() {
        let record = parse("**Title:** Bold title\n**Branch**: `feat/x`\n**Complexity:** HIGH\n");
        assert_eq!(record.title, "Bold title");
        assert_eq!(record.branch, "feat/x");
        assert_eq!(record.complexity, "high");
    }

    #[test]
    fn test_server_restart_no() {
        let record = parse("server restart required: no\n");
        assert!(!record.server_restart_required);
        let record = parse("Server Restart Required: YES\n");
        assert!(record.server_restart_required);
    }

    #[test]
    fn test_title_does_not_span_lines() {
        let record = parse("Title:\nBranch: dev\n");
        assert_eq!(record.title, "");
        assert_eq!(record.branch, "dev");
    }

    #[test]
    fn test_files_list_stops_at_non_bullet() {
        let content = "## Files Modified\n- a.rs\nsome prose\n- b.rs\n";
        assert_eq!(parse(content).files_modified, vec!["a.rs"]);
    }

    #[test]
    fn test_summary_ends_at_any_heading() {
        let content = "## Implementation Summary\nFixed #42 handling.\n### Details\nmore\n";
        assert_eq!(parse(content).implementation_summary, "Fixed #42 handling.");
    }

    #[test]
    fn test_is_heading() {
        assert!(is_heading("## Next"));
        assert!(is_heading("#"));
        assert!(!is_heading("#42 was fixed"));
        assert!(!is_heading("plain"));
    }
}
