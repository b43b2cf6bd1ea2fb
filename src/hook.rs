//! UserPromptSubmit hook protocol.
//!
//! One JSON request arrives on stdin; at most one JSON response leaves on
//! stdout. The caller decides what to do with errors; the binary logs them
//! and still exits successfully.

use std::io::{Read, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{Config, MultipleSentinels};
use crate::directive::Composer;
use crate::intent::{extract_issue_number, Intent, IntentClassifier};

/// Event name echoed back in every response.
pub const HOOK_EVENT_NAME: &str = "UserPromptSubmit";

/// Errors handling a hook invocation.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Invalid JSON input: {0}")]
    InvalidInput(#[from] serde_json::Error),

    #[error("Failed to read hook input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write hook output: {0}")]
    Write(#[source] std::io::Error),
}

/// Request sent by the host. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    /// Raw user prompt
    #[serde(default)]
    pub prompt: Option<String>,

    /// Host session identifier
    #[serde(default)]
    pub session_id: Option<String>,

    /// Working directory reported by the host
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Event that triggered the hook
    #[serde(default)]
    pub hook_event_name: Option<String>,
}

impl HookInput {
    /// Input carrying only a prompt.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self { prompt: Some(prompt.into()), ..Self::default() }
    }

    /// The prompt, or an empty string when absent.
    pub fn prompt(&self) -> &str {
        self.prompt.as_deref().unwrap_or_default()
    }
}

/// Response envelope in the host's wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookOutput {
    #[serde(rename = "hookSpecificOutput")]
    pub hook_specific_output: HookSpecificOutput,
}

/// Event-specific part of the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    pub additional_context: String,
}

impl HookOutput {
    /// Wrap directive text for the host.
    pub fn new(additional_context: impl Into<String>) -> Self {
        Self {
            hook_specific_output: HookSpecificOutput {
                hook_event_name: HOOK_EVENT_NAME.to_string(),
                additional_context: additional_context.into(),
            },
        }
    }

    /// The directive text.
    pub fn additional_context(&self) -> &str {
        &self.hook_specific_output.additional_context
    }
}

/// Classifies prompts and composes the matching directive.
#[derive(Debug, Clone)]
pub struct PromptHook {
    classifier: IntentClassifier,
    composer: Composer,
    config: Config,
}

impl PromptHook {
    /// Create a hook for the given configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            composer: Composer::new(config.directive_context()),
            config: config.clone(),
        }
    }

    /// Produce the response for one request, if any.
    pub fn handle(&self, input: &HookInput) -> Option<HookOutput> {
        let prompt = input.prompt();
        let intent = self.classifier.classify(prompt);
        tracing::debug!(%intent, session = ?input.session_id, "Classified prompt");

        let text = match intent {
            Intent::None => return None,
            Intent::IssueCreate => self.composer.compose(intent, None, None),
            Intent::IssueWork => {
                let issue = extract_issue_number(prompt);
                tracing::debug!(?issue, "Extracted issue number");
                self.composer.compose(intent, issue.as_deref(), None)
            }
            Intent::Approval => self.compose_approval(input),
        };

        text.map(HookOutput::new)
    }

    fn compose_approval(&self, input: &HookInput) -> Option<String> {
        let store = self.config.sentinel_store(input.cwd.as_deref());

        match self.config.sentinel.on_multiple {
            MultipleSentinels::First => {
                let record = store.find_awaiting_approval();
                self.composer.compose(Intent::Approval, None, record.as_ref())
            }
            MultipleSentinels::Clarify => {
                let pending = store.scan();
                if pending.len() > 1 {
                    Some(self.composer.compose_ambiguous(&pending))
                } else {
                    self.composer.compose(Intent::Approval, None, pending.first())
                }
            }
        }
    }

    /// Read one request from `reader` and write the response to `writer`.
    ///
    /// Returns whether a response was written.
    pub fn run<R: Read, W: Write>(&self, mut reader: R, mut writer: W) -> Result<bool, HookError> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        let input: HookInput = serde_json::from_str(&raw)?;

        let Some(output) = self.handle(&input) else {
            return Ok(false);
        };

        serde_json::to_writer(&mut writer, &output).map_err(|e| HookError::Write(e.into()))?;
        writeln!(writer).map_err(HookError::Write)?;
        writer.flush().map_err(HookError::Write)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::directive::{CODE_REVIEW_MANDATORY, NO_PENDING_ISSUE};

    fn config_with_root(root: &std::path::Path) -> Config {
        let mut config = Config::default();
        config.sentinel.roots = vec![root.display().to_string()];
        config
    }

    fn run(hook: &PromptHook, input: &str) -> (Result<bool, HookError>, String) {
        let mut out = Vec::new();
        let result = hook.run(input.as_bytes(), &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_input_prompt_defaults_to_empty() {
        let input: HookInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.prompt(), "");

        let input: HookInput = serde_json::from_str(r#"{"prompt": null}"#).unwrap();
        assert_eq!(input.prompt(), "");
    }

    #[test]
    fn test_input_ignores_unknown_fields() {
        let input: HookInput = serde_json::from_str(
            r#"{"prompt": "hi", "session_id": "abc", "cwd": "/tmp", "transcript_path": "x"}"#,
        )
        .unwrap();
        assert_eq!(input.prompt(), "hi");
        assert_eq!(input.session_id.as_deref(), Some("abc"));
        assert_eq!(input.cwd, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_output_wire_shape() {
        let json = serde_json::to_value(HookOutput::new("do it")).unwrap();
        assert_eq!(json["hookSpecificOutput"]["hookEventName"], "UserPromptSubmit");
        assert_eq!(json["hookSpecificOutput"]["additionalContext"], "do it");
    }

    #[test]
    fn test_no_intent_no_output() {
        let hook = PromptHook::new(&Config::default());
        assert!(hook.handle(&HookInput::from_prompt("what time is it?")).is_none());
        assert!(hook.handle(&HookInput::default()).is_none());
    }

    #[test]
    fn test_create_prompt() {
        let hook = PromptHook::new(&Config::default());
        let out = hook.handle(&HookInput::from_prompt("please create an issue for this")).unwrap();
        assert!(out.additional_context().contains("issue-creator"));
    }

    #[test]
    fn test_work_prompt_extracts_number() {
        let hook = PromptHook::new(&Config::default());
        let out = hook.handle(&HookInput::from_prompt("let's work on issue #75")).unwrap();
        assert!(out.additional_context().contains("Issue Number: #75"));
    }

    #[test]
    fn test_approval_with_sentinel() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("issue-12-awaiting-approval.md"),
            "Title: Fix login\nBranch: fix/login\n",
        )
        .unwrap();

        let hook = PromptHook::new(&config_with_root(temp.path()));
        let out = hook.handle(&HookInput::from_prompt("ship it")).unwrap();
        assert!(out.additional_context().contains("Issue #12"));
        assert!(out.additional_context().contains(CODE_REVIEW_MANDATORY));
    }

    #[test]
    fn test_approval_without_sentinel() {
        let temp = TempDir::new().unwrap();
        let hook = PromptHook::new(&config_with_root(temp.path()));
        let out = hook.handle(&HookInput::from_prompt("ship it")).unwrap();
        assert!(out.additional_context().contains(NO_PENDING_ISSUE));
    }

    #[test]
    fn test_clarify_policy_with_multiple_sentinels() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("issue-3-awaiting-approval.md"), "Title: A\n").unwrap();
        fs::write(temp.path().join("issue-8-awaiting-approval.md"), "Title: B\n").unwrap();

        let mut config = config_with_root(temp.path());
        let first = PromptHook::new(&config).handle(&HookInput::from_prompt("lgtm")).unwrap();
        assert!(first.additional_context().contains("Issue #3"));

        config.sentinel.on_multiple = MultipleSentinels::Clarify;
        let ambiguous = PromptHook::new(&config).handle(&HookInput::from_prompt("lgtm")).unwrap();
        assert!(ambiguous.additional_context().contains("#3"));
        assert!(ambiguous.additional_context().contains("#8"));
        assert!(ambiguous.additional_context().contains("Ask the user which issue"));
    }

    #[test]
    fn test_clarify_policy_with_single_sentinel() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("issue-3-awaiting-approval.md"), "Title: A\n").unwrap();

        let mut config = config_with_root(temp.path());
        config.sentinel.on_multiple = MultipleSentinels::Clarify;
        let out = PromptHook::new(&config).handle(&HookInput::from_prompt("lgtm")).unwrap();
        assert!(out.additional_context().contains(CODE_REVIEW_MANDATORY));
    }

    #[test]
    fn test_run_writes_one_json_line() {
        let hook = PromptHook::new(&Config::default());
        let (result, out) = run(&hook, r#"{"prompt": "create an issue to track this"}"#);
        assert!(result.unwrap());
        assert_eq!(out.lines().count(), 1);
        let parsed: HookOutput = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(parsed.hook_specific_output.hook_event_name, HOOK_EVENT_NAME);
    }

    #[test]
    fn test_run_no_intent_writes_nothing() {
        let hook = PromptHook::new(&Config::default());
        let (result, out) = run(&hook, r#"{"prompt": "hello"}"#);
        assert!(!result.unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn test_run_malformed_input() {
        let hook = PromptHook::new(&Config::default());
        let (result, out) = run(&hook, "{not json");
        let err = result.unwrap_err();
        assert!(matches!(err, HookError::InvalidInput(_)));
        assert!(err.to_string().starts_with("Invalid JSON input"));
        assert!(out.is_empty());
    }
}
