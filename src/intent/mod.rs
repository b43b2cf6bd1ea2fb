//! Intent classification for user prompts.
//!
//! Three rule sets decide whether a prompt asks to create an issue, to work
//! on an existing one, or to approve finished work. [`IntentClassifier`]
//! runs them in that order and returns a single [`Intent`], so creation and
//! work can never both apply to one prompt.

mod extract;
mod patterns;
mod rules;

use std::fmt;

use serde::Serialize;

pub use extract::extract_issue_number;
pub use patterns::{APPROVAL, CREATION, WORK};
pub use rules::{Polarity, Rule, RuleSet, Verdict};

/// Workflow intent expressed by a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Open a new tracking issue
    IssueCreate,
    /// Work on an existing issue
    IssueWork,
    /// Approve work paused at the human checkpoint
    Approval,
    /// Nothing to do
    None,
}

impl Intent {
    /// Get display name for the intent.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::IssueCreate => "issue-create",
            Self::IssueWork => "issue-work",
            Self::Approval => "approval",
            Self::None => "none",
        }
    }

    /// Whether any directive should be produced.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A classification together with the rule that decided it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Resulting intent
    pub intent: Intent,

    /// Rule set that produced the intent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_set: Option<&'static str>,

    /// Label of the inclusion rule that matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<&'static str>,
}

impl Classification {
    fn none() -> Self {
        Self { intent: Intent::None, rule_set: None, rule: None }
    }
}

/// Runs the creation, work and approval rule sets in order.
#[derive(Debug, Clone, Copy)]
pub struct IntentClassifier {
    creation: &'static RuleSet,
    work: &'static RuleSet,
    approval: &'static RuleSet,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier over the built-in rule tables.
    pub fn new() -> Self {
        Self { creation: &CREATION, work: &WORK, approval: &APPROVAL }
    }

    /// Classify a prompt. The first rule set to accept it wins.
    pub fn classify(&self, text: &str) -> Intent {
        self.explain(text).intent
    }

    /// Classify a prompt and report the deciding rule.
    pub fn explain(&self, text: &str) -> Classification {
        let stages = [
            (Intent::IssueCreate, self.creation),
            (Intent::IssueWork, self.work),
            (Intent::Approval, self.approval),
        ];

        for (intent, set) in stages {
            match set.evaluate(text) {
                Verdict::Included(label) => {
                    tracing::debug!(intent = %intent, rule = label, "Intent matched");
                    return Classification {
                        intent,
                        rule_set: Some(set.name()),
                        rule: Some(label),
                    };
                }
                Verdict::Excluded(label) => {
                    tracing::debug!(rule_set = set.name(), rule = label, "Rule set vetoed");
                }
                Verdict::NoMatch => {}
            }
        }

        Classification::none()
    }

    /// Creation rule set.
    pub fn creation(&self) -> &'static RuleSet {
        self.creation
    }

    /// Work rule set.
    pub fn work(&self) -> &'static RuleSet {
        self.work
    }

    /// Approval rule set.
    pub fn approval(&self) -> &'static RuleSet {
        self.approval
    }
}
