//! Directive composition.
//!
//! Turns a classified intent into the instruction text handed to the host.
//! Composition is pure: the same inputs always give the same text.

mod templates;

use crate::intent::Intent;
use crate::sentinel::SentinelRecord;

/// Heading of the block warning that deployment restarts the server.
pub const RESTART_WARNING: &str = "SERVER RESTART WARNING";

/// Marker for a checkpoint that needs explicit human confirmation.
pub const HARD_GATE: &str = "HARD GATE";

/// Marker for the code review step of the closing workflow.
pub const CODE_REVIEW_MANDATORY: &str = "Code review (MANDATORY)";

/// Marker for the closing summary step of the closing workflow.
pub const CLOSING_SUMMARY_MANDATORY: &str = "Post closing summary to issue (MANDATORY)";

/// Heading used when approval language arrives with nothing to approve.
pub const NO_PENDING_ISSUE: &str = "NO PENDING ISSUE FOUND";

/// Project details embedded in directives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveContext {
    /// Repository slug (owner/name)
    pub repository: Option<String>,

    /// Project directory
    pub working_dir: Option<String>,

    /// Branch pull requests must target
    pub target_branch: String,

    /// Directory name holding analysis and sentinel files
    pub sentinel_dir: String,

    /// Agent that files new issues
    pub creator_agent: String,

    /// Agent that analyses and implements issues
    pub worker_agent: String,

    /// Agent that closes approved issues
    pub closer_agent: String,

    /// Model every subagent call must use
    pub model: String,

    /// Commands to run before requesting approval
    pub verify_commands: Vec<String>,
}

impl Default for DirectiveContext {
    fn default() -> Self {
        crate::config::Config::default().directive_context()
    }
}

/// Builds directives from a [`DirectiveContext`].
#[derive(Debug, Clone, Default)]
pub struct Composer {
    ctx: DirectiveContext,
}

impl Composer {
    /// Create a composer for a project.
    pub fn new(ctx: DirectiveContext) -> Self {
        Self { ctx }
    }

    /// Project details used by this composer.
    pub fn context(&self) -> &DirectiveContext {
        &self.ctx
    }

    /// Compose the directive for an intent.
    ///
    /// `issue_number` is only consulted for work requests and `sentinel`
    /// only for approvals. Returns `None` when there is nothing to say.
    pub fn compose(
        &self,
        intent: Intent,
        issue_number: Option<&str>,
        sentinel: Option<&SentinelRecord>,
    ) -> Option<String> {
        let text = match intent {
            Intent::IssueCreate => templates::creator(&self.ctx),
            Intent::IssueWork => templates::worker(&self.ctx, issue_number),
            Intent::Approval => match sentinel {
                Some(record) => templates::closer(&self.ctx, record),
                None => templates::no_sentinel(&self.ctx),
            },
            Intent::None => return None,
        };
        Some(text)
    }

    /// Approval arrived while several issues are awaiting sign-off.
    pub fn compose_ambiguous(&self, pending: &[SentinelRecord]) -> String {
        templates::ambiguous(&self.ctx, pending)
    }
}
