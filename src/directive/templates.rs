//! Directive text templates.

use super::{
    DirectiveContext, CLOSING_SUMMARY_MANDATORY, CODE_REVIEW_MANDATORY, HARD_GATE,
    NO_PENDING_ISSUE, RESTART_WARNING,
};
use crate::sentinel::SentinelRecord;

/// Hand the request to the issue creation agent.
pub(super) fn creator(ctx: &DirectiveContext) -> String {
    let mut text = format!(
        "AUTOMATED TRIGGER: The user has expressed intent to create a GitHub issue. \
         You MUST invoke the '{agent}' subagent via the Task tool with \
         subagent_type='{agent}' to handle this request. Pass the user's full original \
         prompt as the task description. The subagent will handle all workflow phases: \
         context gathering, duplicate detection, issue composition, labeling, and creation.",
        agent = ctx.creator_agent
    );
    if let Some(repo) = &ctx.repository {
        text.push_str(&format!(" Repository: {repo}"));
    }
    text
}

/// Multi-phase orchestration for working on an issue.
pub(super) fn worker(ctx: &DirectiveContext, issue_number: Option<&str>) -> String {
    let dir = &ctx.sentinel_dir;
    let model = &ctx.model;

    let verify = if ctx.verify_commands.is_empty() {
        "- Run the project's build and test commands\n".to_string()
    } else {
        ctx.verify_commands.iter().map(|cmd| format!("- Run: {cmd}\n")).collect()
    };

    let mut text = format!(
        r###"
ORCHESTRATOR INSTRUCTIONS FOR {worker_upper} MULTI-PHASE WORKFLOW
================================================================

YOU (the orchestrator) are RESPONSIBLE for managing this workflow. You MUST NOT
delegate the entire workflow to a single subagent call. Instead, you will execute
this as a MULTI-PHASE process with verification between each phase.

CRITICAL REQUIREMENTS:
----------------------
1. Subagent reports are CLAIMS, not facts. You MUST verify all claims.
2. {HARD_GATE}S require user approval. You CANNOT proceed without it.
3. All subagent calls MUST use model: "{model}"
4. {RESTART_WARNING}: If implementation requires deploying a new binary,
   you MUST warn the user that active sessions will be disconnected.

PHASE STRUCTURE:
----------------

PHASE 1: ANALYSIS (Read-Only)
- Fetch issue details via gh CLI
- Read CLAUDE.md and README.md
- Explore affected codebase areas
- Create analysis document: {dir}/issue-XX-analysis.md
- {HARD_GATE}: Present findings to user, get approval to proceed

PHASE 2: IMPLEMENTATION (Write Operations)
- Create feature branch (if medium/high complexity)
- Implement changes following existing patterns
{verify}- Create sentinel: {dir}/issue-XX-awaiting-approval.md with
  Title:, Branch:, Complexity:, Server Restart Required: Yes|No,
  a "## Files Modified" bullet list and a "## Implementation Summary" section
- {HARD_GATE}: User MUST manually test and approve before proceeding

PHASE 3: CLOSING (handled by {closer} agent)
- Only triggered after user explicitly approves
- Code review, PR creation/merge, issue close

VERIFICATION CHECKLIST (After EVERY phase):
-------------------------------------------
[ ] Read actual files that were supposedly modified
[ ] Run: git status && git diff
[ ] Compare claimed actions against actual state
[ ] Report ANY discrepancies to user before proceeding
"###,
        worker_upper = ctx.worker_agent.to_uppercase(),
        closer = ctx.closer_agent,
    );

    let repo_flag = ctx.repository.as_deref().map(|r| format!(" --repo {r}")).unwrap_or_default();

    match issue_number {
        Some(n) => {
            text.push_str(&format!(
                r#"
ISSUE CONTEXT:
--------------
Issue Number: #{n}
{project}Target Branch: {branch}

BEGIN PHASE 1:
--------------
1. Create directory if needed: mkdir -p {dir}
2. Fetch issue details:
   gh issue view {n}{repo_flag}
3. Read project context:
   - CLAUDE.md for project rules
   - README.md for architecture
4. Explore affected code areas based on issue description
5. Create analysis document: {dir}/issue-{n}-analysis.md
6. Present findings to user
7. {HARD_GATE}: Wait for user approval before Phase 2
"#,
                project = project_lines(ctx),
                branch = ctx.target_branch,
            ));
        }
        None => {
            text.push_str(&format!(
                r#"
ISSUE IDENTIFICATION NEEDED:
----------------------------
No specific issue number was detected in the user's request.

BEFORE starting the multi-phase workflow:
1. Ask the user which issue they want to work on
2. Optionally list recent open issues to help them decide:
   gh issue list{repo_flag} --state open --limit 10
3. Once issue is confirmed, proceed with Phase 1 as described above

{project}"#,
                project = project_lines(ctx),
            ));
        }
    }

    text
}

/// Hand an approved issue to the closing agent.
pub(super) fn closer(ctx: &DirectiveContext, record: &SentinelRecord) -> String {
    let n = &record.issue_number;
    let title = if record.title.is_empty() { "Unknown Issue" } else { record.title.as_str() };
    let path = record.sentinel_path.display();
    let restart = record.server_restart_required;

    let mut details = String::new();
    if !record.files_modified.is_empty() {
        details.push_str(&format!("- Files Modified: {}\n", record.files_modified.join(", ")));
    }
    if let Some(err) = &record.parse_error {
        details.push_str(&format!("- Sentinel Parse Error: {err} (read the file manually)\n"));
    }

    let restart_block = if restart {
        format!(
            r#"
{RESTART_WARNING}:
-----------------------
This implementation requires deploying a new binary, which will restart the
server and disconnect all active sessions. The {closer} agent
MUST warn the user before deployment.
"#,
            closer = ctx.closer_agent
        )
    } else {
        String::new()
    };

    let deploy_reminder = if restart {
        "WARN BEFORE DEPLOYMENT - server restart required"
    } else {
        "No server restart needed for this change"
    };

    format!(
        r#"
AUTOMATED TRIGGER: Issue Approval Detected
===========================================

The user has approved changes for Issue #{n}. You MUST invoke the
'{closer}' subagent via the Task tool to handle the closing workflow.

DETECTED CONTEXT:
-----------------
- Issue Number: #{n}
- Title: {title}
- Branch: {branch}
- Complexity: {complexity}
- Sentinel File: {path}
- Server Restart Required: {restart_label}
{details}{restart_block}
REQUIRED ACTION:
----------------
Invoke the {closer} agent with:

```
Task tool:
  subagent_type: "{closer}"
  model: "{model}"
  prompt: |
    Execute the closing workflow for Issue #{n}.

    1. Read the sentinel file: {path}
    2. Execute ALL steps in order:
       - {CODE_REVIEW_MANDATORY}
       - Git verification
       - PR creation (if on branch: {branch})
       - PR review and merge
       - {CLOSING_SUMMARY_MANDATORY}
       - Close issue
       - Cleanup (delete sentinel file)

    Return comprehensive completion report.
```

WORKFLOW REMINDERS:
-------------------
- Code review is MANDATORY - do not skip
- PR must target `{target}` branch
- Closing summary is MANDATORY before closing the issue
- Delete sentinel file after successful close
- {deploy_reminder}

DO NOT proceed with any other actions until the {closer} workflow is complete.
"#,
        closer = ctx.closer_agent,
        model = ctx.model,
        branch = record.branch,
        complexity = record.complexity,
        restart_label = if restart { "Yes" } else { "No" },
        target = ctx.target_branch,
    )
}

/// Approval language with no paused workflow to approve.
pub(super) fn no_sentinel(ctx: &DirectiveContext) -> String {
    format!(
        r#"
ISSUE APPROVAL PATTERN DETECTED - BUT {NO_PENDING_ISSUE}
=============================================================

The user's message appears to approve changes, but no awaiting-approval
sentinel file was found in {dir}/.

This could mean:
1. The {worker} workflow has not yet reached the approval checkpoint
2. The sentinel file was already processed and deleted
3. The user is approving something other than an {worker} implementation

RECOMMENDED ACTION:
-------------------
Ask the user to clarify:
- Which issue they are approving
- Whether they want to invoke the {closer} agent manually
- If they are responding to something other than an {worker} implementation

Do not guess. If the user specifies an issue number, you can manually invoke
the {closer} agent.
"#,
        dir = ctx.sentinel_dir,
        worker = ctx.worker_agent,
        closer = ctx.closer_agent,
    )
}

/// Approval language while several issues await sign-off.
pub(super) fn ambiguous(ctx: &DirectiveContext, pending: &[SentinelRecord]) -> String {
    let list: String = pending
        .iter()
        .map(|r| {
            let title = if r.title.is_empty() { "Unknown Issue" } else { r.title.as_str() };
            format!("- Issue #{}: {} ({})\n", r.issue_number, title, r.sentinel_path.display())
        })
        .collect();

    format!(
        r#"
ISSUE APPROVAL PATTERN DETECTED - MULTIPLE PENDING ISSUES
==========================================================

The user's message appears to approve changes, but {count} issues are
awaiting approval in {dir}/:

{list}
RECOMMENDED ACTION:
-------------------
Ask the user which issue they are approving. Do NOT guess and do NOT invoke
the {closer} agent until the user names exactly one issue.
"#,
        count = pending.len(),
        dir = ctx.sentinel_dir,
        closer = ctx.closer_agent,
    )
}

fn project_lines(ctx: &DirectiveContext) -> String {
    let mut lines = String::new();
    if let Some(repo) = &ctx.repository {
        lines.push_str(&format!("Repository: {repo}\n"));
    }
    if let Some(dir) = &ctx.working_dir {
        lines.push_str(&format!("Working Directory: {dir}\n"));
    }
    lines
}
