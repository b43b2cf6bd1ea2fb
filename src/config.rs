//! Configuration management for Issuegate.
//!
//! Handles loading configuration from TOML files and turning it into the
//! sentinel search path and directive context.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::directive::DirectiveContext;
use crate::sentinel::{SentinelStore, DEFAULT_BRANCH};

/// Name of the per-project config file.
pub const LOCAL_CONFIG_FILE: &str = ".issuegate.toml";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project settings
    pub project: ProjectConfig,

    /// Sentinel lookup settings
    pub sentinel: SentinelConfig,

    /// Downstream agent names
    pub agents: AgentsConfig,

    /// Workflow settings
    pub workflow: WorkflowConfig,
}

/// Project the hook is installed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Repository slug (owner/name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Project directory; `~` and environment variables are expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    /// Branch pull requests must target
    pub target_branch: String,
}

/// Sentinel lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    /// Subdirectory holding sentinel files
    pub dir_name: String,

    /// Extra sentinel directories, searched before the derived ones
    pub roots: Vec<String>,

    /// What to do when more than one sentinel is pending
    pub on_multiple: MultipleSentinels,
}

/// Policy for several simultaneous awaiting-approval sentinels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultipleSentinels {
    /// Act on the lowest issue number
    #[default]
    First,
    /// Ask the user which issue they mean
    Clarify,
}

/// Names of the downstream agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Agent that files new issues
    pub creator: String,

    /// Agent that analyses and implements issues
    pub worker: String,

    /// Agent that reviews, merges and closes issues
    pub closer: String,

    /// Model every subagent call must use
    pub model: String,
}

/// Workflow settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Commands the implementation phase must run before asking for approval
    pub verify_commands: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self { repository: None, working_dir: None, target_branch: DEFAULT_BRANCH.to_string() }
    }
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            dir_name: "claudedocs".to_string(),
            roots: Vec::new(),
            on_multiple: MultipleSentinels::First,
        }
    }
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            creator: "issue-creator".to_string(),
            worker: "issue-worker".to_string(),
            closer: "issue-closer".to_string(),
            model: "opus".to_string(),
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// Looks for config in:
    /// 1. `explicit` (from `--config` or `ISSUEGATE_CONFIG`)
    /// 2. `.issuegate.toml` in current directory
    /// 3. `~/.config/issuegate/config.toml`
    /// 4. Falls back to defaults
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::discover() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// The file [`load`](Self::load) would read, if any.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        explicit.map(Path::to_path_buf).or_else(Self::discover)
    }

    fn discover() -> Option<PathBuf> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }

        Self::global_path().filter(|p| p.exists())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Get the global config file path.
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("issuegate").join("config.toml"))
    }

    /// Project directory with `~` and variables expanded.
    pub fn working_dir(&self) -> Option<PathBuf> {
        self.project.working_dir.as_deref().map(expand_path)
    }

    /// Ordered sentinel directories to try.
    ///
    /// Configured roots come first, then `<working_dir>/<dir_name>`, then
    /// the host-reported cwd, then the process cwd. Duplicates are dropped.
    pub fn candidate_roots(&self, host_cwd: Option<&Path>) -> Vec<PathBuf> {
        let dir_name = &self.sentinel.dir_name;
        let mut roots: Vec<PathBuf> = self.sentinel.roots.iter().map(|r| expand_path(r)).collect();

        roots.extend(self.working_dir().map(|d| d.join(dir_name)));
        roots.extend(host_cwd.map(|d| d.join(dir_name)));
        roots.extend(std::env::current_dir().ok().map(|d| d.join(dir_name)));

        let mut unique = Vec::with_capacity(roots.len());
        for root in roots {
            if !unique.contains(&root) {
                unique.push(root);
            }
        }
        unique
    }

    /// Sentinel store over [`candidate_roots`](Self::candidate_roots).
    pub fn sentinel_store(&self, host_cwd: Option<&Path>) -> SentinelStore {
        SentinelStore::new(self.candidate_roots(host_cwd))
    }

    /// Project details embedded in directives.
    pub fn directive_context(&self) -> DirectiveContext {
        DirectiveContext {
            repository: self.project.repository.clone(),
            working_dir: self.working_dir().map(|d| d.display().to_string()),
            target_branch: self.project.target_branch.clone(),
            sentinel_dir: self.sentinel.dir_name.clone(),
            creator_agent: self.agents.creator.clone(),
            worker_agent: self.agents.worker.clone(),
            closer_agent: self.agents.closer.clone(),
            model: self.agents.model.clone(),
            verify_commands: self.workflow.verify_commands.clone(),
        }
    }
}

/// Expand `~` and `$VARS`; unknown variables leave the path untouched.
fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(e) => {
            tracing::warn!(path = raw, error = %e, "Could not expand path");
            PathBuf::from(shellexpand::tilde(raw).into_owned())
        }
    }
}
