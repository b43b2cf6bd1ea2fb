//! Awaiting-approval sentinel files.
//!
//! An earlier workflow phase drops `issue-<N>-awaiting-approval.md` into the
//! sentinel directory when implementation is done and a human must sign off.
//! This module only ever reads those files.

mod parser;

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub use parser::parse_sentinel_content;

static SENTINEL_FILE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^issue-(\d+)-awaiting-approval\.md$")
        .unwrap_or_else(|e| panic!("invalid sentinel file name pattern: {e}"))
});

/// Default branch recorded when the sentinel names none.
pub const DEFAULT_BRANCH: &str = "main";

/// Default complexity recorded when the sentinel names none.
pub const DEFAULT_COMPLEXITY: &str = "low";

/// Errors reading a sentinel file.
#[derive(Debug, thiserror::Error)]
pub enum SentinelError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to list {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Snapshot of a workflow paused at the approval checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentinelRecord {
    /// Issue number taken from the file name
    pub issue_number: String,

    /// Issue title
    pub title: String,

    /// Branch holding the implementation
    pub branch: String,

    /// Complexity rating (low, medium, high)
    pub complexity: String,

    /// Files touched by the implementation
    pub files_modified: Vec<String>,

    /// Free-text implementation summary
    pub implementation_summary: String,

    /// Whether deploying will restart the server
    pub server_restart_required: bool,

    /// Where the sentinel lives
    pub sentinel_path: PathBuf,

    /// Set when the file could not be read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl SentinelRecord {
    /// Create a record with every optional field at its default.
    pub fn new(issue_number: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            issue_number: issue_number.into(),
            title: String::new(),
            branch: DEFAULT_BRANCH.to_string(),
            complexity: DEFAULT_COMPLEXITY.to_string(),
            files_modified: Vec::new(),
            implementation_summary: String::new(),
            server_restart_required: false,
            sentinel_path: path.into(),
            parse_error: None,
        }
    }

    /// Minimal record for a sentinel that exists but could not be read.
    pub fn degraded(
        issue_number: impl Into<String>,
        path: impl Into<PathBuf>,
        error: impl ToString,
    ) -> Self {
        Self { parse_error: Some(error.to_string()), ..Self::new(issue_number, path) }
    }

    /// Load and parse a sentinel file.
    pub fn load(path: &Path, issue_number: &str) -> Result<Self, SentinelError> {
        let content = fs::read_to_string(path)
            .map_err(|source| SentinelError::Read { path: path.to_path_buf(), source })?;
        Ok(parse_sentinel_content(&content, issue_number, path))
    }

    /// Load a sentinel, falling back to a degraded record on failure.
    pub fn load_or_degrade(path: &Path, issue_number: &str) -> Self {
        Self::load(path, issue_number).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Unreadable sentinel file");
            Self::degraded(issue_number, path, e)
        })
    }
}

/// Extract the issue number from a sentinel file name.
pub fn sentinel_issue_number(file_name: &str) -> Option<&str> {
    SENTINEL_FILE_NAME.captures(file_name).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Read-only view over the sentinel directory.
///
/// Candidate roots are tried in order and the first existing directory is
/// scanned (non-recursively).
#[derive(Debug, Clone, Default)]
pub struct SentinelStore {
    roots: Vec<PathBuf>,
}

impl SentinelStore {
    /// Create a store over an ordered list of candidate directories.
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Candidate directories in priority order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// The first candidate that exists as a directory.
    pub fn resolve_root(&self) -> Option<&Path> {
        self.roots.iter().map(PathBuf::as_path).find(|p| p.is_dir())
    }

    /// Find the sentinel to act on.
    ///
    /// Matches are ordered by issue number, then file name, and the first
    /// one is returned. Multiple pending sentinels are logged.
    pub fn find_awaiting_approval(&self) -> Option<SentinelRecord> {
        let pending = self.pending_files();
        if pending.len() > 1 {
            let issues: Vec<&str> = pending.iter().map(|(n, _)| n.as_str()).collect();
            tracing::warn!(?issues, "Multiple awaiting-approval sentinels, using the first");
        }

        let (number, path) = pending.into_iter().next()?;
        Some(SentinelRecord::load_or_degrade(&path, &number))
    }

    /// Every pending sentinel, in the same order used by
    /// [`find_awaiting_approval`](Self::find_awaiting_approval).
    pub fn scan(&self) -> Vec<SentinelRecord> {
        self.pending_files()
            .into_iter()
            .map(|(number, path)| SentinelRecord::load_or_degrade(&path, &number))
            .collect()
    }

    /// Sorted `(issue_number, path)` pairs under the resolved root.
    fn pending_files(&self) -> Vec<(String, PathBuf)> {
        let Some(root) = self.resolve_root() else {
            tracing::debug!(roots = ?self.roots, "No sentinel directory found");
            return Vec::new();
        };

        match list_sentinels(root) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(error = %e, "Could not scan sentinel directory");
                Vec::new()
            }
        }
    }
}

fn list_sentinels(dir: &Path) -> Result<Vec<(String, PathBuf)>, SentinelError> {
    let entries = fs::read_dir(dir)
        .map_err(|source| SentinelError::ListDir { path: dir.to_path_buf(), source })?;

    let mut found: Vec<(String, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let name = entry.file_name();
            let number = sentinel_issue_number(name.to_str()?)?.to_string();
            Some((number, entry.path()))
        })
        .collect();

    found.sort_by(|(a_num, a_path), (b_num, b_path)| {
        issue_order(a_num).cmp(&issue_order(b_num)).then_with(|| a_path.cmp(b_path))
    });

    tracing::debug!(dir = %dir.display(), count = found.len(), "Scanned sentinel directory");
    Ok(found)
}

// Numbers too large for u64 sort last.
fn issue_order(number: &str) -> u64 {
    number.parse().unwrap_or(u64::MAX)
}
