//! # Issuegate
//!
//! Prompt hook that routes issue-tracker workflow requests to the right agent.
//!
//! Issuegate sits between a user and a coding assistant. It reads each
//! submitted prompt, decides whether the user wants to open an issue, work
//! on one, or approve finished work, and answers with an instruction block
//! telling the assistant which agent to invoke and which gates to respect.
//!
//! ## Features
//!
//! - **Rule tables**: Labelled include/exclude patterns per intent
//! - **Approval checkpoint**: Reads awaiting-approval sentinel files left by
//!   the implementation phase
//! - **Project config**: Repository, agent names and verification commands
//!   from `.issuegate.toml`
//!
//! ## Quick Start
//!
//! ```bash
//! # Hook mode (reads the host's JSON request on stdin)
//! echo '{"prompt": "ship it"}' | issuegate
//!
//! # See how a prompt is classified
//! issuegate classify "let's work on issue #42"
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::format_push_string)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod config;
pub mod directive;
pub mod hook;
pub mod intent;
pub mod sentinel;

// Re-export commonly used types
pub use config::{Config, MultipleSentinels};
pub use directive::{Composer, DirectiveContext};
pub use hook::{HookError, HookInput, HookOutput, PromptHook};
pub use intent::{extract_issue_number, Classification, Intent, IntentClassifier};
pub use sentinel::{SentinelError, SentinelRecord, SentinelStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "issuegate";
