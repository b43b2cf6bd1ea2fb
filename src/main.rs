//! Issuegate - issue workflow prompt hook.
//!
//! Without a subcommand, Issuegate acts as a UserPromptSubmit hook: it reads
//! one JSON request on stdin and writes at most one JSON response on stdout.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use issuegate::{extract_issue_number, Config, IntentClassifier, PromptHook};

/// Route issue workflow prompts to the right agent
#[derive(Parser)]
#[command(name = "issuegate")]
#[command(author, version, long_about = None)]
#[command(about = "Route issue workflow prompts to the right agent")]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the discovered one
    #[arg(long, global = true, env = "ISSUEGATE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one hook request from stdin (default)
    Hook,

    /// Show how a prompt is classified
    Classify {
        /// Prompt text
        text: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List sentinels awaiting approval
    Sentinel {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show the effective configuration
    Config {
        /// Print the config file path instead
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; stdout is reserved for the hook response
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        None | Some(Commands::Hook) => {
            cmd_hook(config_path);
        }
        Some(Commands::Classify { text, format }) => {
            cmd_classify(&text, &format)?;
        }
        Some(Commands::Sentinel { format }) => {
            cmd_sentinel(config_path, &format)?;
        }
        Some(Commands::Config { path }) => {
            cmd_config(config_path, path)?;
        }
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

/// Run the hook. Never fails: the host must not see a non-zero exit.
fn cmd_hook(config_path: Option<&std::path::Path>) {
    let config = Config::load(config_path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });

    let hook = PromptHook::new(&config);
    match hook.run(io::stdin().lock(), io::stdout().lock()) {
        Ok(responded) => tracing::debug!(responded, "Hook finished"),
        Err(e) => eprintln!("Hook error: {e}"),
    }
}

/// Classify a prompt and report the deciding rule.
fn cmd_classify(text: &str, format: &str) -> Result<()> {
    let classification = IntentClassifier::new().explain(text);
    let issue = extract_issue_number(text);

    match format {
        "json" => {
            let json = serde_json::json!({
                "intent": classification.intent,
                "rule_set": classification.rule_set,
                "rule": classification.rule,
                "issue_number": issue,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => {
            println!("Intent: {}", classification.intent);
            if let (Some(set), Some(rule)) = (classification.rule_set, classification.rule) {
                println!("Rule:   {set}/{rule}");
            }
            if let Some(issue) = issue {
                println!("Issue:  #{issue}");
            }
        }
    }

    Ok(())
}

/// List pending sentinels under the resolved root.
fn cmd_sentinel(config_path: Option<&std::path::Path>, format: &str) -> Result<()> {
    let config = Config::load(config_path)?;
    let cwd = std::env::current_dir().ok();
    let store = config.sentinel_store(cwd.as_deref());
    let records = store.scan();

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        _ => {
            let Some(root) = store.resolve_root() else {
                println!("No sentinel directory found. Searched:");
                for root in store.roots() {
                    println!("  {}", root.display());
                }
                return Ok(());
            };

            println!("Sentinel directory: {}", root.display());
            for record in &records {
                let title =
                    if record.title.is_empty() { "(untitled)" } else { record.title.as_str() };
                println!(
                    "  #{} {} [branch: {}, complexity: {}{}]",
                    record.issue_number,
                    title,
                    record.branch,
                    record.complexity,
                    if record.server_restart_required { ", restart" } else { "" }
                );
                if let Some(err) = &record.parse_error {
                    println!("    error: {err}");
                }
            }
            println!("\nTotal: {} awaiting approval", records.len());
        }
    }

    Ok(())
}

/// Show the effective configuration or its file path.
fn cmd_config(config_path: Option<&std::path::Path>, show_path: bool) -> Result<()> {
    if show_path {
        match Config::resolve_path(config_path) {
            Some(path) => println!("{}", path.display()),
            None => eprintln!("No config file found, using defaults"),
        }
        return Ok(());
    }

    let config = Config::load(config_path)?;
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "issuegate", &mut io::stdout());
}
