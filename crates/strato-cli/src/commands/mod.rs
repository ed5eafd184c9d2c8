//! Command implementations and dispatch logic.
//!
//! This module contains all command handlers and the central dispatch
//! system. Each command is implemented as an async function that takes a
//! CommandContext. Unknown subcommands are offered to the handler registry
//! before the user gets a typo suggestion.

use camino::Utf8PathBuf;
use strato_core::error::{StratoError, StratoResult};
use tracing::info;

pub mod certs;
pub mod check;
pub mod eject;
pub mod new;
pub mod upgrade;
pub mod version;

#[cfg(test)]
mod tests;

use crate::output::OutputHandler;
use crate::plugins::HandlerRegistry;
use crate::Commands;

/// Names of the built-in subcommands, used for typo suggestions
const KNOWN_COMMANDS: &[&str] = &["new", "upgrade", "eject", "certs", "check", "version"];

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Create a new command context
    pub fn new() -> StratoResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| {
            StratoError::io("Failed to get current directory".to_string(), e)
        })?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|path| {
            StratoError::ConfigValidation {
                field: "cwd".to_string(),
                reason: format!("current directory is not UTF-8: {}", path.display()),
            }
        })?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
        })
    }
}

/// Dispatch a command to its handler
pub async fn dispatch_command(command: Commands, ctx: &CommandContext) -> StratoResult<()> {
    match command {
        Commands::New { name, template } => {
            info!("Creating new project: {}", name);
            new::execute(name, template, ctx).await
        },
        Commands::Upgrade { dry_run } => {
            info!("Upgrading dependencies (dry run: {})", dry_run);
            upgrade::execute(dry_run, ctx).await
        },
        Commands::Eject { path } => {
            info!("Ejecting project (path: {:?})", path);
            eject::execute(path, ctx).await
        },
        Commands::Certs { action } => {
            info!("Managing development certificate");
            certs::execute(action, ctx).await
        },
        Commands::Check => {
            info!("Validating workspace configuration");
            check::execute(ctx).await
        },
        Commands::Version => version::execute(ctx).await,
        Commands::External(args) => dispatch_external(&args, ctx).await,
    }
}

/// Offer an unknown subcommand to the handler registry
async fn dispatch_external(args: &[String], ctx: &CommandContext) -> StratoResult<()> {
    let (command, rest) = match args.split_first() {
        Some(split) => split,
        None => return Ok(()),
    };

    let registry = HandlerRegistry::with_default_handlers();
    if registry.dispatch(command, rest, ctx)? {
        return Ok(());
    }

    let mut reason = format!("unknown command '{}'", command);
    if let Some(suggestion) = suggest_similar_command(command) {
        reason.push_str(&format!("; did you mean '{}'?", suggestion));
    }
    Err(StratoError::ConfigValidation {
        field: "command".to_string(),
        reason,
    })
}

/// Suggest the closest built-in command for a typo
fn suggest_similar_command(input: &str) -> Option<String> {
    KNOWN_COMMANDS
        .iter()
        .map(|candidate| (candidate, edit_distance(input, candidate)))
        .filter(|(candidate, distance)| *distance <= candidate.len() / 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.to_string())
}

/// Levenshtein distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut previous = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous + usize::from(ca != cb);
            previous = row[j + 1];
            row[j + 1] = substitution.min(previous + 1).min(row[j] + 1);
        }
    }

    row[b.len()]
}
