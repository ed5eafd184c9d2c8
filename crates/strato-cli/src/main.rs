//! # strato-cli
//!
//! Project lifecycle CLI for the Strato front-end toolchain.
//!
//! This is the main entry point for the `strato` tool. It handles command
//! parsing, sets up logging and error handling, and dispatches to the
//! appropriate command handlers. Subcommands the tool does not implement
//! itself are offered to the handler registry in `plugins`.

use clap::{Parser, Subcommand};
use strato_core::error::StratoResult;
use tracing::info;

mod commands;
mod output;
mod plugins;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Project lifecycle CLI for the Strato front-end toolchain
#[derive(Parser)]
#[command(name = "strato", version, about = "Scaffold, upgrade, and migrate Strato projects")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project
    New {
        name: String,
        /// Project template: "spa" (default) or "library"
        #[arg(long)]
        template: Option<String>,
    },
    /// Upgrade dependencies to compatible versions
    Upgrade {
        /// Resolve and report without writing package.json
        #[arg(long)]
        dry_run: bool,
    },
    /// Migrate a legacy-build project to the CLI build layout
    Eject {
        /// Project directory (defaults to the current directory)
        #[arg(long)]
        path: Option<String>,
    },
    /// Manage the local TLS development certificate
    Certs {
        #[command(subcommand)]
        action: commands::certs::CertsAction,
    },
    /// Validate workspace configuration
    Check,
    /// Show version information
    Version,
    /// Any other subcommand is offered to the handler registry
    #[command(external_subcommand)]
    External(Vec<String>),
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    info!("Starting strato v{}", env!("CARGO_PKG_VERSION"));

    if let Err(error) = run_cli(cli) {
        eprintln!("{}", ErrorFormatter::new().format_error(&error));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> StratoResult<()> {
    let rt = tokio::runtime::Runtime::new().map_err(|e| {
        strato_core::error::StratoError::io("Failed to create async runtime".to_string(), e)
    })?;

    rt.block_on(async {
        let ctx = CommandContext::new()?;
        commands::dispatch_command(cli.command, &ctx).await
    })
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose { "strato=debug" } else { "strato=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
