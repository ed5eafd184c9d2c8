//! Explicit command-handler registry.
//!
//! Subcommands the CLI does not implement itself are offered to a fixed list
//! of handlers sharing one contract: `handle` returns whether the handler
//! claimed the command. Handlers are resolved at startup; there is no
//! filesystem discovery of installed plugins.

use std::process::Command;

use strato_core::error::{StratoError, StratoResult};

use crate::commands::CommandContext;

/// Contract every registered handler implements
pub trait CommandHandler: Send + Sync {
    /// Handler name, for logs
    fn name(&self) -> &'static str;

    /// Try to handle the command; `Ok(false)` passes it to the next handler
    fn handle(&self, command: &str, args: &[String], ctx: &CommandContext) -> StratoResult<bool>;
}

/// Ordered list of handlers tried until one claims the command
pub struct HandlerRegistry {
    handlers: Vec<Box<dyn CommandHandler>>,
}

impl HandlerRegistry {
    /// Build the registry with the handlers shipped in this binary
    pub fn with_default_handlers() -> Self {
        Self {
            handlers: vec![Box::new(ToolchainHandler)],
        }
    }

    /// Build a registry from an explicit handler list
    pub fn new(handlers: Vec<Box<dyn CommandHandler>>) -> Self {
        Self { handlers }
    }

    /// Offer a command to each handler in order
    pub fn dispatch(
        &self,
        command: &str,
        args: &[String],
        ctx: &CommandContext,
    ) -> StratoResult<bool> {
        for handler in &self.handlers {
            tracing::debug!(handler = handler.name(), command, "offering command");
            if handler.handle(command, args, ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Forwards build-toolchain commands to the project-local toolchain CLI
pub struct ToolchainHandler;

/// Commands the project-local toolchain implements
const TOOLCHAIN_COMMANDS: &[&str] = &["serve", "build", "test", "e2e"];

impl CommandHandler for ToolchainHandler {
    fn name(&self) -> &'static str {
        "toolchain"
    }

    fn handle(&self, command: &str, args: &[String], ctx: &CommandContext) -> StratoResult<bool> {
        if !TOOLCHAIN_COMMANDS.contains(&command) {
            return Ok(false);
        }

        ctx.output
            .step("🔧", &format!("Forwarding '{}' to the project toolchain", command));

        let status = Command::new("npx")
            .arg("strato-toolchain")
            .arg(command)
            .args(args)
            .current_dir(&ctx.cwd)
            .status()
            .map_err(|e| StratoError::io(format!("Failed to run 'npx strato-toolchain {}'", command), e))?;

        if !status.success() {
            return Err(StratoError::CommandFailed {
                command: format!("npx strato-toolchain {}", command),
                status: status.code().unwrap_or(-1),
            });
        }

        Ok(true)
    }
}
