//! `strato version` command implementation.

use strato_core::error::StratoResult;

use super::CommandContext;

/// Execute the `strato version` command
pub async fn execute(ctx: &CommandContext) -> StratoResult<()> {
    ctx.output
        .info(&format!("strato {}", env!("CARGO_PKG_VERSION")));
    Ok(())
}
