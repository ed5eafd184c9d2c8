//! `strato check` command implementation.
//!
//! Runs the fixed workspace validation rules and maps any violation to a
//! failing exit code.

use strato_config::{check_workspace, Manifest, ToolConfig};
use strato_core::error::{StratoError, StratoResult};

use super::CommandContext;

/// Execute the `strato check` command
pub async fn execute(ctx: &CommandContext) -> StratoResult<()> {
    let manifest = Manifest::load(&ctx.cwd.join("package.json")).await?;
    let config = ToolConfig::load_or_default(&ctx.cwd.join("strato.json")).await?;

    ctx.output.step("🔎", "Validating workspace configuration");

    let violations = check_workspace(&manifest, &config);
    if violations.is_empty() {
        ctx.output.success("Workspace configuration is valid");
        return Ok(());
    }

    for violation in &violations {
        ctx.output
            .error(&format!("[{}] {}", violation.rule, violation.message));
    }

    Err(StratoError::ConfigValidation {
        field: "workspace".to_string(),
        reason: format!("{} rule violation(s)", violations.len()),
    })
}
