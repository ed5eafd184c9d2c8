//! `strato upgrade` command implementation.
//!
//! Resolves every dependency section against the registry, expands the
//! framework peer closure, and writes package.json back with both sections
//! in ascending key order.

use std::sync::Arc;

use strato_config::Manifest;
use strato_core::error::StratoResult;
use strato_registry::RegistryClient;
use strato_resolver::Upgrader;

use super::CommandContext;

/// Execute the `strato upgrade` command
pub async fn execute(dry_run: bool, ctx: &CommandContext) -> StratoResult<()> {
    let manifest_path = ctx.cwd.join("package.json");
    let mut manifest = Manifest::load(&manifest_path).await?;

    ctx.output.step("⬆️", "Resolving dependency upgrades");

    let client = Arc::new(RegistryClient::new()?);
    let upgrader = Upgrader::new(client);

    let summary = upgrader.upgrade_manifest(&mut manifest).await?;

    ctx.output.step("🧩", "Expanding framework peer dependencies");
    let peers = upgrader.add_peer_dependencies(&mut manifest).await?;

    for added in &peers.added {
        ctx.output.info(&format!("added peer dependency {}", added));
    }
    for ignored in &peers.ignored {
        ctx.output
            .warn(&format!("peer left for you to install: {}", ignored));
    }

    let updated = summary.dependencies.updated + summary.dev_dependencies.updated;
    let skipped = summary.dependencies.skipped + summary.dev_dependencies.skipped;
    let invalid = summary.dependencies.invalid + summary.dev_dependencies.invalid;

    ctx.output.info(&format!(
        "{} updated, {} already current, {} unresolvable, {} peers added",
        updated,
        skipped,
        invalid,
        peers.added.len()
    ));

    if dry_run {
        ctx.output.warn("Dry run: package.json was not written");
        return Ok(());
    }

    manifest.save(&manifest_path).await?;
    ctx.output.success("package.json updated");

    Ok(())
}
