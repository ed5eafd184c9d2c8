//! `strato eject` command implementation.
//!
//! Migrates a legacy-build project into the CLI build layout: the source
//! tree is copied into an `ejected/` directory, the route table is rebuilt
//! from the page files, and the routing module plus one view component per
//! page are generated into the new tree.

use camino::{Utf8Path, Utf8PathBuf};
use strato_config::{Manifest, ToolConfig};
use strato_core::error::{StratoError, StratoResult};
use strato_core::utils::is_safe_path;
use strato_routes::{
    build_route_table, render_component, render_routing_module, GuardSource, RouteTable,
    SOURCE_ROOT,
};
use tokio::fs;
use walkdir::WalkDir;

use super::CommandContext;

/// Directory the regenerated project is written into
const EJECT_DIR: &str = "ejected";

/// Execute the `strato eject` command
pub async fn execute(path: Option<String>, ctx: &CommandContext) -> StratoResult<()> {
    let project_dir = match path {
        Some(p) => ctx.cwd.join(p),
        None => ctx.cwd.clone(),
    };

    let manifest_path = project_dir.join("package.json");
    let mut manifest = Manifest::load(&manifest_path).await?;
    let config = ToolConfig::load_or_default(&project_dir.join("strato.json")).await?;

    let app_dir = project_dir.join(SOURCE_ROOT);
    if !app_dir.is_dir() {
        return Err(StratoError::ConfigValidation {
            field: "src/app".to_string(),
            reason: format!("'{}' is not a directory; nothing to eject", app_dir),
        });
    }

    let target_dir = project_dir.join(EJECT_DIR);
    if target_dir.exists() {
        return Err(StratoError::ConfigValidation {
            field: EJECT_DIR.to_string(),
            reason: format!("'{}' already exists; remove it and rerun", target_dir),
        });
    }

    ctx.output.step("🔍", "Scanning source tree");
    let (pages, guards) = scan_sources(&project_dir)?;
    ctx.output.info(&format!(
        "{} pages, {} guards, {} redirects",
        pages.len(),
        guards.len(),
        config.redirects.len()
    ));

    ctx.output.step("🧭", "Building route table");
    let table = build_route_table(&pages, &guards, &config.redirects)?;

    ctx.output.step("📦", "Copying project sources");
    copy_sources(&project_dir, &target_dir).await?;

    ctx.output.step("✏️", "Writing generated routing artifacts");
    write_generated(&target_dir, &table).await?;

    manifest
        .dev_dependencies
        .insert("@strato-sdk/toolchain".to_string(), "^4.0.0".to_string());
    manifest.dev_dependencies.sort_keys();
    manifest
        .scripts
        .insert("serve".to_string(), "strato serve".to_string());
    manifest
        .scripts
        .insert("build".to_string(), "strato build".to_string());
    manifest.save(&target_dir.join("package.json")).await?;

    ctx.output
        .success(&format!("Project ejected into {}", target_dir));
    Ok(())
}

/// Collect page and guard files under src/app, in sorted walk order.
///
/// Returned paths are project-relative so route derivation sees the
/// conventional `src/app/...` prefix.
fn scan_sources(project_dir: &Utf8Path) -> StratoResult<(Vec<Utf8PathBuf>, Vec<GuardSource>)> {
    let mut pages = Vec::new();
    let mut guards = Vec::new();

    let app_dir = project_dir.join(SOURCE_ROOT);
    for entry in WalkDir::new(&app_dir).sort_by_file_name() {
        let entry = entry.map_err(|e| StratoError::ConfigValidation {
            field: SOURCE_ROOT.to_string(),
            reason: format!("failed to walk source tree: {}", e),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(path) = Utf8Path::from_path(entry.path()) else {
            continue;
        };
        let relative = path.strip_prefix(project_dir).unwrap_or(path).to_owned();

        match path.file_name() {
            Some("index.html") => pages.push(relative),
            Some("index.guard.ts") => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|e| StratoError::io(format!("Failed to read {}", path), e))?;
                guards.push(GuardSource {
                    path: relative,
                    contents,
                });
            },
            _ => {},
        }
    }

    Ok((pages, guards))
}

/// Copy the project's src/ tree into the eject target
async fn copy_sources(project_dir: &Utf8Path, target_dir: &Utf8Path) -> StratoResult<()> {
    let source_root = project_dir.join("src");

    for entry in WalkDir::new(&source_root).sort_by_file_name() {
        let entry = entry.map_err(|e| StratoError::ConfigValidation {
            field: "src".to_string(),
            reason: format!("failed to walk source tree: {}", e),
        })?;
        let Some(path) = Utf8Path::from_path(entry.path()) else {
            continue;
        };
        let relative = path.strip_prefix(project_dir).unwrap_or(path);
        if !is_safe_path(relative.as_std_path()) {
            continue;
        }

        let destination = target_dir.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)
                .await
                .map_err(|e| StratoError::io(format!("Failed to create {}", destination), e))?;
        } else if entry.file_type().is_file() {
            fs::copy(path, &destination)
                .await
                .map_err(|e| StratoError::io(format!("Failed to copy {}", path), e))?;
        }
    }

    Ok(())
}

/// Write the routing module and one component per page into the eject target
async fn write_generated(target_dir: &Utf8Path, table: &RouteTable) -> StratoResult<()> {
    for component in &table.components {
        let component_path = target_dir
            .join(&component.source_dir)
            .join("index.component.ts");
        write_file(&component_path, &render_component(component)).await?;
    }

    let not_found = target_dir.join(SOURCE_ROOT).join("not-found.component.ts");
    if !not_found.exists() {
        let source = "import { Component } from '@strato/core';\n\n@Component({\n  template: '<h1>Not found</h1>'\n})\nexport class NotFoundComponent {\n}\n";
        write_file(&not_found, source).await?;
    }

    let routes_path = target_dir.join(SOURCE_ROOT).join("app-routes.ts");
    write_file(&routes_path, &render_routing_module(table)).await
}

async fn write_file(path: &Utf8Path, contents: &str) -> StratoResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StratoError::io(format!("Failed to create {}", parent), e))?;
    }
    fs::write(path, contents)
        .await
        .map_err(|e| StratoError::io(format!("Failed to write {}", path), e))
}
