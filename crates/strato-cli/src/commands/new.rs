//! `strato new` command implementation.
//!
//! Creates a new Strato project with the specified name and optional
//! template.

use camino::Utf8Path;
use strato_config::{Manifest, ToolConfig};
use strato_core::error::{StratoError, StratoResult};
use tokio::fs;

use super::CommandContext;

/// Execute the `strato new` command
pub async fn execute(
    name: String,
    template: Option<String>,
    ctx: &CommandContext,
) -> StratoResult<()> {
    let template = template.as_deref().unwrap_or("spa");
    if template != "spa" && template != "library" {
        return Err(StratoError::ConfigValidation {
            field: "template".to_string(),
            reason: format!("unknown template '{}'; expected 'spa' or 'library'", template),
        });
    }

    if !Manifest::is_valid_name(&name) {
        return Err(StratoError::ConfigValidation {
            field: "project_name".to_string(),
            reason: format!("'{}' is not a valid package name", name),
        });
    }

    let project_path = ctx.cwd.join(&name);
    if project_path.exists() {
        return Err(StratoError::ConfigValidation {
            field: "project_name".to_string(),
            reason: format!("Directory '{}' already exists", name),
        });
    }

    ctx.output
        .step("📁", &format!("Creating {} project: {}", template, name));
    create_project_structure(&project_path, &name, template).await?;

    ctx.output.success(&format!("Created new project: {}", name));
    ctx.output.info("");
    ctx.output.info("Next steps:");
    ctx.output.info(&format!("  cd {}", name));
    ctx.output.info("  npm install");
    ctx.output.info("  strato serve");

    Ok(())
}

async fn create_project_structure(
    project_path: &Utf8Path,
    name: &str,
    template: &str,
) -> StratoResult<()> {
    let app_dir = project_path.join("src/app");
    fs::create_dir_all(&app_dir)
        .await
        .map_err(|e| StratoError::io(format!("Failed to create {}", app_dir), e))?;

    let mut manifest = Manifest::new(name);
    let config = match template {
        "spa" => {
            manifest
                .dependencies
                .insert("@strato/core".to_string(), "^4.0.0".to_string());
            manifest
                .dependencies
                .insert("@strato/router".to_string(), "^4.2.0".to_string());
            manifest
                .dev_dependencies
                .insert("strato-lint".to_string(), "^2.4.0".to_string());
            manifest
                .scripts
                .insert("serve".to_string(), "strato serve".to_string());
            manifest
                .scripts
                .insert("build".to_string(), "strato build".to_string());

            ToolConfig {
                project_type: Some("spa".to_string()),
                ..Default::default()
            }
        },
        _ => {
            manifest.private = false;
            manifest
                .peer_dependencies
                .insert("@strato/core".to_string(), "^4.0.0".to_string());
            manifest
                .dev_dependencies
                .insert("strato-lint".to_string(), "^2.4.0".to_string());

            ToolConfig {
                project_type: Some("library".to_string()),
                ..Default::default()
            }
        },
    };

    manifest.save(&project_path.join("package.json")).await?;

    let config_path = project_path.join("strato.json");
    let mut config_json = serde_json::to_string_pretty(&config).map_err(|e| {
        StratoError::JsonParse {
            file: config_path.to_string(),
            message: e.to_string(),
        }
    })?;
    config_json.push('\n');
    fs::write(&config_path, config_json)
        .await
        .map_err(|e| StratoError::io(format!("Failed to write {}", config_path), e))?;

    let index_path = app_dir.join("index.html");
    fs::write(&index_path, format!("<h1>Welcome to {}</h1>\n", name))
        .await
        .map_err(|e| StratoError::io(format!("Failed to write {}", index_path), e))?;

    Ok(())
}
