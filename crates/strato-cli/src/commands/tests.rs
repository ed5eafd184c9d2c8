//! Unit tests for CLI commands.

use super::*;
use camino::Utf8PathBuf;
use tempfile::TempDir;

/// Create a test command context rooted in a temporary directory
fn test_context(temp_dir: &TempDir) -> CommandContext {
    CommandContext {
        cwd: Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).unwrap(),
        output: crate::output::OutputHandler::new(),
    }
}

#[test]
fn test_edit_distance() {
    assert_eq!(edit_distance("", ""), 0);
    assert_eq!(edit_distance("", "abc"), 3);
    assert_eq!(edit_distance("abc", ""), 3);
    assert_eq!(edit_distance("abc", "abc"), 0);
    assert_eq!(edit_distance("upgrade", "upgrde"), 1);
    assert_eq!(edit_distance("eject", "ejct"), 1);
    assert_eq!(edit_distance("new", "nw"), 1);
}

#[test]
fn test_suggest_similar_command() {
    // Exact matches
    assert_eq!(suggest_similar_command("upgrade"), Some("upgrade".to_string()));

    // Typos
    assert_eq!(suggest_similar_command("upgrde"), Some("upgrade".to_string()));
    assert_eq!(suggest_similar_command("ejct"), Some("eject".to_string()));
    assert_eq!(suggest_similar_command("nw"), Some("new".to_string()));
    assert_eq!(suggest_similar_command("chek"), Some("check".to_string()));

    // No suggestion for very different strings
    assert_eq!(suggest_similar_command("xyz"), None);
    assert_eq!(suggest_similar_command("completely-different"), None);
}

#[tokio::test]
async fn test_new_command_creates_spa_project() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = test_context(&temp_dir);

    new::execute("demo-app".to_string(), None, &ctx)
        .await
        .unwrap();

    let project = ctx.cwd.join("demo-app");
    assert!(project.join("package.json").is_file());
    assert!(project.join("strato.json").is_file());
    assert!(project.join("src/app/index.html").is_file());

    let manifest = strato_config::Manifest::load(&project.join("package.json"))
        .await
        .unwrap();
    assert_eq!(manifest.name, "demo-app");
    assert!(manifest.dependencies.contains_key("@strato/core"));
    assert!(manifest.dev_dependencies.contains_key("strato-lint"));
}

#[tokio::test]
async fn test_new_command_library_template() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = test_context(&temp_dir);

    new::execute("demo-lib".to_string(), Some("library".to_string()), &ctx)
        .await
        .unwrap();

    let manifest =
        strato_config::Manifest::load(&ctx.cwd.join("demo-lib").join("package.json"))
            .await
            .unwrap();
    assert!(manifest.peer_dependencies.contains_key("@strato/core"));
    assert!(manifest.dependencies.is_empty());
}

#[tokio::test]
async fn test_new_command_rejects_invalid_names() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = test_context(&temp_dir);

    assert!(new::execute("Bad Name".to_string(), None, &ctx).await.is_err());
    assert!(new::execute("demo".to_string(), Some("desktop".to_string()), &ctx)
        .await
        .is_err());
}

#[tokio::test]
async fn test_new_command_rejects_existing_directory() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = test_context(&temp_dir);

    new::execute("demo-app".to_string(), None, &ctx)
        .await
        .unwrap();
    let result = new::execute("demo-app".to_string(), None, &ctx).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_check_command_on_scaffolded_project() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = test_context(&temp_dir);

    new::execute("demo-app".to_string(), None, &ctx)
        .await
        .unwrap();

    let project_ctx = CommandContext {
        cwd: ctx.cwd.join("demo-app"),
        output: crate::output::OutputHandler::new(),
    };
    check::execute(&project_ctx).await.unwrap();
}

#[tokio::test]
async fn test_check_command_reports_violations() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = test_context(&temp_dir);

    let manifest_json = r#"{
  "name": "demo-app",
  "version": "not-a-version",
  "dependencies": {}
}"#;
    tokio::fs::write(ctx.cwd.join("package.json").as_std_path(), manifest_json)
        .await
        .unwrap();

    let result = check::execute(&ctx).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_eject_command_generates_routing_artifacts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = test_context(&temp_dir);

    // Scaffold, then add pages, a guard, and a redirect
    new::execute("demo-app".to_string(), None, &ctx)
        .await
        .unwrap();
    let project = ctx.cwd.join("demo-app");
    let app = project.join("src/app");

    for dir in ["about", "about/#contact", "users/_userId"] {
        let page_dir = app.join(dir);
        tokio::fs::create_dir_all(page_dir.as_std_path()).await.unwrap();
        tokio::fs::write(page_dir.join("index.html").as_std_path(), "<p>page</p>")
            .await
            .unwrap();
    }
    tokio::fs::write(
        app.join("about/index.guard.ts").as_std_path(),
        "export class AboutGuard { canActivate() { return true; } }",
    )
    .await
    .unwrap();
    tokio::fs::write(
        project.join("strato.json").as_std_path(),
        r#"{ "projectType": "spa", "redirects": { "": "about" } }"#,
    )
    .await
    .unwrap();

    let project_ctx = CommandContext {
        cwd: project.clone(),
        output: crate::output::OutputHandler::new(),
    };
    eject::execute(None, &project_ctx).await.unwrap();

    let ejected = project.join("ejected");
    assert!(ejected.join("src/app/index.html").is_file());
    assert!(ejected.join("src/app/about/index.component.ts").is_file());
    assert!(ejected
        .join("src/app/about/#contact/index.component.ts")
        .is_file());
    assert!(ejected.join("src/app/not-found.component.ts").is_file());

    let routes = tokio::fs::read_to_string(ejected.join("src/app/app-routes.ts").as_std_path())
        .await
        .unwrap();
    let redirect = routes.find("redirectTo: 'about'").unwrap();
    let root = routes.find("component: RootIndexComponent").unwrap();
    let catch_all = routes.find("path: '**'").unwrap();
    assert!(redirect < root && root < catch_all);
    assert!(routes.contains("canActivate: [AboutGuard]"));
    assert!(routes.contains("path: 'contact'"));

    let manifest = strato_config::Manifest::load(&ejected.join("package.json"))
        .await
        .unwrap();
    assert!(manifest
        .dev_dependencies
        .contains_key("@strato-sdk/toolchain"));
}

#[tokio::test]
async fn test_eject_command_refuses_to_overwrite() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ctx = test_context(&temp_dir);

    new::execute("demo-app".to_string(), None, &ctx)
        .await
        .unwrap();
    let project = ctx.cwd.join("demo-app");
    tokio::fs::create_dir(project.join("ejected").as_std_path())
        .await
        .unwrap();

    let project_ctx = CommandContext {
        cwd: project,
        output: crate::output::OutputHandler::new(),
    };
    assert!(eject::execute(None, &project_ctx).await.is_err());
}

mod registry {
    use super::*;
    use crate::plugins::{CommandHandler, HandlerRegistry};
    use strato_core::error::StratoResult;

    struct PingHandler;

    impl CommandHandler for PingHandler {
        fn name(&self) -> &'static str {
            "ping"
        }

        fn handle(
            &self,
            command: &str,
            _args: &[String],
            _ctx: &CommandContext,
        ) -> StratoResult<bool> {
            Ok(command == "ping")
        }
    }

    #[test]
    fn test_registry_claims_and_declines() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ctx = test_context(&temp_dir);
        let registry = HandlerRegistry::new(vec![Box::new(PingHandler)]);

        assert!(registry.dispatch("ping", &[], &ctx).unwrap());
        assert!(!registry.dispatch("pong", &[], &ctx).unwrap());
    }
}
