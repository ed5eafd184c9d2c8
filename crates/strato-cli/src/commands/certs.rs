//! `strato certs` command implementation.
//!
//! Orchestrates the local TLS development certificate: generation through
//! the system openssl binary, OS trust-store registration, and validity
//! checks. Key material never passes through this process.

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::process::Command;
use strato_config::ToolConfig;
use strato_core::error::{StratoError, StratoResult};
use tokio::fs;

use super::CommandContext;

/// Certificate validity window in days
const VALID_DAYS: i64 = 365;

const CERT_NAME: &str = "strato-dev.crt";
const KEY_NAME: &str = "strato-dev.key";
const META_NAME: &str = "strato-dev.json";

#[derive(Subcommand)]
pub enum CertsAction {
    /// Generate the certificate and register it with the OS trust store
    Install,
    /// Remove the certificate from disk and the OS trust store
    Uninstall,
    /// Check that the certificate exists and has not expired
    Validate,
}

/// Certificate bookkeeping written next to the generated files
#[derive(Debug, Serialize, Deserialize)]
struct CertMetadata {
    host: String,
    generated_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Execute the `strato certs` command
pub async fn execute(action: CertsAction, ctx: &CommandContext) -> StratoResult<()> {
    let cert_dir = cert_directory()?;

    match action {
        CertsAction::Install => install(&cert_dir, ctx).await,
        CertsAction::Uninstall => uninstall(&cert_dir, ctx).await,
        CertsAction::Validate => validate(&cert_dir, ctx).await,
    }
}

/// Per-user directory holding the development certificate
fn cert_directory() -> StratoResult<Utf8PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| StratoError::Certificate {
        reason: "could not locate the home directory".to_string(),
    })?;
    let home = Utf8PathBuf::from_path_buf(home).map_err(|path| StratoError::Certificate {
        reason: format!("home directory is not UTF-8: {}", path.display()),
    })?;
    Ok(home.join(".strato").join("certs"))
}

async fn install(cert_dir: &Utf8Path, ctx: &CommandContext) -> StratoResult<()> {
    let config = ToolConfig::load_or_default(&ctx.cwd.join("strato.json")).await?;
    let host = config.dev_host.unwrap_or_else(|| "localhost".to_string());

    fs::create_dir_all(cert_dir)
        .await
        .map_err(|e| StratoError::io(format!("Failed to create {}", cert_dir), e))?;

    let cert_path = cert_dir.join(CERT_NAME);
    let key_path = cert_dir.join(KEY_NAME);

    ctx.output
        .step("🔐", &format!("Generating certificate for {}", host));
    run_checked(
        "openssl",
        &[
            "req",
            "-x509",
            "-newkey",
            "rsa:2048",
            "-sha256",
            "-nodes",
            "-days",
            &VALID_DAYS.to_string(),
            "-subj",
            &format!("/CN={}", host),
            "-addext",
            &format!("subjectAltName=DNS:{}", host),
            "-keyout",
            key_path.as_str(),
            "-out",
            cert_path.as_str(),
        ],
    )?;

    let generated_at = Utc::now();
    let metadata = CertMetadata {
        host: host.clone(),
        generated_at,
        expires_at: generated_at + Duration::days(VALID_DAYS),
    };
    let json = serde_json::to_string_pretty(&metadata).map_err(|e| StratoError::JsonParse {
        file: META_NAME.to_string(),
        message: e.to_string(),
    })?;
    fs::write(cert_dir.join(META_NAME), json)
        .await
        .map_err(|e| StratoError::io("Failed to write certificate metadata".to_string(), e))?;

    ctx.output.step("🔏", "Registering with the OS trust store");
    trust_install(&cert_path, ctx)?;

    ctx.output
        .success(&format!("Certificate installed in {}", cert_dir));
    Ok(())
}

async fn uninstall(cert_dir: &Utf8Path, ctx: &CommandContext) -> StratoResult<()> {
    let metadata = read_metadata(cert_dir).await.ok();

    if let Some(metadata) = &metadata {
        trust_uninstall(&metadata.host, ctx)?;
    }

    for name in [CERT_NAME, KEY_NAME, META_NAME] {
        let path = cert_dir.join(name);
        match fs::remove_file(&path).await {
            Ok(()) => {},
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {},
            Err(e) => return Err(StratoError::io(format!("Failed to remove {}", path), e)),
        }
    }

    ctx.output.success("Certificate removed");
    Ok(())
}

async fn validate(cert_dir: &Utf8Path, ctx: &CommandContext) -> StratoResult<()> {
    for name in [CERT_NAME, KEY_NAME] {
        if !cert_dir.join(name).is_file() {
            return Err(StratoError::Certificate {
                reason: format!("{} is missing from {}", name, cert_dir),
            });
        }
    }

    let metadata = read_metadata(cert_dir).await?;
    let now = Utc::now();

    if metadata.expires_at <= now {
        return Err(StratoError::Certificate {
            reason: format!("certificate for {} expired on {}", metadata.host, metadata.expires_at),
        });
    }

    let remaining = metadata.expires_at - now;
    if remaining < Duration::days(30) {
        ctx.output.warn(&format!(
            "certificate for {} expires in {} days",
            metadata.host,
            remaining.num_days()
        ));
    }

    ctx.output.success(&format!(
        "Certificate for {} is valid until {}",
        metadata.host,
        metadata.expires_at.format("%Y-%m-%d")
    ));
    Ok(())
}

async fn read_metadata(cert_dir: &Utf8Path) -> StratoResult<CertMetadata> {
    let path = cert_dir.join(META_NAME);
    let contents = fs::read_to_string(&path)
        .await
        .map_err(|e| StratoError::io(format!("Failed to read {}", path), e))?;
    serde_json::from_str(&contents).map_err(|e| StratoError::JsonParse {
        file: path.to_string(),
        message: e.to_string(),
    })
}

/// Register the certificate with the platform trust store
fn trust_install(cert_path: &Utf8Path, ctx: &CommandContext) -> StratoResult<()> {
    if cfg!(target_os = "macos") {
        run_checked(
            "security",
            &[
                "add-trusted-cert",
                "-d",
                "-r",
                "trustRoot",
                "-k",
                "/Library/Keychains/System.keychain",
                cert_path.as_str(),
            ],
        )
    } else if cfg!(target_os = "windows") {
        run_checked("certutil", &["-addstore", "-f", "Root", cert_path.as_str()])
    } else {
        // No portable trust automation on Linux; leave it to the user
        ctx.output.warn("Trust the certificate manually:");
        ctx.output.info(&format!(
            "  sudo cp {} /usr/local/share/ca-certificates/ && sudo update-ca-certificates",
            cert_path
        ));
        Ok(())
    }
}

/// Remove the certificate from the platform trust store
fn trust_uninstall(host: &str, ctx: &CommandContext) -> StratoResult<()> {
    if cfg!(target_os = "macos") {
        run_checked("security", &["delete-certificate", "-c", host])
    } else if cfg!(target_os = "windows") {
        run_checked("certutil", &["-delstore", "Root", host])
    } else {
        ctx.output.warn(&format!(
            "Remove /usr/local/share/ca-certificates/{}.crt manually if you installed it",
            host
        ));
        Ok(())
    }
}

/// Run an external command, mapping a non-zero exit to an error
fn run_checked(program: &str, args: &[&str]) -> StratoResult<()> {
    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|e| StratoError::io(format!("Failed to run '{}'", program), e))?;

    if !status.success() {
        return Err(StratoError::CommandFailed {
            command: format!("{} {}", program, args.join(" ")),
            status: status.code().unwrap_or(-1),
        });
    }
    Ok(())
}
