//! Project manifest and tool configuration parsing for the Strato CLI
//!
//! This crate handles reading and writing `package.json` manifests and the
//! `strato.json` tool configuration file, plus the fixed workspace validation
//! rules behind `strato check`.

pub mod lint;
pub mod manifest;
pub mod toolconfig;

// Re-export main types
pub use lint::{check_workspace, Violation};
pub use manifest::{DependencyMap, Manifest};
pub use toolconfig::ToolConfig;

use strato_core::error::StratoError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, StratoError>;
