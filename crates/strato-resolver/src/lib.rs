//! Dependency upgrade and peer resolution engine for the Strato CLI
//!
//! This crate upgrades a project manifest's dependency sections against the
//! registry: specifiers are classified, framework packages are pinned to
//! known-compatible ranges by a fixed override table, ranges are resolved to
//! concrete versions concurrently, and the peer-dependency closure of the
//! framework's package namespaces is expanded.

pub mod classify;
pub mod overrides;
pub mod peers;
pub mod resolve;
pub mod upgrade;

// Re-export main types
pub use classify::{classify_entries, Classified};
pub use overrides::{apply_override_rules, Matcher, OverrideRule, UpgradeTarget, OVERRIDE_RULES};
pub use peers::{PeerReport, IGNORED_PEER, RECOGNIZED_PREFIXES};
pub use upgrade::{SectionSummary, Upgrader, UpgradeSummary};

use strato_core::error::StratoError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, StratoError>;
