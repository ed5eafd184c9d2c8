//! Core data types for the Strato CLI.
//!
//! This module provides the fundamental types used throughout the Strato
//! crates:
//! - Version types for npm-flavored semantic versioning
//! - Specifier classification for manifest entries

pub mod specifier;
pub mod version;

// Re-export all public types
pub use specifier::VersionSpec;
pub use version::{Comparator, Op, PartialVersion, Version, VersionError, VersionReq};
