//! npm registry client for the Strato CLI
//!
//! This crate provides HTTP client functionality for fetching package
//! metadata from an npm-compatible registry with connection pooling, retry
//! logic, and caching. Version selection against ranges and dist-tags lives
//! here too, next to the metadata it operates on.

pub mod api;
pub mod cache;
pub mod client;

// Re-export main types
pub use api::{PackageDocument, VersionEntry};
pub use cache::{CacheEntry, MetadataCache};
pub use client::{AuthConfig, RegistryClient, RetryConfig};

use strato_core::error::StratoError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, StratoError>;
