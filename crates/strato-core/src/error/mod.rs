//! Error types and result aliases for Strato operations.
//!
//! Provides a unified error type that covers all error conditions across the
//! Strato crates with actionable error messages.

use thiserror::Error;

/// Unified error type for all Strato operations
#[derive(Error, Debug)]
pub enum StratoError {
    // Config errors
    #[error("Failed to parse {file}: {message}")]
    JsonParse { file: String, message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Registry errors
    #[error("Package '{name}' not found in registry")]
    PackageNotFound { name: String },

    #[error("No version of '{name}' satisfies '{requirement}'")]
    NoMatchingVersion { name: String, requirement: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Route generation errors
    #[error("Failed to parse route source {file}: {reason}")]
    RouteSource { file: String, reason: String },

    // Subprocess errors
    #[error("Command '{command}' exited with status {status}")]
    CommandFailed { command: String, status: i32 },

    // Certificate errors
    #[error("Certificate error: {reason}")]
    Certificate { reason: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for Strato operations
pub type StratoResult<T> = Result<T, StratoError>;

impl StratoError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StratoError::Network { .. } | StratoError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            StratoError::PackageNotFound { .. } => {
                Some("Check the package name spelling or try searching the registry")
            },
            StratoError::NoMatchingVersion { .. } => {
                Some("Relax the version requirement or check the package's published versions")
            },
            StratoError::Network { .. } => Some("Check your internet connection and try again"),
            StratoError::RouteSource { .. } => {
                Some("Each route source file must export exactly one class")
            },
            StratoError::Certificate { .. } => {
                Some("Run 'strato certs install' to regenerate the development certificate")
            },
            _ => None,
        }
    }
}
