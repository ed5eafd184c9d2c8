//! Manifest dependency specifier classification.
//!
//! A manifest entry's value is an arbitrary string; only exact versions,
//! version ranges, and the `latest` dist-tag participate in registry
//! resolution. Everything else (git references, tarball URLs, workspace
//! links) is carried through untouched.

use std::fmt;
use std::str::FromStr;

use super::version::{Version, VersionReq};

/// A parsed, resolvable dependency specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// Exact pinned version ("4.2.0")
    Exact(Version),
    /// Version range ("^4.0.0", "1.x", ">=1.0.0 <2.0.0")
    Range(VersionReq),
    /// The `latest` dist-tag
    Latest,
}

impl VersionSpec {
    /// Classify a raw specifier string, `None` for unresolvable specifiers
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();

        if raw == "latest" {
            return Some(VersionSpec::Latest);
        }

        if let Ok(version) = Version::from_str(raw) {
            return Some(VersionSpec::Exact(version));
        }

        VersionReq::parse(raw).ok().map(VersionSpec::Range)
    }

    /// Check whether a raw specifier is resolvable against the registry
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_some()
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Exact(version) => write!(f, "{}", version),
            VersionSpec::Range(req) => write!(f, "{}", req),
            VersionSpec::Latest => write!(f, "latest"),
        }
    }
}
