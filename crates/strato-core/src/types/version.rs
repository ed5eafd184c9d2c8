//! npm-flavored semantic version types.
//!
//! Provides Version and VersionReq types following the semantic versioning
//! specification as the npm ecosystem uses it: caret and tilde ranges,
//! comparison operators, wildcard segments (`1.x`, `*`), and space-separated
//! comparator lists.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Semantic version (major.minor.patch-prerelease+build)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
    pub build: Option<String>,
}

/// Version requirement (^1.0.0, ~2.3.0, >=1.0.0 <2.0.0, 1.x)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VersionReq {
    pub comparators: Vec<Comparator>,
}

/// Individual version comparator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Comparator {
    pub op: Op,
    pub version: PartialVersion,
}

/// Comparison operator for version requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Op {
    Exact,     // =1.0.0 or bare 1.0.0 / 1.2 / 1
    Greater,   // >1.0.0
    GreaterEq, // >=1.0.0
    Less,      // <1.0.0
    LessEq,    // <=1.0.0
    Tilde,     // ~1.0.0
    Caret,     // ^1.0.0
    Wildcard,  // *
}

/// Partial version for comparisons (missing components match anything)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PartialVersion {
    pub major: u64,
    pub minor: Option<u64>,
    pub patch: Option<u64>,
    pub prerelease: Option<String>,
}

/// Version parsing and validation errors
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Invalid version format: {input}")]
    InvalidFormat { input: String },

    #[error("Invalid number in version: {component}")]
    InvalidNumber { component: String },
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
            build: None,
        }
    }

    /// Check if this version satisfies a version requirement
    pub fn satisfies(&self, req: &VersionReq) -> bool {
        req.matches(self)
    }

    /// Check if this is a prerelease version
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Get the precedence for comparison (ignores build metadata)
    fn precedence_cmp(&self, other: &Self) -> Ordering {
        match (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch)) {
            Ordering::Equal => {
                match (&self.prerelease, &other.prerelease) {
                    (None, None) => Ordering::Equal,
                    (Some(_), None) => Ordering::Less, // prerelease < normal
                    (None, Some(_)) => Ordering::Greater,
                    (Some(a), Some(b)) => a.cmp(b), // lexical comparison
                }
            },
            other => other,
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();

        // Split on '+' for build metadata
        let (version_part, build) = match input.split_once('+') {
            Some((v, b)) => (v, Some(b.to_string())),
            None => (input, None),
        };

        // Split on '-' for prerelease
        let (core_part, prerelease) = match version_part.split_once('-') {
            Some((c, p)) => (c, Some(p.to_string())),
            None => (version_part, None),
        };

        // Parse major.minor.patch
        let parts: Vec<&str> = core_part.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionError::InvalidFormat {
                input: input.to_string(),
            });
        }

        let major = parse_component(parts[0])?;
        let minor = parse_component(parts[1])?;
        let patch = parse_component(parts[2])?;

        Ok(Version {
            major,
            minor,
            patch,
            prerelease,
            build,
        })
    }
}

fn parse_component(part: &str) -> Result<u64, VersionError> {
    // Leading '+' or '-' would parse as a number; reject explicitly
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(VersionError::InvalidNumber {
            component: part.to_string(),
        });
    }
    part.parse().map_err(|_| VersionError::InvalidNumber {
        component: part.to_string(),
    })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        if let Some(ref pre) = self.prerelease {
            write!(f, "-{}", pre)?;
        }

        if let Some(ref build) = self.build {
            write!(f, "+{}", build)?;
        }

        Ok(())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence_cmp(other)
    }
}

impl VersionReq {
    /// Parse a version requirement string
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let input = input.trim();

        if input == "*" || input.eq_ignore_ascii_case("x") {
            return Ok(VersionReq {
                comparators: vec![Comparator::wildcard()],
            });
        }

        let comparators = input
            .split_whitespace()
            .map(Comparator::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if comparators.is_empty() {
            return Err(VersionError::InvalidFormat {
                input: input.to_string(),
            });
        }

        Ok(VersionReq { comparators })
    }

    /// Build a caret "compatible-with" requirement for an exact version
    pub fn caret(version: &Version) -> Self {
        VersionReq {
            comparators: vec![Comparator {
                op: Op::Caret,
                version: PartialVersion {
                    major: version.major,
                    minor: Some(version.minor),
                    patch: Some(version.patch),
                    prerelease: version.prerelease.clone(),
                },
            }],
        }
    }

    /// Check if a version matches this requirement
    pub fn matches(&self, version: &Version) -> bool {
        self.comparators.iter().all(|comp| comp.matches(version))
    }

    /// Check whether any comparator carries a prerelease component.
    ///
    /// Ranges without one never select prerelease versions.
    pub fn allows_prerelease(&self) -> bool {
        self.comparators
            .iter()
            .any(|comp| comp.version.prerelease.is_some())
    }
}

impl fmt::Display for VersionReq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, comp) in self.comparators.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", comp)?;
        }
        Ok(())
    }
}

impl Comparator {
    fn wildcard() -> Self {
        Comparator {
            op: Op::Wildcard,
            version: PartialVersion {
                major: 0,
                minor: None,
                patch: None,
                prerelease: None,
            },
        }
    }

    /// Parse a single comparator token
    fn parse(input: &str) -> Result<Self, VersionError> {
        let (op, version_str) = if let Some(stripped) = input.strip_prefix("^") {
            (Op::Caret, stripped)
        } else if let Some(stripped) = input.strip_prefix("~") {
            (Op::Tilde, stripped)
        } else if let Some(stripped) = input.strip_prefix(">=") {
            (Op::GreaterEq, stripped)
        } else if let Some(stripped) = input.strip_prefix("<=") {
            (Op::LessEq, stripped)
        } else if let Some(stripped) = input.strip_prefix(">") {
            (Op::Greater, stripped)
        } else if let Some(stripped) = input.strip_prefix("<") {
            (Op::Less, stripped)
        } else if let Some(stripped) = input.strip_prefix("=") {
            (Op::Exact, stripped)
        } else {
            (Op::Exact, input)
        };

        let version = PartialVersion::parse(version_str)?;
        Ok(Comparator { op, version })
    }

    /// Check if a version matches this comparator
    pub fn matches(&self, version: &Version) -> bool {
        match self.op {
            Op::Exact => self.version.matches_exact(version),
            Op::Wildcard => true,
            Op::Greater => version > &self.version.to_version(),
            Op::GreaterEq => version >= &self.version.to_version(),
            Op::Less => version < &self.version.to_version(),
            Op::LessEq => version <= &self.version.to_version(),
            Op::Tilde => self.version.matches_tilde(version),
            Op::Caret => self.version.matches_caret(version),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.op {
            Op::Exact => "",
            Op::Greater => ">",
            Op::GreaterEq => ">=",
            Op::Less => "<",
            Op::LessEq => "<=",
            Op::Tilde => "~",
            Op::Caret => "^",
            Op::Wildcard => return write!(f, "*"),
        };
        write!(f, "{}{}", prefix, self.version)
    }
}

impl PartialVersion {
    /// Parse a version that may omit minor/patch or use `x` wildcards
    fn parse(input: &str) -> Result<Self, VersionError> {
        // Build metadata is irrelevant for matching
        let version_part = match input.split_once('+') {
            Some((v, _)) => v,
            None => input,
        };

        let (core_part, prerelease) = match version_part.split_once('-') {
            Some((c, p)) => (c, Some(p.to_string())),
            None => (version_part, None),
        };

        let parts: Vec<&str> = core_part.split('.').collect();
        if parts.is_empty() || parts.len() > 3 {
            return Err(VersionError::InvalidFormat {
                input: input.to_string(),
            });
        }

        let mut components = [None, None, None];
        for (i, part) in parts.iter().enumerate() {
            if part.eq_ignore_ascii_case("x") || *part == "*" {
                // A wildcard segment ends the concrete prefix
                break;
            }
            components[i] = Some(parse_component(part)?);
        }

        let major = components[0].ok_or_else(|| VersionError::InvalidFormat {
            input: input.to_string(),
        })?;

        Ok(PartialVersion {
            major,
            minor: components[1],
            patch: components[2],
            // A prerelease tag is only meaningful on a fully specified version
            prerelease: if components[2].is_some() { prerelease } else { None },
        })
    }

    /// Convert to a full version (filling missing parts with 0)
    pub fn to_version(&self) -> Version {
        Version {
            major: self.major,
            minor: self.minor.unwrap_or(0),
            patch: self.patch.unwrap_or(0),
            prerelease: self.prerelease.clone(),
            build: None,
        }
    }

    /// Check exact match (missing components match anything)
    fn matches_exact(&self, version: &Version) -> bool {
        self.major == version.major
            && self.minor.map_or(true, |m| version.minor == m)
            && self.patch.map_or(true, |p| version.patch == p)
            && if self.patch.is_some() {
                version.prerelease == self.prerelease
            } else {
                // 1.2 must not match 1.2.3-beta
                version.prerelease.is_none()
            }
    }

    /// Check tilde match (~1.2.3 allows >=1.2.3 <1.3.0)
    fn matches_tilde(&self, version: &Version) -> bool {
        if version.major != self.major {
            return false;
        }

        match self.minor {
            Some(minor) => {
                version.minor == minor && version >= &self.to_version()
            },
            None => true,
        }
    }

    /// Check caret match (^1.2.3 allows >=1.2.3 <2.0.0, ^0.2.3 allows <0.3.0)
    fn matches_caret(&self, version: &Version) -> bool {
        if version.major != self.major {
            return false;
        }
        if version < &self.to_version() {
            return false;
        }

        // Leading zeros pin the first non-zero component
        if self.major == 0 {
            match (self.minor, self.patch) {
                (Some(0), Some(patch)) => version.minor == 0 && version.patch == patch,
                (Some(minor), _) => version.minor == minor,
                (None, _) => true,
            }
        } else {
            true
        }
    }
}

impl fmt::Display for PartialVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        if let Some(minor) = self.minor {
            write!(f, ".{}", minor)?;
            if let Some(patch) = self.patch {
                write!(f, ".{}", patch)?;
                if let Some(ref pre) = self.prerelease {
                    write!(f, "-{}", pre)?;
                }
            }
        }
        Ok(())
    }
}
