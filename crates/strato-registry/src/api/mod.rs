//! npm registry API response types and version selection

use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strato_core::error::StratoError;
use strato_core::types::{Version, VersionReq, VersionSpec};

use crate::RegistryResult;

/// Abbreviated package metadata response from an npm-compatible registry
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PackageDocument {
    /// Package name
    pub name: String,
    /// Dist-tags ("latest", "next", ...)
    #[serde(rename = "dist-tags")]
    pub dist_tags: IndexMap<String, String>,
    /// All published versions, keyed by version string
    pub versions: IndexMap<String, VersionEntry>,
    /// Last modification time
    #[serde(default)]
    pub modified: Option<DateTime<Utc>>,
}

/// Metadata for a specific published version
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionEntry {
    /// Version string
    pub version: String,
    /// Deprecation notice, when present
    #[serde(default)]
    pub deprecated: Option<String>,
    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: Option<IndexMap<String, String>>,
    /// Peer dependencies
    #[serde(default, rename = "peerDependencies")]
    pub peer_dependencies: Option<IndexMap<String, String>>,
}

impl PackageDocument {
    /// Resolve a specifier to the concrete version it names.
    ///
    /// Ranges pick the highest published version that satisfies them;
    /// prerelease versions only participate when the range itself carries a
    /// prerelease component.
    pub fn select(&self, spec: &VersionSpec) -> RegistryResult<Version> {
        match spec {
            VersionSpec::Latest => self.latest(),
            VersionSpec::Exact(version) => {
                if self.versions.contains_key(&version.to_string()) {
                    Ok(version.clone())
                } else {
                    Err(self.no_match(&version.to_string()))
                }
            },
            VersionSpec::Range(req) => self
                .highest_matching(req)
                .ok_or_else(|| self.no_match(&req.to_string())),
        }
    }

    /// The version the `latest` dist-tag names
    pub fn latest(&self) -> RegistryResult<Version> {
        let tag = self
            .dist_tags
            .get("latest")
            .ok_or_else(|| self.no_match("latest"))?;
        Version::from_str(tag).map_err(|_| self.no_match("latest"))
    }

    /// Highest published version satisfying the requirement
    pub fn highest_matching(&self, req: &VersionReq) -> Option<Version> {
        let allow_prerelease = req.allows_prerelease();

        self.versions
            .keys()
            .filter_map(|key| Version::from_str(key).ok())
            .filter(|version| allow_prerelease || !version.is_prerelease())
            .filter(|version| req.matches(version))
            .max()
    }

    /// Declared peer dependencies of one published version
    pub fn peer_dependencies(&self, version: &Version) -> IndexMap<String, String> {
        self.versions
            .get(&version.to_string())
            .and_then(|entry| entry.peer_dependencies.clone())
            .unwrap_or_default()
    }

    fn no_match(&self, requirement: &str) -> StratoError {
        StratoError::NoMatchingVersion {
            name: self.name.clone(),
            requirement: requirement.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(versions: &[&str]) -> PackageDocument {
        let mut map = IndexMap::new();
        for v in versions {
            map.insert(
                v.to_string(),
                VersionEntry {
                    version: v.to_string(),
                    deprecated: None,
                    dependencies: None,
                    peer_dependencies: None,
                },
            );
        }
        let mut dist_tags = IndexMap::new();
        if let Some(last) = versions.last() {
            dist_tags.insert("latest".to_string(), last.to_string());
        }
        PackageDocument {
            name: "sample".to_string(),
            dist_tags,
            versions: map,
            modified: None,
        }
    }

    #[test]
    fn test_select_highest_in_range() {
        let doc = document(&["1.0.0", "1.2.0", "1.9.3", "2.0.0"]);
        let spec = VersionSpec::parse("^1.0.0").unwrap();
        assert_eq!(doc.select(&spec).unwrap(), Version::new(1, 9, 3));
    }

    #[test]
    fn test_select_skips_prereleases() {
        let doc = document(&["1.0.0", "1.1.0", "1.2.0-rc.1"]);
        let spec = VersionSpec::parse("^1.0.0").unwrap();
        assert_eq!(doc.select(&spec).unwrap(), Version::new(1, 1, 0));
    }

    #[test]
    fn test_select_latest_tag() {
        let doc = document(&["1.0.0", "2.0.0"]);
        assert_eq!(
            doc.select(&VersionSpec::Latest).unwrap(),
            Version::new(2, 0, 0)
        );
    }

    #[test]
    fn test_select_exact_missing_version() {
        let doc = document(&["1.0.0"]);
        let spec = VersionSpec::parse("3.0.0").unwrap();
        assert!(matches!(
            doc.select(&spec),
            Err(StratoError::NoMatchingVersion { .. })
        ));
    }

    #[test]
    fn test_no_version_in_range() {
        let doc = document(&["1.0.0"]);
        let spec = VersionSpec::parse("^2.0.0").unwrap();
        assert!(doc.select(&spec).is_err());
    }
}
