//! package.json manifest parsing and serialization

use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strato_core::error::StratoError;
use tokio::fs;

use crate::ConfigResult;

/// Ordered mapping from package name to version specifier
pub type DependencyMap = IndexMap<String, String>;

/// Project manifest (package.json)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Package name (required)
    pub name: String,

    /// Package version (required)
    pub version: String,

    /// Package description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Main entry point
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// License identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    /// Author information
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Homepage URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,

    /// npm scripts
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub scripts: IndexMap<String, String>,

    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: DependencyMap,

    /// Development dependencies
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: DependencyMap,

    /// Peer dependencies
    #[serde(default, rename = "peerDependencies", skip_serializing_if = "IndexMap::is_empty")]
    pub peer_dependencies: DependencyMap,

    /// Engine requirements
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub engines: IndexMap<String, String>,

    /// Private flag
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub private: bool,
}

impl Manifest {
    /// Create a minimal manifest for a new project
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "0.0.1".to_string(),
            private: true,
            ..Default::default()
        }
    }

    /// Read and parse a manifest file
    pub async fn load(path: &Utf8Path) -> ConfigResult<Self> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            StratoError::io(format!("Failed to read {}", path), e)
        })?;

        serde_json::from_str(&contents).map_err(|e| StratoError::JsonParse {
            file: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize and write the manifest back to disk.
    ///
    /// Dependency sections are written in the order they hold in memory, so
    /// callers that sort them get reproducible diffs.
    pub async fn save(&self, path: &Utf8Path) -> ConfigResult<()> {
        let mut contents =
            serde_json::to_string_pretty(self).map_err(|e| StratoError::JsonParse {
                file: path.to_string(),
                message: e.to_string(),
            })?;
        contents.push('\n');

        fs::write(path, contents).await.map_err(|e| {
            StratoError::io(format!("Failed to write {}", path), e)
        })
    }

    /// Check if a package name follows npm naming conventions
    pub fn is_valid_name(name: &str) -> bool {
        let unscoped = match name.strip_prefix('@') {
            Some(rest) => match rest.split_once('/') {
                Some((scope, pkg)) if !scope.is_empty() => pkg,
                _ => return false,
            },
            None => name,
        };

        !unscoped.is_empty()
            && unscoped.len() <= 214
            && !unscoped.starts_with('.')
            && !unscoped.starts_with('_')
            && unscoped
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "-_.".contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn sample_json() -> &'static str {
        r#"{
  "name": "demo-app",
  "version": "1.0.0",
  "scripts": {
    "build": "strato build"
  },
  "dependencies": {
    "@strato/core": "4.0.0",
    "left-pad": "^1.3.0"
  },
  "devDependencies": {
    "strato-lint": "~2.0.0"
  }
}"#
    }

    #[test]
    fn test_parse_manifest() {
        let manifest: Manifest = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(manifest.name, "demo-app");
        assert_eq!(manifest.dependencies.len(), 2);
        assert_eq!(
            manifest.dependencies.get("@strato/core"),
            Some(&"4.0.0".to_string())
        );
        assert_eq!(manifest.dev_dependencies.len(), 1);
        assert!(manifest.peer_dependencies.is_empty());
    }

    #[test]
    fn test_dependency_order_preserved() {
        let json = r#"{
            "name": "a", "version": "0.0.1",
            "dependencies": { "zebra": "1.0.0", "alpha": "1.0.0", "mid": "1.0.0" }
        }"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = manifest.dependencies.keys().cloned().collect();
        assert_eq!(keys, vec!["zebra", "alpha", "mid"]);
    }

    #[test]
    fn test_valid_package_names() {
        assert!(Manifest::is_valid_name("my-package"));
        assert!(Manifest::is_valid_name("@strato/core"));
        assert!(Manifest::is_valid_name("pkg_123"));

        assert!(!Manifest::is_valid_name(""));
        assert!(!Manifest::is_valid_name("UpperCase"));
        assert!(!Manifest::is_valid_name(".hidden"));
        assert!(!Manifest::is_valid_name("@/missing-scope"));
        assert!(!Manifest::is_valid_name("@scope"));
    }

    #[tokio::test]
    async fn test_load_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("package.json")).unwrap();

        tokio::fs::write(&path, sample_json()).await.unwrap();
        let manifest = Manifest::load(&path).await.unwrap();
        manifest.save(&path).await.unwrap();

        let reloaded = Manifest::load(&path).await.unwrap();
        assert_eq!(manifest, reloaded);

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(raw.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_load_reports_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("package.json")).unwrap();
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = Manifest::load(&path).await.unwrap_err();
        assert!(err.to_string().contains("package.json"));
    }
}
