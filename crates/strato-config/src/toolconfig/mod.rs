//! strato.json tool configuration parsing

use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strato_core::error::StratoError;
use tokio::fs;

use crate::ConfigResult;

/// Tool configuration (strato.json)
///
/// Optional per-project file; every field has a default so a missing file is
/// equivalent to an empty one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Project kind: "spa" or "library"
    #[serde(default, rename = "projectType", skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,

    /// Route redirects, from-path to to-path, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub redirects: IndexMap<String, String>,

    /// Local dev server host name used on generated certificates
    #[serde(default, rename = "devHost", skip_serializing_if = "Option::is_none")]
    pub dev_host: Option<String>,
}

impl ToolConfig {
    /// Read strato.json, returning defaults when the file does not exist
    pub async fn load_or_default(path: &Utf8Path) -> ConfigResult<Self> {
        match fs::read_to_string(path).await {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| StratoError::JsonParse {
                    file: path.to_string(),
                    message: e.to_string(),
                })
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(StratoError::io(format!("Failed to read {}", path), e)),
        }
    }

    /// Check if this project is a single-page application
    pub fn is_spa(&self) -> bool {
        self.project_type.as_deref() == Some("spa")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[tokio::test]
    async fn test_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("strato.json")).unwrap();

        let config = ToolConfig::load_or_default(&path).await.unwrap();
        assert_eq!(config, ToolConfig::default());
        assert!(!config.is_spa());
    }

    #[tokio::test]
    async fn test_redirect_order_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("strato.json")).unwrap();
        let json = r#"{
            "projectType": "spa",
            "redirects": { "": "home", "old-about": "about" }
        }"#;
        tokio::fs::write(&path, json).await.unwrap();

        let config = ToolConfig::load_or_default(&path).await.unwrap();
        assert!(config.is_spa());
        let froms: Vec<_> = config.redirects.keys().cloned().collect();
        assert_eq!(froms, vec!["", "old-about"]);
    }
}
