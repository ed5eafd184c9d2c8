//! Manifest dependency upgrade orchestration.
//!
//! Runs the classification, override, and resolution passes over each
//! dependency section independently, merges unresolvable entries back in
//! unchanged, and keeps every section in ascending key order.

use std::sync::Arc;

use strato_config::{DependencyMap, Manifest};
use strato_registry::{MetadataCache, RegistryClient};
use tracing::{info, warn};

use crate::classify::classify_entries;
use crate::overrides::apply_override_rules;
use crate::peers;
use crate::resolve::resolve_against_registry;
use crate::ResolverResult;

/// Per-section upgrade counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionSummary {
    /// Packages whose resolved version changed
    pub updated: usize,
    /// Packages already at their resolved version
    pub skipped: usize,
    /// Entries excluded from resolution
    pub invalid: usize,
}

/// Upgrade counts for a whole manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpgradeSummary {
    pub dependencies: SectionSummary,
    pub dev_dependencies: SectionSummary,
}

/// Dependency upgrade engine
pub struct Upgrader {
    client: Arc<RegistryClient>,
    cache: Arc<MetadataCache>,
}

impl Upgrader {
    /// Create an upgrader with a fresh metadata cache
    pub fn new(client: Arc<RegistryClient>) -> Self {
        Self::with_cache(client, Arc::new(MetadataCache::new()))
    }

    /// Create an upgrader sharing an existing metadata cache
    pub fn with_cache(client: Arc<RegistryClient>, cache: Arc<MetadataCache>) -> Self {
        Self { client, cache }
    }

    /// Upgrade both dependency sections of a manifest, in place.
    ///
    /// Sections never mix: each one is classified and resolved on its own.
    pub async fn upgrade_manifest(&self, manifest: &mut Manifest) -> ResolverResult<UpgradeSummary> {
        let dependencies = self
            .upgrade_section(&mut manifest.dependencies, "dependencies")
            .await?;
        let dev_dependencies = self
            .upgrade_section(&mut manifest.dev_dependencies, "devDependencies")
            .await?;

        Ok(UpgradeSummary {
            dependencies,
            dev_dependencies,
        })
    }

    /// Upgrade one dependency section, in place
    pub async fn upgrade_section(
        &self,
        map: &mut DependencyMap,
        section: &str,
    ) -> ResolverResult<SectionSummary> {
        let classified = classify_entries(map);
        let targets = apply_override_rules(&classified.valid);
        let resolved = resolve_against_registry(&self.client, &self.cache, &targets).await?;

        let mut summary = SectionSummary::default();
        let mut next = DependencyMap::with_capacity(map.len());

        for (name, version) in &resolved {
            match map.get(name) {
                Some(previous) if previous == version => {
                    summary.skipped += 1;
                    info!(section, "skipped {} (already {})", name, version);
                },
                previous => {
                    summary.updated += 1;
                    info!(
                        section,
                        "updated {} from {} to {}",
                        name,
                        previous.map(String::as_str).unwrap_or("(none)"),
                        version
                    );
                },
            }
            next.insert(name.clone(), version.clone());
        }

        for (name, specifier) in &classified.invalid {
            summary.invalid += 1;
            warn!(
                section,
                "'{}' uses specifier '{}' which cannot be resolved against the registry",
                name,
                specifier
            );
            next.insert(name.clone(), specifier.clone());
        }

        next.sort_keys();
        *map = next;

        info!(
            section,
            "{} updated, {} unchanged, {} skipped as unresolvable",
            summary.updated,
            summary.skipped,
            summary.invalid
        );
        Ok(summary)
    }

    /// Expand the framework peer-dependency closure of the runtime section
    pub async fn add_peer_dependencies(
        &self,
        manifest: &mut Manifest,
    ) -> ResolverResult<peers::PeerReport> {
        peers::add_peer_dependencies(&self.client, &self.cache, &mut manifest.dependencies).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_package(
        server: &MockServer,
        url_path: &str,
        name: &str,
        versions: &[&str],
    ) {
        let mut version_map = serde_json::Map::new();
        for v in versions {
            version_map.insert(v.to_string(), json!({ "version": v }));
        }
        let body = json!({
            "name": name,
            "dist-tags": { "latest": versions.last().unwrap() },
            "versions": version_map,
        });

        Mock::given(method("GET"))
            .and(path(url_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    async fn upgrader(server: &MockServer) -> Upgrader {
        let client = Arc::new(RegistryClient::with_registry_url(server.uri()).unwrap());
        Upgrader::new(client)
    }

    fn map(entries: &[(&str, &str)]) -> DependencyMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_upgrade_section_resolves_and_sorts() {
        let server = MockServer::start().await;
        mount_package(&server, "/left-pad", "left-pad", &["1.3.0"]).await;
        mount_package(&server, "/@strato%2fcore", "@strato/core", &["4.0.0", "4.3.2"]).await;

        let mut section = map(&[
            ("left-pad", "^1.3.0"),
            ("@strato/core", "4.0.0"),
            ("weird", "owner/repo#branch"),
        ]);

        let summary = upgrader(&server)
            .await
            .upgrade_section(&mut section, "dependencies")
            .await
            .unwrap();

        // Override table pins @strato/core to ^4.0.0, which resolves to 4.3.2
        assert_eq!(section.get("@strato/core"), Some(&"4.3.2".to_string()));
        assert_eq!(section.get("left-pad"), Some(&"1.3.0".to_string()));
        assert_eq!(section.get("weird"), Some(&"owner/repo#branch".to_string()));

        let keys: Vec<_> = section.keys().cloned().collect();
        assert_eq!(keys, vec!["@strato/core", "left-pad", "weird"]);

        assert_eq!(summary.updated, 2);
        assert_eq!(summary.invalid, 1);
    }

    #[tokio::test]
    async fn test_upgrade_is_idempotent() {
        let server = MockServer::start().await;
        mount_package(&server, "/left-pad", "left-pad", &["1.3.0"]).await;
        mount_package(&server, "/moment", "moment", &["2.29.0", "2.30.1"]).await;

        let mut section = map(&[("moment", "latest"), ("left-pad", "1.3.0")]);

        let engine = upgrader(&server).await;
        engine
            .upgrade_section(&mut section, "dependencies")
            .await
            .unwrap();
        let first = section.clone();

        let summary = engine
            .upgrade_section(&mut section, "dependencies")
            .await
            .unwrap();

        assert_eq!(section, first);
        assert_eq!(summary.updated, 0);
        assert_eq!(summary.skipped, 2);
    }

    #[tokio::test]
    async fn test_sections_resolve_independently() {
        let server = MockServer::start().await;
        mount_package(&server, "/left-pad", "left-pad", &["1.3.0"]).await;
        mount_package(&server, "/strato-lint", "strato-lint", &["2.4.0", "2.6.1", "3.0.0"]).await;

        let mut manifest = Manifest::new("demo-app");
        manifest.dependencies = map(&[("left-pad", "^1.0.0")]);
        manifest.dev_dependencies = map(&[("strato-lint", "2.4.0")]);

        let summary = upgrader(&server)
            .await
            .upgrade_manifest(&mut manifest)
            .await
            .unwrap();

        assert_eq!(manifest.dependencies.get("left-pad"), Some(&"1.3.0".to_string()));
        // Pinned by the override table to ^2.4.0, so 3.0.0 is out of reach
        assert_eq!(
            manifest.dev_dependencies.get("strato-lint"),
            Some(&"2.6.1".to_string())
        );
        assert_eq!(summary.dependencies.updated, 1);
        assert_eq!(summary.dev_dependencies.updated, 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_aborts_batch() {
        let server = MockServer::start().await;
        mount_package(&server, "/left-pad", "left-pad", &["1.3.0"]).await;
        // "missing" is never mounted, so the registry answers 404

        let mut section = map(&[("left-pad", "^1.0.0"), ("missing", "^1.0.0")]);
        let original = section.clone();

        let result = upgrader(&server)
            .await
            .upgrade_section(&mut section, "dependencies")
            .await;

        assert!(result.is_err());
        // The failed batch must not have partially mutated the section
        assert_eq!(section, original);
    }
}
